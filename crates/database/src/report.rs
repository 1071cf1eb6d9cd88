//! Narrative report storage.

use ledger_core::NarrativeReport;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::ReportRow;
use crate::validation::ReportId;

/// Store a generated report.
pub async fn create_report(pool: &SqlitePool, report: &NarrativeReport) -> Result<()> {
    let row = ReportRow::try_from(report)?;

    sqlx::query(
        r#"
        INSERT INTO system_reports (
            id, report_ref, title, report_type, category, summary,
            stats, decision, content, tables, is_enterprise, created_by_name, created_at
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&row.id)
    .bind(&row.report_ref)
    .bind(&row.title)
    .bind(&row.report_type)
    .bind(&row.category)
    .bind(&row.summary)
    .bind(&row.stats)
    .bind(&row.decision)
    .bind(&row.content)
    .bind(&row.tables)
    .bind(row.is_enterprise)
    .bind(&row.created_by_name)
    .bind(&row.created_at)
    .execute(pool)
    .await
    .map_err(|e| {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity: "Report",
                    id: row.id.clone(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    })?;

    Ok(())
}

/// Get a report by ID.
pub async fn get_report(pool: &SqlitePool, id: &ReportId) -> Result<NarrativeReport> {
    let row = sqlx::query_as::<_, ReportRow>(
        r#"
        SELECT id, report_ref, title, report_type, category, summary,
               stats, decision, content, tables, is_enterprise, created_by_name, created_at
        FROM system_reports
        WHERE id = ?
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Report",
        id: id.to_string(),
    })?;

    NarrativeReport::try_from(row)
}

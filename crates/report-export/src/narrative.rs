//! Narrative report exports: CSV and a printable HTML page.

use std::str::FromStr;

use askama::Template;
use chrono::{Datelike, NaiveDate, Utc};
use ledger_core::{NarrativeReport, ReportStats, ReportTable};
use serde_json::Value;

use crate::document::{format_amount, format_timestamp, CsvDocument};
use crate::error::Result;
use crate::filename::{dated_filename, sanitize_title};
use crate::markdown::{extract_tables, parse_blocks, Block};
use crate::{Artifact, CSV_CONTENT_TYPE, HTML_CONTENT_TYPE};

/// Requested download format. `Pdf` is an HTML page meant to be printed to PDF.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportFormat {
    #[default]
    Csv,
    Pdf,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Pdf => "html",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Csv => CSV_CONTENT_TYPE,
            Self::Pdf => HTML_CONTENT_TYPE,
        }
    }
}

impl FromStr for ReportFormat {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

/// Render `report` as a download named `<title slug>_<date>.<ext>`.
///
/// Eligibility is the caller's concern; see [`crate::check_exportable`].
pub fn report_artifact(
    report: &NarrativeReport,
    format: ReportFormat,
    brand: &str,
    today: NaiveDate,
) -> Result<Artifact> {
    let body = match format {
        ReportFormat::Csv => report_csv(report)?,
        ReportFormat::Pdf => report_html(report, brand)?,
    };

    Ok(Artifact {
        body,
        content_type: format.content_type(),
        filename: dated_filename(&sanitize_title(&report.title), today, format.extension()),
    })
}

/// Report metadata, statistics, decision data and tables as CSV.
///
/// Structured tables are used when the report carries them; otherwise pipe
/// tables are scraped from the Markdown body.
pub fn report_csv(report: &NarrativeReport) -> Result<String> {
    let mut doc = CsvDocument::new();

    doc.record(["Report Title", report.title.as_str()])?;
    doc.record(["Generated".to_string(), format_timestamp(report.created_at)])?;
    doc.record(["Type", report.report_type.as_str()])?;
    doc.record(["Category", report.category.as_str()])?;
    doc.record(["Summary", report.summary.as_str()])?;
    doc.blank()?;

    if let Some(stats) = &report.stats {
        doc.record(["Statistics"])?;
        doc.record(["Total Checks".to_string(), stats.total_checks.to_string()])?;
        doc.record(["Passed".to_string(), stats.passed.to_string()])?;
        doc.record(["Failed".to_string(), stats.failed.to_string()])?;
        doc.record(["Warnings".to_string(), stats.warnings.to_string()])?;
        doc.record(["Score".to_string(), format!("{}%", format_amount(stats.score))])?;
        doc.blank()?;
    }

    if let Some(decision) = &report.decision {
        doc.record(["Decision Data"])?;
        for (key, value) in decision {
            doc.record([key.clone(), decision_value(value)])?;
        }
        doc.blank()?;
    }

    let scraped;
    let tables: &[ReportTable] = if report.tables.is_empty() {
        scraped = extract_tables(&report.content);
        tracing::debug!(report_id = %report.id, tables = scraped.len(), "Scraped tables from report content");
        &scraped
    } else {
        &report.tables
    };

    for table in tables {
        if let Some(title) = &table.title {
            doc.record([title])?;
        }
        if !table.header.is_empty() {
            doc.record(&table.header)?;
        }
        for row in &table.rows {
            doc.record(row)?;
        }
        doc.blank()?;
    }

    doc.finish()
}

fn decision_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Printable right-to-left report page.
#[derive(Template)]
#[template(path = "report.html")]
struct ReportPage<'a> {
    report: &'a NarrativeReport,
    stats: Option<&'a ReportStats>,
    created: String,
    blocks: Vec<Block>,
    brand: &'a str,
    year: i32,
}

/// Render the report body and statistics as a print-ready HTML document.
///
/// All report text is escaped; only the supported Markdown subset becomes
/// markup.
pub fn report_html(report: &NarrativeReport, brand: &str) -> Result<String> {
    let page = ReportPage {
        report,
        stats: report.stats.as_ref(),
        created: report.created_at.format("%d.%m.%Y, %H:%M:%S").to_string(),
        blocks: parse_blocks(&report.content),
        brand,
        year: Utc::now().year(),
    };
    Ok(page.render()?)
}

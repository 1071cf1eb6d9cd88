//! Export allow-list for narrative reports.

use ledger_core::NarrativeReport;

use crate::error::{ExportError, Result};

/// Report categories that may be exported by anyone.
pub const EXPORTABLE_CATEGORIES: [&str; 4] = [
    "financial_payments",
    "orders_transactions",
    "financial_reconciliation",
    "go_live_readiness",
];

/// Whether `report` may be exported. Enterprise reports always may.
pub fn is_exportable(report: &NarrativeReport) -> bool {
    report.is_enterprise || EXPORTABLE_CATEGORIES.contains(&report.category.as_str())
}

/// Reject reports outside the allow-list.
pub fn check_exportable(report: &NarrativeReport) -> Result<()> {
    if is_exportable(report) {
        Ok(())
    } else {
        Err(ExportError::NotExportable {
            category: report.category.clone(),
        })
    }
}

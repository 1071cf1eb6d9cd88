//! Read access used by the export service.

use async_trait::async_trait;
use ledger_core::{DateWindow, NarrativeReport, Order, Transaction, WithdrawalRequest};

use crate::error::Result;
use crate::validation::ReportId;
use crate::{order, report, transaction, withdrawal, Database};

/// Windowed reads over the ledger plus report lookup.
///
/// Implemented by [`Database`]; tests substitute failing stores.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Orders with status `paid` or `completed`.
    async fn settled_orders(&self, window: &DateWindow) -> Result<Vec<Order>>;

    /// Orders of any status.
    async fn orders(&self, window: &DateWindow) -> Result<Vec<Order>>;

    async fn transactions(&self, window: &DateWindow) -> Result<Vec<Transaction>>;

    async fn withdrawals(&self, window: &DateWindow) -> Result<Vec<WithdrawalRequest>>;

    /// Look up a stored narrative report.
    async fn report(&self, id: &ReportId) -> Result<NarrativeReport>;
}

#[async_trait]
impl RecordStore for Database {
    async fn settled_orders(&self, window: &DateWindow) -> Result<Vec<Order>> {
        order::list_settled_orders(self.pool(), window).await
    }

    async fn orders(&self, window: &DateWindow) -> Result<Vec<Order>> {
        order::list_orders(self.pool(), window).await
    }

    async fn transactions(&self, window: &DateWindow) -> Result<Vec<Transaction>> {
        transaction::list_transactions(self.pool(), window).await
    }

    async fn withdrawals(&self, window: &DateWindow) -> Result<Vec<WithdrawalRequest>> {
        withdrawal::list_withdrawals(self.pool(), window).await
    }

    async fn report(&self, id: &ReportId) -> Result<NarrativeReport> {
        report::get_report(self.pool(), id).await
    }
}

//! Application state shared across handlers.

use std::sync::Arc;

use database::RecordStore;
use ledger_core::DuplicatePolicy;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Ledger and report records.
    pub store: Arc<dyn RecordStore>,
    /// Footer brand for printable reports.
    pub brand: Arc<str>,
    /// Reconciliation treatment of repeated transactions.
    pub duplicate_policy: DuplicatePolicy,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Arc<dyn RecordStore>, brand: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            brand: brand.into(),
            duplicate_policy: DuplicatePolicy::default(),
        }
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

//! Persistence for accepted error reports.
//!
//! Handlers only ever see [`DynReportStore`]; which backend sits behind it is
//! decided once at startup from the [`StoreConfig`](crate::store_config::StoreConfig).

use std::sync::Arc;

use overlord_types::{ErrorReport, StoredReport};

mod database;
mod memory;

pub use database::DatabaseReportStore;
pub use memory::MemoryReportStore;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        StoreError::Database(err.to_string())
    }
}

/// Filter and page window for listing reports. Results are newest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReportQuery {
    pub domain: Option<String>,
    pub limit: u64,
    pub offset: u64,
}

/// Create/find/update/delete store keyed by the server-assigned report id.
#[async_trait::async_trait]
pub trait ReportStore: Send + Sync {
    /// Persist a validated report, assigning its id and timestamps.
    async fn create(&self, report: ErrorReport) -> StoreResult<StoredReport>;

    async fn find(&self, id: i64) -> StoreResult<Option<StoredReport>>;

    async fn list(&self, query: &ReportQuery) -> StoreResult<Vec<StoredReport>>;

    async fn count(&self, domain: Option<&str>) -> StoreResult<u64>;

    /// Replace the report fields, keeping id and creation time.
    async fn update(&self, id: i64, report: ErrorReport) -> StoreResult<Option<StoredReport>>;

    /// Returns `false` when no report had this id.
    async fn delete(&self, id: i64) -> StoreResult<bool>;

    async fn ping(&self) -> StoreResult<()>;
}

pub type DynReportStore = Arc<dyn ReportStore>;

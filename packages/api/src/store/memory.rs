//! In-memory report store
//!
//! Used for `DATABASE_URL=memory` and in tests. Nothing survives a restart.

use super::{ReportQuery, ReportStore, StoreResult};
use chrono::Utc;
use overlord_types::{ErrorReport, StoredReport};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};

pub struct MemoryReportStore {
    reports: RwLock<BTreeMap<i64, StoredReport>>,
    next_id: AtomicI64,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self {
            reports: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    pub fn len(&self) -> usize {
        self.reports.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.read().is_empty()
    }
}

impl Default for MemoryReportStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches_domain(report: &StoredReport, domain: Option<&str>) -> bool {
    domain.is_none_or(|d| report.report.domain == d)
}

#[async_trait::async_trait]
impl ReportStore for MemoryReportStore {
    async fn create(&self, report: ErrorReport) -> StoreResult<StoredReport> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let now = Utc::now();
        let stored = StoredReport {
            id,
            created_at: now,
            updated_at: now,
            report,
        };

        self.reports.write().insert(id, stored.clone());
        Ok(stored)
    }

    async fn find(&self, id: i64) -> StoreResult<Option<StoredReport>> {
        Ok(self.reports.read().get(&id).cloned())
    }

    async fn list(&self, query: &ReportQuery) -> StoreResult<Vec<StoredReport>> {
        let reports = self.reports.read();
        Ok(reports
            .values()
            .rev()
            .filter(|r| matches_domain(r, query.domain.as_deref()))
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, domain: Option<&str>) -> StoreResult<u64> {
        let reports = self.reports.read();
        Ok(reports
            .values()
            .filter(|r| matches_domain(r, domain))
            .count() as u64)
    }

    async fn update(&self, id: i64, report: ErrorReport) -> StoreResult<Option<StoredReport>> {
        let mut reports = self.reports.write();
        let Some(stored) = reports.get_mut(&id) else {
            return Ok(None);
        };
        stored.report = report;
        stored.updated_at = Utc::now();
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        Ok(self.reports.write().remove(&id).is_some())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

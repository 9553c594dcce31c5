//! SQL report store implementation using SeaORM
//!
//! The table is created on startup when missing; there is no separate
//! migration step.

use super::{ReportQuery, ReportStore, StoreResult};
use async_trait::async_trait;
use chrono::Utc;
use overlord_types::{ErrorReport, StoredReport};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection,
    DbErr, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Schema, Set,
    Unchanged,
};
use std::time::Duration;

use crate::entity::error_report;

#[derive(Debug, Clone)]
pub struct DatabaseReportStore {
    db: DatabaseConnection,
}

impl DatabaseReportStore {
    pub async fn connect(db_url: &str) -> StoreResult<Self> {
        let mut opt = ConnectOptions::new(db_url.to_owned());
        // Every connection to an in-memory SQLite database gets its own copy.
        let max_connections = if db_url.contains(":memory:") { 1 } else { 10 };
        opt.max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .sqlx_logging(false);

        let db = Database::connect(opt).await?;
        Ok(Self { db })
    }

    /// Create the reports table if it does not exist yet.
    pub async fn migrate(&self) -> StoreResult<()> {
        let backend = self.db.get_database_backend();
        let mut stmt = Schema::new(backend).create_table_from_entity(error_report::Entity);
        stmt.if_not_exists();
        self.db.execute(backend.build(&stmt)).await?;
        tracing::info!("Report table ready");
        Ok(())
    }
}

fn to_active_model(report: ErrorReport) -> error_report::ActiveModel {
    error_report::ActiveModel {
        id: NotSet,
        domain: Set(report.domain),
        error_text: Set(report.error_text),
        url: Set(report.url),
        filename: Set(report.filename),
        line_number: Set(report.line),
        column_number: Set(report.column),
        datetime: Set(report.datetime),
        user_agent: Set(report.user_agent),
        stack_trace: Set(report.stack_trace),
        created_at: NotSet,
        updated_at: NotSet,
    }
}

// Ids outside the column range cannot exist in the table.
fn row_id(id: i64) -> Option<i32> {
    i32::try_from(id).ok()
}

#[async_trait]
impl ReportStore for DatabaseReportStore {
    async fn create(&self, report: ErrorReport) -> StoreResult<StoredReport> {
        let now = Utc::now().naive_utc();
        let mut model = to_active_model(report);
        model.created_at = Set(now);
        model.updated_at = Set(now);

        let inserted = model.insert(&self.db).await?;
        Ok(inserted.into())
    }

    async fn find(&self, id: i64) -> StoreResult<Option<StoredReport>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };
        let model = error_report::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list(&self, query: &ReportQuery) -> StoreResult<Vec<StoredReport>> {
        let mut select = error_report::Entity::find();
        if let Some(domain) = &query.domain {
            select = select.filter(error_report::Column::Domain.eq(domain.as_str()));
        }

        let models = select
            .order_by_desc(error_report::Column::Id)
            .offset(query.offset)
            .limit(query.limit)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn count(&self, domain: Option<&str>) -> StoreResult<u64> {
        let mut select = error_report::Entity::find();
        if let Some(domain) = domain {
            select = select.filter(error_report::Column::Domain.eq(domain));
        }
        Ok(select.count(&self.db).await?)
    }

    async fn update(&self, id: i64, report: ErrorReport) -> StoreResult<Option<StoredReport>> {
        let Some(id) = row_id(id) else {
            return Ok(None);
        };

        let mut model = to_active_model(report);
        model.id = Unchanged(id);
        model.updated_at = Set(Utc::now().naive_utc());

        // A missing row, including one deleted concurrently, updates nothing.
        match model.update(&self.db).await {
            Ok(updated) => Ok(Some(updated.into())),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete(&self, id: i64) -> StoreResult<bool> {
        let Some(id) = row_id(id) else {
            return Ok(false);
        };
        let result = error_report::Entity::delete_by_id(id)
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db.ping().await?;
        Ok(())
    }
}

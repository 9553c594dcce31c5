//! SeaORM entity for persisted client error reports.

use overlord_types::{ErrorReport, StoredReport};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "error_reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(column_type = "Text")]
    pub domain: String,

    #[sea_orm(column_name = "error_text", column_type = "Text")]
    pub error_text: String,

    #[sea_orm(column_type = "Text")]
    pub url: String,

    #[sea_orm(column_type = "Text")]
    pub filename: String,

    #[sea_orm(column_name = "line")]
    pub line_number: i64,

    #[sea_orm(column_name = "column")]
    pub column_number: i64,

    #[sea_orm(column_type = "Text")]
    pub datetime: String,

    #[sea_orm(column_name = "user_agent", column_type = "Text")]
    pub user_agent: String,

    #[sea_orm(column_name = "stack_trace", column_type = "Text")]
    pub stack_trace: String,

    #[sea_orm(column_name = "created_at")]
    pub created_at: DateTime,

    #[sea_orm(column_name = "updated_at")]
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for StoredReport {
    fn from(model: Model) -> Self {
        StoredReport {
            id: i64::from(model.id),
            created_at: model.created_at.and_utc(),
            updated_at: model.updated_at.and_utc(),
            report: ErrorReport {
                domain: model.domain,
                error_text: model.error_text,
                url: model.url,
                filename: model.filename,
                line: model.line_number,
                column: model.column_number,
                datetime: model.datetime,
                user_agent: model.user_agent,
                stack_trace: model.stack_trace,
            },
        }
    }
}

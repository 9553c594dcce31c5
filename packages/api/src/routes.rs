use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub mod auth;
pub mod health;
pub mod report;
pub mod reports;
pub mod script;

pub const DEFAULT_PAGE_SIZE: u64 = 50;
pub const MAX_PAGE_SIZE: u64 = 500;

#[derive(Clone, Deserialize, Serialize, Debug, Default, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ReportListParams {
    pub domain: Option<String>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
}

#[derive(Clone, Deserialize, Serialize, Debug, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

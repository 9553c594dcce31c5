//! Shared types for the Overlord error-telemetry backend.
//!
//! `report` holds the records that flow from the browser reporting script into
//! storage, `validation` holds the pipeline that decides whether such a record
//! is accepted.

pub mod report;
pub mod validation;

pub use anyhow::{Error, Result, anyhow};

pub use report::{ErrorReport, Field, StoredReport};
pub use validation::{ReportValidator, ValidationError};

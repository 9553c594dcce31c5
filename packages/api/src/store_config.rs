//! Report store configuration
//!
//! Resolves `DATABASE_URL` into one of the [`ReportStore`] backends.

use overlord_types::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, path::Path, sync::Arc};

use crate::store::{DatabaseReportStore, DynReportStore, MemoryReportStore};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://data/overlord.db?mode=rwc";

/// Store backend type
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Sqlite,
    Memory,
}

impl Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::Sqlite => write!(f, "sqlite"),
            StoreBackend::Memory => write!(f, "memory"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    /// Accepts either a bare backend name or a full database URL.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        match lower.as_str() {
            "memory" | "mem" => Ok(StoreBackend::Memory),
            "sqlite" => Ok(StoreBackend::Sqlite),
            url if url.starts_with("sqlite:") => Ok(StoreBackend::Sqlite),
            _ => Err(format!("Unknown store backend: {}", s)),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreConfig {
    pub database_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }

    pub fn from_env() -> Self {
        match std::env::var("DATABASE_URL") {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    pub fn backend(&self) -> Result<StoreBackend> {
        self.database_url.parse().map_err(|e: String| anyhow!(e))
    }

    /// Path of the SQLite file, if the URL names one on disk.
    pub fn sqlite_path(&self) -> Option<&Path> {
        let rest = self
            .database_url
            .strip_prefix("sqlite://")
            .or_else(|| self.database_url.strip_prefix("sqlite:"))?;
        let path = rest.split('?').next().unwrap_or_default();
        if path.is_empty() || path == ":memory:" {
            return None;
        }
        Some(Path::new(path))
    }

    pub async fn build_store(&self) -> Result<DynReportStore> {
        match self.backend()? {
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory report store, reports are lost on restart");
                Ok(Arc::new(MemoryReportStore::new()))
            }
            StoreBackend::Sqlite => {
                if let Some(parent) = self.sqlite_path().and_then(Path::parent)
                    && !parent.as_os_str().is_empty()
                {
                    std::fs::create_dir_all(parent)?;
                }

                let store = DatabaseReportStore::connect(&self.database_url).await?;
                store.migrate().await?;
                tracing::info!(backend = %StoreBackend::Sqlite, "Report store connected");
                Ok(Arc::new(store))
            }
        }
    }
}

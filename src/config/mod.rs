//! Configuration loading and management

use crate::core::error::{ConfigError, DirectoryError};
use crate::core::query::SortSpec;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;

/// How the displayed page is brought in line after a successful mutation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Append/replace/remove on the displayed page without refetching
    ///
    /// The page may not reflect filter, sort or page boundaries until the next
    /// pipeline run.
    #[default]
    Patch,
    /// Re-run the whole pipeline after every mutation
    Refetch,
}

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectoryConfig {
    /// Collection endpoint of the JSON store
    pub base_url: String,

    /// Records per page
    pub page_size: usize,

    /// Sort applied before any column is clicked
    pub default_sort: SortSpec,

    /// Per-request timeout for the HTTP store
    pub request_timeout_secs: u64,

    /// Post-mutation reconciliation strategy
    pub reconcile: ReconcileMode,

    /// Buffer size of the event bus
    pub event_capacity: usize,

    /// `tracing` filter used when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3030/jsonstore/users".to_string(),
            page_size: 5,
            default_sort: SortSpec::default(),
            request_timeout_secs: 10,
            reconcile: ReconcileMode::Patch,
            event_capacity: 256,
            log_filter: "info".to_string(),
        }
    }
}

impl DirectoryConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(DirectoryError::from)?;
        let config: Self = serde_yaml::from_str(&content).map_err(|e| {
            DirectoryError::from(ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            })
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml).map_err(DirectoryError::from)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the controller cannot work with
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &str, value: String, message: &str| -> anyhow::Error {
            DirectoryError::from(ConfigError::InvalidValue {
                field: field.to_string(),
                value,
                message: message.to_string(),
            })
            .into()
        };

        if self.base_url.trim().is_empty() {
            return Err(invalid("base_url", self.base_url.clone(), "must not be empty"));
        }
        if self.page_size == 0 {
            return Err(invalid("page_size", "0".to_string(), "must be positive"));
        }
        if self.request_timeout_secs == 0 {
            return Err(invalid(
                "request_timeout_secs",
                "0".to_string(),
                "must be positive",
            ));
        }
        if self.event_capacity == 0 {
            return Err(invalid("event_capacity", "0".to_string(), "must be positive"));
        }
        Ok(())
    }

    /// Page size as the paginator takes it; falls back to 1 for an unvalidated 0
    pub fn page_size(&self) -> NonZeroUsize {
        NonZeroUsize::new(self.page_size).unwrap_or(NonZeroUsize::MIN)
    }
}

//! # User Directory
//!
//! Client-side core of a user directory: fetch user records from a JSON store,
//! filter, sort and paginate them, and keep the displayed page in step with
//! create, edit and delete.
//!
//! ## Features
//!
//! - **One pipeline**: fetch → filter → sort → paginate → current page, re-run on every control event
//! - **Single state aggregate**: criterion, sort, page size and page index change through one reducer
//! - **Stale-run protection**: numbered runs, late completions are dropped
//! - **Mutation reconciliation**: patch the displayed page or refetch, per configuration
//! - **Pluggable stores**: in-memory (`in-memory` feature) and HTTP JSON store (`http` feature)
//! - **Events**: broadcast bus for presentation layers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use user_directory::prelude::*;
//! use std::sync::Arc;
//!
//! let config = DirectoryConfig::from_yaml_file("directory.yaml")?;
//! telemetry::init_tracing(&config.log_filter);
//!
//! let store = Arc::new(HttpUserStore::from_config(&config)?);
//! let mut list = ListController::from_config(store, &config);
//!
//! list.refresh().await?;
//! list.search("sofia", "not selected").await?;
//! list.sort_by(RecordField::LastName).await?;
//! list.go_to_page(2).await?;
//!
//! for user in list.records() {
//!     println!("{} <{}>", user.full_name(), user.email.as_deref().unwrap_or(""));
//! }
//! ```

pub mod config;
pub mod controller;
pub mod core;
pub mod storage;
pub mod telemetry;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ConfigError, DirectoryError, RecordError, StoreError, ValidationError},
        events::{DirectoryEvent, EventBus, EventEnvelope},
        field::{FieldFormat, RecordField},
        filter::{EmptyReason, apply_filter},
        mutation::{Clock, FixedClock, RecordMutator, SystemClock},
        paginate::{page, page_count, paginate},
        query::{NONE_SENTINEL, PageInfo, SearchCriterion, SortDirection, SortSpec},
        record::{Address, RecordBody, RecordId, UserForm, UserRecord},
        service::UserStore,
        sort::sort_records,
    };

    // === Controller ===
    pub use crate::controller::{
        ListAction, ListController, ListState, ListStatus, PipelineRun, RunOutcome,
    };

    // === Storage ===
    #[cfg(feature = "http")]
    pub use crate::storage::HttpUserStore;
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryUserStore;

    // === Config ===
    pub use crate::config::{DirectoryConfig, ReconcileMode};

    pub use crate::telemetry;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use serde::{Deserialize, Serialize};
}

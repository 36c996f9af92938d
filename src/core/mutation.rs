//! Record mutation adapter
//!
//! Turns a flat [`UserForm`] into the nested body the store expects, stamps
//! timestamps, and performs the remote write. Updates read the stored record
//! first so its creation timestamp survives unchanged.

use crate::core::error::{DirectoryError, RecordError};
use crate::core::record::{RecordBody, RecordId, UserForm, UserRecord};
use crate::core::service::UserStore;
use anyhow::Result;
use chrono::{DateTime, SecondsFormat, Utc};
use std::sync::Arc;

/// Source of "now" for timestamps
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// ISO-8601 UTC with millisecond precision, e.g. `2022-01-22T19:30:00.000Z`
pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Body for a new record: both timestamps set to `now`
pub fn prepare_create(form: UserForm, now: DateTime<Utc>) -> RecordBody {
    let stamp = iso_timestamp(now);
    build_body(form, None, Some(stamp.clone()), stamp)
}

/// Body replacing record `id`: only the update timestamp is new
pub fn prepare_update(
    id: RecordId,
    form: UserForm,
    created_at: Option<String>,
    now: DateTime<Utc>,
) -> RecordBody {
    build_body(form, Some(id), created_at, iso_timestamp(now))
}

fn build_body(
    form: UserForm,
    id: Option<RecordId>,
    created_at: Option<String>,
    updated_at: String,
) -> RecordBody {
    let (scalars, address) = form.into_parts();
    RecordBody {
        id,
        first_name: scalars.first_name,
        last_name: scalars.last_name,
        email: scalars.email,
        phone_number: scalars.phone_number,
        image_url: scalars.image_url,
        address,
        created_at,
        updated_at,
    }
}

/// Performs create/update/delete against a [`UserStore`]
#[derive(Clone)]
pub struct RecordMutator {
    store: Arc<dyn UserStore>,
    clock: Arc<dyn Clock>,
}

impl RecordMutator {
    pub fn new(store: Arc<dyn UserStore>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn UserStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Validate the form and store it as a new record
    pub async fn create(&self, form: UserForm) -> Result<UserRecord> {
        form.validate().map_err(DirectoryError::from)?;
        let body = prepare_create(form, self.clock.now());
        let created = self.store.create(body).await?;
        tracing::debug!(id = %created.id, "created user record");
        Ok(created)
    }

    /// Validate the form and replace record `id`, keeping its creation timestamp
    ///
    /// Fails with [`RecordError::NotFound`] without writing if the record is gone.
    pub async fn update(&self, id: &RecordId, form: UserForm) -> Result<UserRecord> {
        form.validate().map_err(DirectoryError::from)?;

        let existing = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| DirectoryError::from(RecordError::NotFound { id: id.clone() }))?;

        let body = prepare_update(id.clone(), form, existing.created_at, self.clock.now());
        let updated = self.store.update(id, body).await?;
        tracing::debug!(id = %updated.id, "updated user record");
        Ok(updated)
    }

    pub async fn delete(&self, id: &RecordId) -> Result<()> {
        self.store.delete(id).await?;
        tracing::debug!(id = %id, "deleted user record");
        Ok(())
    }
}

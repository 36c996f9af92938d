//! In-memory implementation of UserStore for testing and development

use crate::core::error::{DirectoryError, RecordError, StoreError};
use crate::core::record::{RecordBody, RecordId, UserRecord};
use crate::core::service::UserStore;
use anyhow::Result;
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory user store
///
/// Keeps records in insertion order and assigns UUID v4 identifiers on create.
/// Clones share the same records.
#[derive(Clone, Default)]
pub struct InMemoryUserStore {
    records: Arc<RwLock<IndexMap<RecordId, UserRecord>>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with `records`, keeping their identifiers
    pub fn with_records(records: impl IntoIterator<Item = UserRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        Self {
            records: Arc::new(RwLock::new(records)),
        }
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, IndexMap<RecordId, UserRecord>>> {
        self.records.read().map_err(|e| {
            DirectoryError::from(StoreError::Unavailable {
                backend: "in-memory".to_string(),
                message: format!("Failed to acquire read lock: {}", e),
            })
            .into()
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, IndexMap<RecordId, UserRecord>>> {
        self.records.write().map_err(|e| {
            DirectoryError::from(StoreError::Unavailable {
                backend: "in-memory".to_string(),
                message: format!("Failed to acquire write lock: {}", e),
            })
            .into()
        })
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list(&self) -> Result<Vec<UserRecord>> {
        Ok(self.read()?.values().cloned().collect())
    }

    async fn get(&self, id: &RecordId) -> Result<Option<UserRecord>> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn create(&self, body: RecordBody) -> Result<UserRecord> {
        let id = RecordId::new(Uuid::new_v4().to_string());
        let record = body.into_record(id.clone());

        self.write()?.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, id: &RecordId, body: RecordBody) -> Result<UserRecord> {
        let mut records = self.write()?;

        let slot = records
            .get_mut(id)
            .ok_or_else(|| DirectoryError::from(RecordError::NotFound { id: id.clone() }))?;

        *slot = body.into_record(id.clone());

        Ok(slot.clone())
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        // shift_remove keeps the remaining records in insertion order
        self.write()?
            .shift_remove(id)
            .ok_or_else(|| DirectoryError::from(RecordError::NotFound { id: id.clone() }))?;

        Ok(())
    }
}

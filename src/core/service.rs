//! Backing store trait

use crate::core::record::{RecordBody, RecordId, UserRecord};
use anyhow::Result;
use async_trait::async_trait;

/// Remote collection of user records
///
/// Implementations own the transport. Identifiers are assigned by the store on
/// create; update always replaces the full record.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch every record
    async fn list(&self) -> Result<Vec<UserRecord>>;

    /// Fetch one record by identifier
    async fn get(&self, id: &RecordId) -> Result<Option<UserRecord>>;

    /// Store a new record and return it with its assigned identifier
    async fn create(&self, body: RecordBody) -> Result<UserRecord>;

    /// Replace an existing record
    async fn update(&self, id: &RecordId, body: RecordBody) -> Result<UserRecord>;

    /// Delete a record
    async fn delete(&self, id: &RecordId) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct EmptyStore;

    #[async_trait]
    impl UserStore for EmptyStore {
        async fn list(&self) -> Result<Vec<UserRecord>> {
            Ok(vec![])
        }
        async fn get(&self, _id: &RecordId) -> Result<Option<UserRecord>> {
            Ok(None)
        }
        async fn create(&self, body: RecordBody) -> Result<UserRecord> {
            Ok(body.into_record(RecordId::from("new")))
        }
        async fn update(&self, id: &RecordId, body: RecordBody) -> Result<UserRecord> {
            Ok(body.into_record(id.clone()))
        }
        async fn delete(&self, _id: &RecordId) -> Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_trait_object_usable() {
        let store: Arc<dyn UserStore> = Arc::new(EmptyStore);
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.get(&RecordId::from("x")).await.unwrap().is_none());
    }
}

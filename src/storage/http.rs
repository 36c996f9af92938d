//! HTTP implementation of UserStore for a JSON document store
//!
//! Speaks the plain REST dialect of a JSON collection endpoint:
//!
//! | Operation | Request               |
//! |-----------|-----------------------|
//! | list      | `GET    {base}`       |
//! | get       | `GET    {base}/{id}`  |
//! | create    | `POST   {base}`       |
//! | update    | `PUT    {base}/{id}`  |
//! | delete    | `DELETE {base}/{id}`  |
//!
//! The list endpoint may answer with an object keyed by identifier or with an
//! array of records.

use crate::config::DirectoryConfig;
use crate::core::error::{DirectoryError, StoreError};
use crate::core::record::{RecordBody, RecordId, UserRecord};
use crate::core::service::UserStore;
use anyhow::Result;
use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

const BACKEND: &str = "http";

/// User store backed by a remote JSON collection
#[derive(Debug, Clone)]
pub struct HttpUserStore {
    client: Client,
    base_url: String,
}

impl HttpUserStore {
    /// Store talking to `base_url` with a default client
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    /// Store built from configuration (base URL and request timeout)
    pub fn from_config(config: &DirectoryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| connection_error(&e))?;
        Ok(Self::with_client(client, config.base_url.clone()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn record_url(&self, id: &RecordId) -> String {
        format!("{}/{}", self.base_url, id)
    }
}

fn connection_error(err: &reqwest::Error) -> DirectoryError {
    DirectoryError::from(StoreError::ConnectionError {
        backend: BACKEND.to_string(),
        message: err.to_string(),
    })
}

/// Fail on non-success statuses, keeping the body text for the message
async fn check_status(operation: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response.text().await.unwrap_or_default();
    Err(DirectoryError::from(StoreError::UnexpectedStatus {
        operation: operation.to_string(),
        status: status.as_u16(),
        message,
    })
    .into())
}

async fn decode<T: DeserializeOwned>(operation: &str, response: Response) -> Result<T> {
    response.json::<T>().await.map_err(|e| {
        DirectoryError::from(StoreError::DecodeError {
            operation: operation.to_string(),
            message: e.to_string(),
        })
        .into()
    })
}

/// Records from a list payload, in document order
///
/// Entries that are not records are skipped so one bad entry does not hide
/// the rest of the collection.
pub fn records_from_listing(payload: Value) -> Result<Vec<UserRecord>> {
    let entries: Vec<Value> = match payload {
        Value::Array(items) => items,
        Value::Object(map) => map.into_iter().map(|(_, v)| v).collect(),
        Value::Null => Vec::new(),
        other => {
            return Err(DirectoryError::from(StoreError::DecodeError {
                operation: "list".to_string(),
                message: format!("expected an object or array, got {}", other),
            })
            .into());
        }
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<UserRecord>(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "skipping malformed user record");
                None
            }
        })
        .collect())
}

#[async_trait]
impl UserStore for HttpUserStore {
    async fn list(&self) -> Result<Vec<UserRecord>> {
        tracing::debug!(url = %self.base_url, "GET user list");
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| connection_error(&e))?;
        let payload: Value = decode("list", check_status("list", response).await?).await?;
        records_from_listing(payload)
    }

    async fn get(&self, id: &RecordId) -> Result<Option<UserRecord>> {
        let url = self.record_url(id);
        tracing::debug!(url = %url, "GET user");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| connection_error(&e))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let record = decode("get", check_status("get", response).await?).await?;
        Ok(Some(record))
    }

    async fn create(&self, body: RecordBody) -> Result<UserRecord> {
        tracing::debug!(url = %self.base_url, "POST user");
        let response = self
            .client
            .post(&self.base_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| connection_error(&e))?;
        decode("create", check_status("create", response).await?).await
    }

    async fn update(&self, id: &RecordId, body: RecordBody) -> Result<UserRecord> {
        let url = self.record_url(id);
        tracing::debug!(url = %url, "PUT user");
        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| connection_error(&e))?;
        decode("update", check_status("update", response).await?).await
    }

    async fn delete(&self, id: &RecordId) -> Result<()> {
        let url = self.record_url(id);
        tracing::debug!(url = %url, "DELETE user");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(|e| connection_error(&e))?;
        // The confirmation body is not part of the contract
        check_status("delete", response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_listing_from_keyed_object() {
        let payload = json!({
            "b2": {"_id": "b2", "firstName": "Maria"},
            "a1": {"_id": "a1", "firstName": "Ivan"}
        });
        let records = records_from_listing(payload).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.id.as_str() == "a1"));
    }

    #[test]
    fn test_listing_from_array_keeps_order() {
        let payload = json!([{"_id": "z"}, {"_id": "a"}]);
        let ids: Vec<String> = records_from_listing(payload)
            .unwrap()
            .into_iter()
            .map(|r| r.id.0)
            .collect();
        assert_eq!(ids, vec!["z", "a"]);
    }

    #[test]
    fn test_listing_skips_malformed_entries() {
        let payload = json!([{"_id": "ok"}, {"firstName": "no id"}, 42]);
        let records = records_from_listing(payload).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_listing_rejects_scalars() {
        assert!(records_from_listing(json!("nope")).is_err());
        assert!(records_from_listing(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpUserStore::new("http://localhost:3030/jsonstore/users/");
        assert_eq!(store.base_url(), "http://localhost:3030/jsonstore/users");
        assert_eq!(
            store.record_url(&RecordId::from("a1")),
            "http://localhost:3030/jsonstore/users/a1"
        );
    }
}

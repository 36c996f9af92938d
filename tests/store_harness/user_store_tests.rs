//! Macro-generated test suite for `UserStore` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! use user_directory::storage::InMemoryUserStore;
//!
//! user_store_tests!(InMemoryUserStore::new());
//! ```
//!
//! # Generated Tests
//!
//! ## CRUD
//! - `test_list_empty` — list on an empty store returns an empty vec
//! - `test_create_and_get` — create assigns an id, get returns the stored record
//! - `test_get_nonexistent` — unknown id returns None
//! - `test_list_keeps_creation_order` — records come back in the order created
//! - `test_update_existing` — full replacement keeps the id
//! - `test_update_nonexistent` — update of an unknown id is an error
//! - `test_delete_existing` — delete then get returns None
//! - `test_delete_nonexistent` — delete of an unknown id is an error
//!
//! ## Concurrency
//! - `test_concurrent_creates` — parallel creates from spawned tasks

/// Generate a full `UserStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store implementing
/// `UserStore + Clone + 'static`. It may contain `.await`, and is
/// re-evaluated for each test.
macro_rules! user_store_tests {
    ($factory:expr) => {
        mod user_store_contract_tests {
            use super::*;
            use user_directory::core::mutation::prepare_update;
            use user_directory::core::record::RecordId;
            use user_directory::core::service::UserStore;

            #[tokio::test]
            async fn test_list_empty() {
                let store = $factory;
                let all = store.list().await.unwrap();
                assert!(all.is_empty(), "List on empty store should return empty vec");
            }

            #[tokio::test]
            async fn test_create_and_get() {
                let store = $factory;

                let created = store.create(body("Alice")).await.unwrap();
                assert!(!created.id.as_str().is_empty(), "Store must assign an id");
                assert_eq!(created.first_name.as_deref(), Some("Alice"));
                assert_eq!(created.created_at.as_deref(), Some("2022-01-01T10:00:00.000Z"));

                let fetched = store.get(&created.id).await.unwrap();
                let fetched = fetched.expect("record should exist after create");
                assert_eq!(fetched.id, created.id);
                assert_eq!(fetched.email.as_deref(), Some("alice@test.com"));
                let address = fetched.address.expect("address should be nested");
                assert_eq!(address.city.as_deref(), Some("Plovdiv"));
            }

            #[tokio::test]
            async fn test_get_nonexistent() {
                let store = $factory;
                let result = store.get(&RecordId::from("missing")).await.unwrap();
                assert!(result.is_none(), "Unknown id should return None");
            }

            #[tokio::test]
            async fn test_list_keeps_creation_order() {
                let store = $factory;
                for name in ["Carol", "Alice", "Bob"] {
                    store.create(body(name)).await.unwrap();
                }

                let names: Vec<String> = store
                    .list()
                    .await
                    .unwrap()
                    .into_iter()
                    .filter_map(|r| r.first_name)
                    .collect();
                assert_eq!(names, vec!["Carol", "Alice", "Bob"]);
            }

            #[tokio::test]
            async fn test_update_existing() {
                let store = $factory;
                let created = store.create(body("Alice")).await.unwrap();

                let replacement = prepare_update(
                    created.id.clone(),
                    form("Alicia", "Test", "alicia@test.com"),
                    created.created_at.clone(),
                    at_day(9),
                );
                let updated = store.update(&created.id, replacement).await.unwrap();
                assert_eq!(updated.id, created.id);
                assert_eq!(updated.first_name.as_deref(), Some("Alicia"));
                assert_eq!(updated.created_at, created.created_at);
                assert_eq!(updated.updated_at.as_deref(), Some("2022-01-09T10:00:00.000Z"));

                let fetched = store.get(&created.id).await.unwrap().unwrap();
                assert_eq!(fetched.email.as_deref(), Some("alicia@test.com"));
                assert_count(&store.list().await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_update_nonexistent() {
                let store = $factory;
                let id = RecordId::from("missing");
                let replacement =
                    prepare_update(id.clone(), form("Ghost", "User", "g@test.com"), None, at_day(2));
                assert!(store.update(&id, replacement).await.is_err());
            }

            #[tokio::test]
            async fn test_delete_existing() {
                let store = $factory;
                let keep = store.create(body("Keep")).await.unwrap();
                let gone = store.create(body("Gone")).await.unwrap();

                store.delete(&gone.id).await.unwrap();

                assert!(store.get(&gone.id).await.unwrap().is_none());
                let remaining = store.list().await.unwrap();
                assert_eq!(ids(&remaining), vec![keep.id.as_str()]);
            }

            #[tokio::test]
            async fn test_delete_nonexistent() {
                let store = $factory;
                assert!(store.delete(&RecordId::from("missing")).await.is_err());
            }

            #[tokio::test]
            async fn test_concurrent_creates() {
                let store = $factory;

                let handles: Vec<_> = (0..10)
                    .map(|i| {
                        let store = store.clone();
                        tokio::spawn(async move {
                            store.create(body(&format!("User{}", i))).await.unwrap()
                        })
                    })
                    .collect();

                let mut created = Vec::new();
                for handle in handles {
                    created.push(handle.await.unwrap().id);
                }
                created.sort_by(|a, b| a.as_str().cmp(b.as_str()));
                created.dedup();

                assert_count(&created, 10);
                assert_count(&store.list().await.unwrap(), 10);
            }
        }
    };
}

//! Integration tests for [`MongoOrderStore`] against a real MongoDB.
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a MongoDB container)
//! - Feature flag `container-tests` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features container-tests --test mongo_store
//! ```
//!
//! All tests share a single container; each test gets its own database so
//! they can run in parallel without interfering.

#![cfg(feature = "container-tests")]

use mongodb::Client;
use mongodb::bson::oid::ObjectId;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tableside::prelude::*;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;

const DEADLINE: Duration = Duration::from_secs(100);

struct MongoTestEnv {
    /// Container handle, dropping this stops the MongoDB container.
    _container: testcontainers::ContainerAsync<Mongo>,
    connection_url: String,
}

static TEST_ENV: OnceLock<MongoTestEnv> = OnceLock::new();
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

async fn init_mongo_env() -> &'static MongoTestEnv {
    if let Some(env) = TEST_ENV.get() {
        return env;
    }

    let container = Mongo::default()
        .start()
        .await
        .expect("failed to start MongoDB container, is Docker running?");

    let host = container.get_host().await.unwrap();
    let port = container.get_host_port_ipv4(27017).await.unwrap();
    let url = format!("mongodb://{}:{}", host, port);

    let _ = TEST_ENV.set(MongoTestEnv {
        _container: container,
        connection_url: url,
    });
    TEST_ENV.get().unwrap()
}

/// Fresh store over a unique database per test.
async fn mongo_store() -> MongoOrderStore {
    let env = init_mongo_env().await;
    let client = Client::with_uri_str(&env.connection_url)
        .await
        .expect("failed to connect to MongoDB");
    let db_num = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
    MongoOrderStore::new(client.database(&format!("tableside_test_{}", db_num)))
}

fn order(dish: &str, server: Option<&str>) -> Order {
    Order {
        id: ObjectId::new(),
        dish: dish.to_string(),
        price: 10.0,
        server: server.map(str::to_string),
        table: None,
    }
}

#[tokio::test]
async fn insert_then_find_one_roundtrips() {
    let store = mongo_store().await;
    let pasta = order("Pasta", Some("Ana"));

    let id = store.insert_one(&pasta, DEADLINE).await.unwrap();
    assert_eq!(id, pasta.id);

    let found = store.find_one_by_id(&pasta.id, DEADLINE).await.unwrap();
    assert_eq!(found, pasta);
}

#[tokio::test]
async fn find_one_missing_is_not_found() {
    let store = mongo_store().await;
    let result = store.find_one_by_id(&ObjectId::new(), DEADLINE).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

#[tokio::test]
async fn find_filters_by_server_equality() {
    let store = mongo_store().await;
    let ana = order("Pasta", Some("Ana"));
    let lee = order("Soup", Some("Lee"));
    store.insert_one(&ana, DEADLINE).await.unwrap();
    store.insert_one(&lee, DEADLINE).await.unwrap();

    let all = store.find(OrderFilter::All, DEADLINE).await.unwrap();
    assert_eq!(all.len(), 2);

    let found = store
        .find(OrderFilter::ByServer("Ana".to_string()), DEADLINE)
        .await
        .unwrap();
    assert_eq!(found, vec![ana]);
}

#[tokio::test]
async fn set_server_updates_one_document() {
    let store = mongo_store().await;
    let pasta = order("Pasta", Some("Ana"));
    store.insert_one(&pasta, DEADLINE).await.unwrap();

    let modified = store
        .update_one(
            &pasta.id,
            OrderUpdate::SetServer(Some("Lee".to_string())),
            DEADLINE,
        )
        .await
        .unwrap();
    assert_eq!(modified, 1);

    let found = store.find_one_by_id(&pasta.id, DEADLINE).await.unwrap();
    assert_eq!(found.server.as_deref(), Some("Lee"));
    assert_eq!(found.dish, "Pasta");
}

#[tokio::test]
async fn set_server_null_clears_field() {
    let store = mongo_store().await;
    let pasta = order("Pasta", Some("Ana"));
    store.insert_one(&pasta, DEADLINE).await.unwrap();

    let modified = store
        .update_one(&pasta.id, OrderUpdate::SetServer(None), DEADLINE)
        .await
        .unwrap();
    assert_eq!(modified, 1);

    let found = store.find_one_by_id(&pasta.id, DEADLINE).await.unwrap();
    assert_eq!(found.server, None);
}

#[tokio::test]
async fn replace_keeps_the_id() {
    let store = mongo_store().await;
    let pasta = order("Pasta", Some("Ana"));
    store.insert_one(&pasta, DEADLINE).await.unwrap();

    let mut replacement = order("Risotto", Some("Lee"));
    replacement.id = pasta.id;
    let modified = store
        .update_one(
            &pasta.id,
            OrderUpdate::Replace(replacement.clone()),
            DEADLINE,
        )
        .await
        .unwrap();
    assert_eq!(modified, 1);

    let found = store.find_one_by_id(&pasta.id, DEADLINE).await.unwrap();
    assert_eq!(found, replacement);
}

#[tokio::test]
async fn update_unknown_id_modifies_nothing() {
    let store = mongo_store().await;
    let modified = store
        .update_one(
            &ObjectId::new(),
            OrderUpdate::SetServer(Some("Lee".to_string())),
            DEADLINE,
        )
        .await
        .unwrap();
    assert_eq!(modified, 0);
}

#[tokio::test]
async fn delete_removes_exactly_one() {
    let store = mongo_store().await;
    let pasta = order("Pasta", None);
    store.insert_one(&pasta, DEADLINE).await.unwrap();

    let deleted = store.delete_one_by_id(&pasta.id, DEADLINE).await.unwrap();
    assert_eq!(deleted, 1);
    let deleted_again = store.delete_one_by_id(&pasta.id, DEADLINE).await.unwrap();
    assert_eq!(deleted_again, 0);

    let result = store.find_one_by_id(&pasta.id, DEADLINE).await;
    assert!(matches!(result, Err(StoreError::NotFound { .. })));
}

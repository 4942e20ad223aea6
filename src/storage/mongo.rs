//! MongoDB-backed order store.
//!
//! Orders live in the [`ORDERS_COLLECTION`] collection of the configured
//! database, with `_id` stored as the 24-character hex form of the ObjectId
//! assigned at creation (see [`crate::order`] for the mapping).
//!
//! Every driver call is raced against its deadline with
//! [`tokio::time::timeout`]; when the deadline wins, the in-flight call is
//! dropped and the operation fails with [`StoreError::Timeout`]. Each
//! operation is a single document-level call, so nothing needs rolling back.

use crate::error::StoreError;
use crate::order::Order;
use crate::storage::{OrderFilter, OrderStore, OrderUpdate};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::Database;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{Bson, Document, doc};
use std::future::IntoFuture;
use std::time::Duration;

/// Name of the collection holding order documents.
pub const ORDERS_COLLECTION: &str = "orders";

/// Thin accessor binding the orders collection of a named database to a
/// live client connection. The underlying client pools connections, so one
/// store instance is shared across all requests.
#[derive(Clone, Debug)]
pub struct MongoOrderStore {
    collection: mongodb::Collection<Order>,
}

impl MongoOrderStore {
    pub fn new(database: Database) -> Self {
        Self {
            collection: database.collection(ORDERS_COLLECTION),
        }
    }
}

/// Race a driver call against the deadline.
async fn bounded<T, F>(op: &'static str, deadline: Duration, fut: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, mongodb::error::Error>>,
{
    match tokio::time::timeout(deadline, fut).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(err)) => Err(StoreError::Backend {
            op,
            message: err.to_string(),
        }),
        Err(_) => Err(StoreError::Timeout { op, deadline }),
    }
}

fn id_query(id: &ObjectId) -> Document {
    doc! { "_id": id.to_hex() }
}

fn filter_query(filter: &OrderFilter) -> Document {
    match filter {
        OrderFilter::All => doc! {},
        OrderFilter::ByServer(server) => doc! { "server": server },
    }
}

fn set_server_update(server: &Option<String>) -> Document {
    let value = match server {
        Some(name) => Bson::String(name.clone()),
        None => Bson::Null,
    };
    doc! { "$set": { "server": value } }
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    async fn insert_one(&self, order: &Order, deadline: Duration) -> Result<ObjectId, StoreError> {
        bounded("insert_one", deadline, self.collection.insert_one(order).into_future()).await?;
        Ok(order.id)
    }

    async fn find(
        &self,
        filter: OrderFilter,
        deadline: Duration,
    ) -> Result<Vec<Order>, StoreError> {
        let query = filter_query(&filter);
        let fut = async {
            let cursor = self.collection.find(query).await?;
            cursor.try_collect::<Vec<Order>>().await
        };
        bounded("find", deadline, fut).await
    }

    async fn find_one_by_id(
        &self,
        id: &ObjectId,
        deadline: Duration,
    ) -> Result<Order, StoreError> {
        bounded("find_one", deadline, self.collection.find_one(id_query(id)).into_future())
            .await?
            .ok_or_else(|| StoreError::NotFound { id: id.to_hex() })
    }

    async fn update_one(
        &self,
        id: &ObjectId,
        update: OrderUpdate,
        deadline: Duration,
    ) -> Result<u64, StoreError> {
        let result = match update {
            OrderUpdate::SetServer(server) => {
                let change = set_server_update(&server);
                bounded(
                    "update_one",
                    deadline,
                    self.collection.update_one(id_query(id), change).into_future(),
                )
                .await?
            }
            OrderUpdate::Replace(order) => {
                bounded(
                    "replace_one",
                    deadline,
                    self.collection.replace_one(id_query(id), &order).into_future(),
                )
                .await?
            }
        };
        Ok(result.modified_count)
    }

    async fn delete_one_by_id(
        &self,
        id: &ObjectId,
        deadline: Duration,
    ) -> Result<u64, StoreError> {
        let result = bounded(
            "delete_one",
            deadline,
            self.collection.delete_one(id_query(id)).into_future(),
        )
        .await?;
        Ok(result.deleted_count)
    }
}

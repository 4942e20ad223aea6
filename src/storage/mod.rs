//! Storage abstraction over the orders collection.
//!
//! [`OrderStore`] exposes the five collection primitives the handlers need,
//! with queries and mutations described by typed values ([`OrderFilter`],
//! [`OrderUpdate`]) instead of loosely shaped documents. Every call takes a
//! deadline measured from the start of the surrounding request and fails with
//! [`StoreError::Timeout`] instead of blocking past it.
//!
//! No business logic lives here; validation happens before a store call and
//! response mapping after it.

mod memory;
mod mongo;

pub use memory::InMemoryOrderStore;
pub use mongo::{MongoOrderStore, ORDERS_COLLECTION};

use crate::error::StoreError;
use crate::order::Order;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::time::Duration;

/// Equality filter for list queries.
#[derive(Debug, Clone, PartialEq)]
pub enum OrderFilter {
    /// Unfiltered scan of the whole collection.
    All,
    /// Orders whose `server` field equals the given waiter name.
    ByServer(String),
}

/// Mutation applied by [`OrderStore::update_one`].
#[derive(Debug, Clone, PartialEq)]
pub enum OrderUpdate {
    /// Set (or clear, with `None`) the `server` field only.
    SetServer(Option<String>),
    /// Replace every mutable field with those of the given order.
    Replace(Order),
}

/// The collection primitives backing the order endpoints.
///
/// Implementations must be safe for concurrent use; handlers share a single
/// store behind an `Arc`.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order document, returning its identifier.
    async fn insert_one(&self, order: &Order, deadline: Duration) -> Result<ObjectId, StoreError>;

    /// Fetch all orders matching the filter, in insertion order.
    async fn find(&self, filter: OrderFilter, deadline: Duration)
    -> Result<Vec<Order>, StoreError>;

    /// Fetch exactly one order by id. A missing document is an error.
    async fn find_one_by_id(&self, id: &ObjectId, deadline: Duration)
    -> Result<Order, StoreError>;

    /// Apply a mutation to the order with the given id, returning the number
    /// of documents modified (0 or 1).
    async fn update_one(
        &self,
        id: &ObjectId,
        update: OrderUpdate,
        deadline: Duration,
    ) -> Result<u64, StoreError>;

    /// Delete the order with the given id, returning the number of documents
    /// removed (0 or 1).
    async fn delete_one_by_id(&self, id: &ObjectId, deadline: Duration)
    -> Result<u64, StoreError>;
}

//! In-memory order store for tests and local development.
//!
//! Keeps orders in a `Vec` behind an `RwLock` so list results come back in
//! insertion order, matching what an unindexed collection scan returns.
//! Deadlines are accepted for interface parity but never elapse here.

use crate::error::StoreError;
use crate::order::Order;
use crate::storage::{OrderFilter, OrderStore, OrderUpdate};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use std::sync::{Arc, RwLock};
use std::time::Duration;

#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_failure(op: &'static str) -> StoreError {
    StoreError::Backend {
        op,
        message: "order store lock poisoned".to_string(),
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_one(&self, order: &Order, _deadline: Duration) -> Result<ObjectId, StoreError> {
        let mut orders = self.orders.write().map_err(|_| lock_failure("insert_one"))?;
        orders.push(order.clone());
        Ok(order.id)
    }

    async fn find(
        &self,
        filter: OrderFilter,
        _deadline: Duration,
    ) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().map_err(|_| lock_failure("find"))?;
        Ok(orders
            .iter()
            .filter(|order| match &filter {
                OrderFilter::All => true,
                OrderFilter::ByServer(server) => order.server.as_deref() == Some(server),
            })
            .cloned()
            .collect())
    }

    async fn find_one_by_id(
        &self,
        id: &ObjectId,
        _deadline: Duration,
    ) -> Result<Order, StoreError> {
        let orders = self.orders.read().map_err(|_| lock_failure("find_one"))?;
        orders
            .iter()
            .find(|order| order.id == *id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.to_hex() })
    }

    async fn update_one(
        &self,
        id: &ObjectId,
        update: OrderUpdate,
        _deadline: Duration,
    ) -> Result<u64, StoreError> {
        let mut orders = self.orders.write().map_err(|_| lock_failure("update_one"))?;
        let Some(existing) = orders.iter_mut().find(|order| order.id == *id) else {
            return Ok(0);
        };

        // Like the real store, a no-op write does not count as modified.
        let modified = match update {
            OrderUpdate::SetServer(server) => {
                if existing.server == server {
                    0
                } else {
                    existing.server = server;
                    1
                }
            }
            OrderUpdate::Replace(replacement) => {
                let replacement = Order {
                    id: *id,
                    ..replacement
                };
                if *existing == replacement {
                    0
                } else {
                    *existing = replacement;
                    1
                }
            }
        };
        Ok(modified)
    }

    async fn delete_one_by_id(
        &self,
        id: &ObjectId,
        _deadline: Duration,
    ) -> Result<u64, StoreError> {
        let mut orders = self.orders.write().map_err(|_| lock_failure("delete_one"))?;
        let before = orders.len();
        orders.retain(|order| order.id != *id);
        Ok((before - orders.len()) as u64)
    }
}

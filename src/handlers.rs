//! HTTP handlers for the order endpoints.
//!
//! Every handler follows the same contract: parse and validate the request,
//! issue a single store call bounded by [`STORE_DEADLINE`], then map the
//! result (or error) to a JSON response. Success bodies differ per operation:
//! an insert acknowledgment for create, raw records for the reads, a bare
//! numeric count for the mutations.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use validator::Validate;

use crate::error::ApiError;
use crate::order::{Order, OrderPayload, ServerPatch};
use crate::storage::{OrderFilter, OrderStore, OrderUpdate};

/// Deadline applied to every store call, measured from the start of the
/// individual request.
pub const STORE_DEADLINE: Duration = Duration::from_secs(100);

/// State shared across handlers. The store is injected at startup; handlers
/// themselves hold nothing mutable.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OrderStore>,
}

/// Acknowledgment returned by the create endpoint.
#[derive(Debug, Serialize)]
pub struct InsertAck {
    pub inserted_id: String,
}

/// Parse a path identifier, failing with `InvalidId` before any store access.
fn parse_order_id(raw: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(raw).map_err(|_| ApiError::InvalidId(raw.to_string()))
}

/// Unwrap a JSON body extraction, mapping malformed bodies to a 400.
fn parse_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    let Json(value) = body.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;
    Ok(value)
}

/// `POST /order/create`
///
/// Validates the payload, assigns a fresh identifier, inserts the record,
/// and returns the insert acknowledgment.
pub async fn create_order(
    State(state): State<AppState>,
    body: Result<Json<OrderPayload>, JsonRejection>,
) -> Result<Json<InsertAck>, ApiError> {
    let payload = parse_body(body)?;
    payload.validate()?;

    let order = Order::new(payload);
    let id = state.store.insert_one(&order, STORE_DEADLINE).await?;
    info!(id = %id.to_hex(), dish = %order.dish, "order created");

    Ok(Json(InsertAck {
        inserted_id: id.to_hex(),
    }))
}

/// `GET /orders`
///
/// Unfiltered scan returning every order in insertion order.
pub async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state.store.find(OrderFilter::All, STORE_DEADLINE).await?;
    Ok(Json(orders))
}

/// `GET /waiter/{server}`
///
/// Orders whose `server` field equals the path parameter exactly.
pub async fn list_orders_by_server(
    State(state): State<AppState>,
    Path(server): Path<String>,
) -> Result<Json<Vec<Order>>, ApiError> {
    let orders = state
        .store
        .find(OrderFilter::ByServer(server), STORE_DEADLINE)
        .await?;
    Ok(Json(orders))
}

/// `GET /order/{id}/`
///
/// A well-formed id that matches no document surfaces as a persistence
/// error (500), not a 404.
pub async fn get_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Order>, ApiError> {
    let id = parse_order_id(&id)?;
    let order = state.store.find_one_by_id(&id, STORE_DEADLINE).await?;
    Ok(Json(order))
}

/// `PUT /waiter/update/{id}`
///
/// Sets only the `server` field; entity-level validation is bypassed here
/// on purpose, and `null` clears the assignment. Responds with the bare
/// modified count.
pub async fn update_server(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ServerPatch>, JsonRejection>,
) -> Result<Json<u64>, ApiError> {
    let id = parse_order_id(&id)?;
    let patch = parse_body(body)?;

    let modified = state
        .store
        .update_one(&id, OrderUpdate::SetServer(patch.server), STORE_DEADLINE)
        .await?;
    Ok(Json(modified))
}

/// `PUT /order/update/{id}`
///
/// Full update: validates the payload under the same rules as create, then
/// replaces all mutable fields atomically. The identifier comes from the
/// path and is never reassigned. Responds with the bare modified count.
pub async fn update_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<OrderPayload>, JsonRejection>,
) -> Result<Json<u64>, ApiError> {
    let id = parse_order_id(&id)?;
    let payload = parse_body(body)?;
    payload.validate()?;

    let modified = state
        .store
        .update_one(
            &id,
            OrderUpdate::Replace(Order::with_id(id, payload)),
            STORE_DEADLINE,
        )
        .await?;
    Ok(Json(modified))
}

/// `DELETE /order/delete/{id}`
///
/// Responds with the bare deleted count (0 or 1).
pub async fn delete_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<u64>, ApiError> {
    let id = parse_order_id(&id)?;
    let deleted = state.store.delete_one_by_id(&id, STORE_DEADLINE).await?;
    Ok(Json(deleted))
}

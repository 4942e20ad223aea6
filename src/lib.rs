//! # Tableside
//!
//! A small REST service for managing restaurant orders, backed by MongoDB.
//!
//! Every endpoint follows the same request-handling contract: parse the
//! request, validate it, issue one deadline-bound store call, then map the
//! result or error to a JSON response.
//!
//! ## Endpoints
//!
//! | Method, path | Operation |
//! |---|---|
//! | `POST /order/create` | create an order |
//! | `GET /orders` | list every order |
//! | `GET /waiter/{server}` | list orders by waiter name |
//! | `GET /order/{id}/` | fetch one order |
//! | `PUT /waiter/update/{id}` | reassign the waiter only |
//! | `PUT /order/update/{id}` | replace the full order |
//! | `DELETE /order/delete/{id}` | delete an order |
//!
//! ## Running
//!
//! ```sh
//! MONGODB_URL=mongodb://localhost:27017 cargo run
//! ```
//!
//! `PORT` (default 5000) and `MONGODB_DATABASE` (default `restaurant`) are
//! also read from the environment; a `.env` file is honored.

pub mod config;
pub mod error;
pub mod handlers;
pub mod order;
pub mod server;
pub mod storage;

/// Re-exports of the types most callers and tests need.
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{ApiError, StoreError};
    pub use crate::handlers::{AppState, InsertAck, STORE_DEADLINE};
    pub use crate::order::{Order, OrderPayload, ServerPatch};
    pub use crate::server::{CONNECT_DEADLINE, build_router, connect_database};
    pub use crate::storage::{
        InMemoryOrderStore, MongoOrderStore, OrderFilter, OrderStore, OrderUpdate,
    };
}

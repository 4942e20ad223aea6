//! The `Order` entity and its request payloads.
//!
//! Validation is attached declaratively to [`OrderPayload`] and invoked
//! explicitly by the handlers; deserializing a payload never rejects a value
//! that is merely out of range. The partial server-update body
//! ([`ServerPatch`]) deliberately carries no rules at all.

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Serde helpers mapping an [`ObjectId`] to its 24-character hex string.
///
/// Applied to the `_id` field so the same representation is used in the
/// database and in JSON responses.
pub(crate) mod object_id_hex {
    use mongodb::bson::oid::ObjectId;
    use serde::de::Error;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&id.to_hex())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ObjectId, D::Error> {
        let hex = String::deserialize(deserializer)?;
        ObjectId::parse_str(&hex).map_err(D::Error::custom)
    }
}

/// A dish ordered at a table, as stored in the `orders` collection.
///
/// The identifier is assigned exactly once at creation and never reassigned;
/// it is absent from create payloads and always present in stored records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id", with = "object_id_hex")]
    pub id: ObjectId,
    pub dish: String,
    pub price: f64,
    pub server: Option<String>,
    pub table: Option<String>,
}

impl Order {
    /// Build a new order from a payload, assigning a fresh identifier.
    pub fn new(payload: OrderPayload) -> Self {
        Self::with_id(ObjectId::new(), payload)
    }

    /// Build an order from a payload under an existing identifier.
    pub fn with_id(id: ObjectId, payload: OrderPayload) -> Self {
        Self {
            id,
            dish: payload.dish,
            price: payload.price,
            server: payload.server,
            table: payload.table,
        }
    }
}

/// Request body shared by the create and full-update operations.
///
/// `dish` and `price` are required by shape; their bounds are checked by an
/// explicit `validate()` call in the handlers.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderPayload {
    #[validate(length(min = 2, max = 100, message = "dish must be 2 to 100 characters"))]
    pub dish: String,
    #[validate(range(min = 0.0, max = 100.0, message = "price must be between 0 and 100"))]
    pub price: f64,
    #[validate(length(min = 2, max = 100, message = "server must be 2 to 100 characters"))]
    pub server: Option<String>,
    #[validate(length(max = 2, message = "table must be at most 2 characters"))]
    pub table: Option<String>,
}

/// Body of the partial update reassigning an order to another waiter.
///
/// No validation on purpose: the intake rules do not apply to this
/// operation, and `null` is accepted to clear the assignment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerPatch {
    pub server: Option<String>,
}

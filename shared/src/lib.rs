use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// A managed user record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier, immutable after creation
    pub id: i64,
    /// Display name (max 100 characters)
    pub name: String,
    /// Contact email, globally unique among users (max 180 characters)
    pub email: String,
    /// Optional phone number, exactly 10 digits when present
    pub phone: Option<String>,
    /// Free-text comment (max 1000 characters)
    pub comment: String,
    /// Owning client identifier, RFC 4122 UUID string
    pub client_id: String,
}

/// Request for creating a new user.
///
/// Fields left out of the request body deserialize to their defaults and
/// fail the blank checks, so a missing required field reports the same
/// validation message as an empty one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub comment: String,
    pub client_id: String,
}

/// Request for updating an existing user.
///
/// Only supplied fields are validated and applied; absent fields keep their
/// current values. `id` selects the record and must always be supplied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct UpdateUserRequest {
    pub id: Option<i64>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub comment: Option<String>,
    pub client_id: Option<String>,
}

/// Field name mapped to the ordered list of violation messages.
///
/// An empty map means the candidate passed validation. BTreeMap keeps the
/// serialized field order stable.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// The uniform JSON response wrapper.
///
/// `status` carries the logical status code; the transport status is always
/// 200 and callers are expected to inspect the body. Exactly one of `data`
/// and `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiEnvelope {
    pub status: u16,
    pub msg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ApiEnvelope {
    /// Success envelope carrying a serialized payload
    pub fn data<T: Serialize>(status: u16, msg: &str, payload: T) -> Self {
        Self {
            status,
            msg: msg.to_string(),
            data: Some(serde_json::to_value(payload).unwrap_or(Value::Null)),
            error: None,
        }
    }

    /// Success envelope with an empty payload (`"data": []`)
    pub fn empty(status: u16, msg: &str) -> Self {
        Self {
            status,
            msg: msg.to_string(),
            data: Some(Value::Array(Vec::new())),
            error: None,
        }
    }

    /// Failure envelope carrying field-keyed validation messages
    pub fn field_errors(status: u16, msg: &str, errors: &FieldErrors) -> Self {
        Self {
            status,
            msg: msg.to_string(),
            data: None,
            error: Some(serde_json::to_value(errors).unwrap_or(Value::Null)),
        }
    }

    /// Failure envelope carrying a single opaque message
    pub fn failure(status: u16, msg: &str) -> Self {
        Self {
            status,
            msg: msg.to_string(),
            data: None,
            error: Some(Value::String(msg.to_string())),
        }
    }
}

//! # REST API for User Management
//!
//! Endpoints for listing, creating, retrieving, updating, and deleting
//! users. Every handler renders its outcome into the uniform
//! `{status, msg, data|error}` envelope and returns it with transport
//! status 200.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
};
use tracing::{error, info, warn};

use crate::domain::UserError;
use crate::AppState;
use shared::{ApiEnvelope, CreateUserRequest, FieldErrors, UpdateUserRequest};

const VALIDATION_MSG: &str = "There is some validation error!";

// Opaque client-facing message for store failures; the underlying error is
// logged internally and never sent over the wire.
const FAILURE_MSG: &str = "Something went wrong, please try again later";

/// List all users
pub async fn list_users(State(state): State<AppState>) -> Json<ApiEnvelope> {
    info!("GET /api/user");

    Json(match state.user_service.list().await {
        Ok(users) if users.is_empty() => ApiEnvelope::empty(204, "No records found"),
        Ok(users) => ApiEnvelope::data(200, "Records found", users),
        Err(e) => render_error(e),
    })
}

/// Create a new user
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Json<ApiEnvelope> {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return Json(render_body_rejection(rejection)),
    };

    info!("POST /api/user/create - email: {}", request.email);

    Json(match state.user_service.create(request).await {
        Ok(user) => ApiEnvelope::data(201, "User created successfully!", user),
        Err(e) => render_error(e),
    })
}

/// Get a user by id
pub async fn show_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Json<ApiEnvelope> {
    info!("GET /api/user/show/{}", raw_id);

    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(envelope) => return Json(envelope),
    };

    Json(match state.user_service.show(id).await {
        Ok(Some(user)) => ApiEnvelope::data(200, "User detail fetched successfully!", user),
        Ok(None) => ApiEnvelope::empty(204, "User does not exist."),
        Err(e) => render_error(e),
    })
}

/// Apply a partial update to a user
pub async fn edit_user(
    State(state): State<AppState>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Json<ApiEnvelope> {
    let Json(request) = match payload {
        Ok(json) => json,
        Err(rejection) => return Json(render_body_rejection(rejection)),
    };

    info!("POST /api/user/edit - id: {:?}", request.id);

    Json(match state.user_service.edit(request).await {
        // Existing clients match this message byte-for-byte, double space included
        Ok(Some(user)) => ApiEnvelope::data(200, "User detail updated  successfully!", user),
        Ok(None) => ApiEnvelope::empty(204, "User does not exist."),
        Err(e) => render_error(e),
    })
}

/// Delete a user by id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Json<ApiEnvelope> {
    info!("GET /api/user/delete/{}", raw_id);

    let id = match parse_id(&raw_id) {
        Ok(id) => id,
        Err(envelope) => return Json(envelope),
    };

    Json(match state.user_service.delete(id).await {
        Ok(true) => ApiEnvelope::empty(200, "User deleted successfully"),
        Ok(false) => ApiEnvelope::empty(204, "User does not exist."),
        Err(e) => render_error(e),
    })
}

/// A malformed id cannot address any record; report it on the `id` field
fn parse_id(raw: &str) -> Result<i64, ApiEnvelope> {
    raw.parse::<i64>().map_err(|_| {
        let mut errors = FieldErrors::new();
        errors.insert(
            "id".to_string(),
            vec!["id must be an integer".to_string()],
        );
        ApiEnvelope::field_errors(422, VALIDATION_MSG, &errors)
    })
}

/// An unparseable body is rendered into the envelope like any other
/// client error; the parser's message stays in the logs, not on the wire
fn render_body_rejection(rejection: JsonRejection) -> ApiEnvelope {
    warn!("Rejected request body: {}", rejection.body_text());
    ApiEnvelope::failure(422, "Invalid request body")
}

fn render_error(err: UserError) -> ApiEnvelope {
    match err {
        UserError::Validation(errors) => ApiEnvelope::field_errors(422, VALIDATION_MSG, &errors),
        UserError::Persistence(e) => {
            error!("Store failure: {:#}", e);
            ApiEnvelope::failure(500, FAILURE_MSG)
        }
    }
}

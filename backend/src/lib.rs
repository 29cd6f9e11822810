//! # User Manager Backend
//!
//! REST service for managing user records. The crate is split into three
//! layers:
//! - **Storage**: SQLite persistence (connection handling, user repository)
//! - **Domain**: validation rules and the user service
//! - **IO**: REST endpoints exposing the domain operations
//!
//! The backend is UI-agnostic; any HTTP client that speaks the JSON
//! envelope can drive it.

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::Method,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::domain::UserService;
use crate::storage::{DbConnection, UserRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
}

/// Initialize the backend with all required services
pub async fn initialize_backend() -> Result<AppState> {
    info!("Setting up database");
    let db = DbConnection::init().await?;

    info!("Setting up domain model");
    let user_service = UserService::new(UserRepository::new(db));

    Ok(AppState { user_service })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow browser clients to make requests
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    // Set up our application routes
    let api_routes = Router::new()
        .route("/user", get(io::list_users))
        .route("/user/create", post(io::create_user))
        .route("/user/show/:id", get(io::show_user))
        .route("/user/edit", post(io::edit_user))
        .route("/user/delete/:id", get(io::delete_user));

    // Define our main application router
    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}

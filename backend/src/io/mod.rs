//! # REST API Interface Layer
//!
//! HTTP endpoints for the user manager. This layer handles:
//! - JSON request/response serialization
//! - Translation of domain outcomes into the response envelope
//! - Request logging
//!
//! Every response is sent with transport status 200; the logical status
//! lives in the envelope body and callers inspect that, not the HTTP
//! status line.

pub mod rest;

pub use rest::user_apis::{create_user, delete_user, edit_user, list_users, show_user};

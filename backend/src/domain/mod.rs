//! # Domain Layer
//!
//! Business rules for user management: field validation and the service
//! that orchestrates validation, uniqueness checks, and persistence.

pub mod user_service;
pub mod validation;

pub use user_service::{UserError, UserService};

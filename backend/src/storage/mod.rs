//! # Storage Layer
//!
//! SQLite persistence for user records. `DbConnection` owns the pool and
//! the schema; `UserRepository` provides the query surface the domain
//! layer talks to.

pub mod db;
pub mod user_repository;

pub use db::DbConnection;
pub use user_repository::UserRepository;

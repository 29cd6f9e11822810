// Module declarations
pub mod user_apis;

mod auth;
mod error_handler;

pub use auth::{ACCESS_RULES, AccessRule, auth_middleware, requires_auth};
pub use error_handler::log_errors;

pub mod auth;
pub mod completion;

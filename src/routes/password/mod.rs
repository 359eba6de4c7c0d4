mod handler;
mod model;

pub use handler::{check_password, set_password, verify_password};
pub use model::{PasswordRequest, PasswordStatusResponse, SuccessResponse};

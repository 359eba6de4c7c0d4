use serde::{Deserialize, Serialize};

use crate::infrastructure::auth::PasswordStatus;

#[derive(Debug, Deserialize)]
pub struct PasswordRequest {
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PasswordStatusResponse {
    pub allow_password: bool,
    pub need_password: bool,
    pub have_password: bool,
    pub can_be_reset: bool,
}

impl From<PasswordStatus> for PasswordStatusResponse {
    fn from(status: PasswordStatus) -> Self {
        Self {
            allow_password: status.allow_password,
            need_password: status.need_password(),
            have_password: status.password_is_set,
            can_be_reset: status.reset_is_allowed,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

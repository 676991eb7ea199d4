use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::users::UserId;

pub const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AuthResponse {
    pub id: UserId,
    pub email: String,
    /// Bearer token for the `Authorization` header.
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct LogoutResponse {
    pub message: String,
}

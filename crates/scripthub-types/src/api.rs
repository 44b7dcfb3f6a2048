use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Keyless;

// -- JWT Claims --

/// Canonical claims shape, shared by the token mint in scripthub-api and the
/// session extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChangePasswordRequest {
    pub password: String,
}

// -- Scripts --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptPayload {
    pub title: String,
    pub code: String,
    #[serde(default)]
    pub game: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub keyless: Keyless,
}

// -- Errors --

/// Body shape for every non-2xx API response. The `error` text is what the
/// pages show in their inline message slots.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

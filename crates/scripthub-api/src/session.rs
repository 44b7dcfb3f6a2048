//! Session accessor: resolves "who is the current user" from the bearer
//! token. Absence of a session is a normal outcome for public routes, which
//! simply don't take a [`Session`] argument.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use jsonwebtoken::{DecodingKey, Validation, decode};

use scripthub_types::api::Claims;

use crate::AppState;
use crate::error::ApiError;

/// Extractor form of the authenticated session. Handlers that require a
/// logged-in user take this as a parameter; everything else stays anonymous.
pub struct Session(pub Claims);

impl FromRequestParts<AppState> for Session {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(ApiError::not_logged_in)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(ApiError::not_logged_in)?;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|_| ApiError::Unauthorized("Session expired, log in again".into()))?;

        Ok(Session(token_data.claims))
    }
}

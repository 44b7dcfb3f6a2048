use anyhow::anyhow;
use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
};
use jsonwebtoken::{EncodingKey, Header, encode};
use tracing::warn;
use uuid::Uuid;

use scripthub_types::UserProfile;
use scripthub_types::api::{
    ChangePasswordRequest, Claims, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse,
};

use crate::AppState;
use crate::error::{ApiError, join_err};
use crate::session::Session;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.username.trim().is_empty() || req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("Fill all fields".into()));
    }

    let username = req.username.trim().to_string();
    let email = req.email.trim().to_lowercase();
    let user_id = Uuid::new_v4();

    let db = state.clone();
    let reg_username = username.clone();
    tokio::task::spawn_blocking(move || {
        if db
            .db
            .get_identity_by_email(&email)?
            .is_some()
        {
            return Err(ApiError::Conflict("Email already registered".into()));
        }

        // Hash password with Argon2id
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hash failed: {e}"))?
            .to_string();

        db.db
            .create_identity(&user_id.to_string(), &email, &reg_username, &password_hash)?;

        // Mirror the public profile row. Best effort: the identity already
        // exists, so a failure here leaves an inconsistency window rather
        // than a failed registration.
        if let Err(e) = db.db.upsert_user(&user_id.to_string(), &reg_username, &email) {
            warn!("user profile upsert failed for {user_id}: {e:#}");
        }

        Ok(())
    })
    .await
    .map_err(join_err)??;

    let token = create_token(&state.jwt_secret, user_id, &username)?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse { user_id, token }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::Validation("Enter email & password".into()));
    }

    let email = req.email.trim().to_lowercase();
    let db = state.clone();
    let identity = tokio::task::spawn_blocking(move || {
        let identity = db
            .db
            .get_identity_by_email(&email)?
            .ok_or_else(|| ApiError::Unauthorized("Invalid email or password".into()))?;

        let parsed_hash = PasswordHash::new(&identity.password)
            .map_err(|e| anyhow!("stored hash unparseable: {e}"))?;

        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| ApiError::Unauthorized("Invalid email or password".into()))?;

        Ok::<_, ApiError>(identity)
    })
    .await
    .map_err(join_err)??;

    let user_id: Uuid = identity
        .id
        .parse()
        .map_err(|e| anyhow!("corrupt identity id {:?}: {e}", identity.id))?;

    let token = create_token(&state.jwt_secret, user_id, &identity.username)?;

    Ok(Json(LoginResponse {
        user_id,
        username: identity.username,
        token,
    }))
}

/// Who the bearer token belongs to. 401 here is the normal "anonymous
/// visitor" signal for the pages, not an error condition.
pub async fn me(
    State(state): State<AppState>,
    Session(claims): Session,
) -> Result<Json<UserProfile>, ApiError> {
    let db = state.clone();
    let id = claims.sub.to_string();
    let identity = tokio::task::spawn_blocking(move || db.db.get_identity_by_id(&id))
        .await
        .map_err(join_err)?
        .map_err(ApiError::Internal)?
        .ok_or_else(ApiError::not_logged_in)?;

    Ok(Json(UserProfile {
        id: claims.sub,
        username: identity.username,
        email: identity.email,
    }))
}

/// No old-password re-entry: the bearer token is the only proof of identity,
/// matching the flow this service was migrated from.
pub async fn change_password(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, ApiError> {
    if req.password.is_empty() {
        return Err(ApiError::Validation("Enter a new password".into()));
    }

    let db = state.clone();
    let id = claims.sub.to_string();
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| anyhow!("password hash failed: {e}"))?
            .to_string();

        let n = db.db.update_identity_password(&id, &password_hash)?;
        if n == 0 {
            return Err(ApiError::Internal(anyhow!("identity {id} vanished")));
        }
        Ok(())
    })
    .await
    .map_err(join_err)??;

    Ok(StatusCode::NO_CONTENT)
}

/// Redirect-based OAuth hand-off. The provider owns the whole flow; no local
/// state is kept here.
pub async fn oauth_redirect(
    State(state): State<AppState>,
    Path(provider): Path<String>,
) -> Result<Redirect, ApiError> {
    match provider.as_str() {
        "google" => state
            .oauth_google_url
            .as_deref()
            .map(Redirect::to)
            .ok_or_else(|| ApiError::Validation("Google sign-in is not configured".into())),
        _ => Err(ApiError::NotFound),
    }
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}

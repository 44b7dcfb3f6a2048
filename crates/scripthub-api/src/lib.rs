pub mod assets;
pub mod auth;
pub mod error;
pub mod pages;
pub mod scripts;
pub mod session;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use scripthub_db::Database;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    /// Authorize endpoint of the external OAuth provider, if configured.
    /// The whole browser flow is delegated there; we only issue the redirect.
    pub oauth_google_url: Option<String>,
}

/// The full route table, shared by the server binary and the integration
/// tests so both exercise the same wiring.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Pages
        .route("/", get(pages::feed))
        .route("/login", get(pages::login))
        .route("/signup", get(pages::signup))
        .route("/post", get(pages::post_form))
        .route("/profile", get(pages::profile))
        .route("/scripts/{id}", get(pages::detail))
        // HTML fragments refetched by app.js
        .route("/fragment/scripts", get(pages::scripts_fragment))
        .route("/fragment/my-scripts", get(pages::my_scripts_fragment))
        // JSON API
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/password", post(auth::change_password))
        .route("/api/oauth/{provider}", get(auth::oauth_redirect))
        .route(
            "/api/scripts",
            get(scripts::list_scripts).post(scripts::create_script),
        )
        .route(
            "/api/scripts/{id}",
            get(scripts::get_script)
                .put(scripts::update_script)
                .delete(scripts::delete_script),
        )
        .route("/api/me/scripts", get(scripts::my_scripts))
        // Embedded assets
        .route("/static/{*path}", get(assets::static_handler))
        .with_state(state)
}

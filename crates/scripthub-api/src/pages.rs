//! Server-rendered pages and the HTML fragments `app.js` refetches.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use uuid::Uuid;

use scripthub_render::{card, pages};

use crate::AppState;
use crate::error::ApiError;
use crate::scripts::{FeedQuery, load_feed, load_own, to_script};
use crate::session::Session;

pub async fn feed(
    State(state): State<AppState>,
    Query(feed): Query<FeedQuery>,
) -> Result<Html<String>, ApiError> {
    let scripts = load_feed(&state, &feed.q).await?;
    Ok(Html(pages::feed_page(&scripts, feed.q.trim())))
}

pub async fn login() -> Html<String> {
    Html(pages::login_page())
}

pub async fn signup() -> Html<String> {
    Html(pages::signup_page())
}

pub async fn post_form() -> Html<String> {
    Html(pages::post_page())
}

pub async fn profile() -> Html<String> {
    Html(pages::profile_page())
}

pub async fn detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_script(&id.to_string())).await;

    match row {
        Ok(Ok(Some(row))) => match to_script(row) {
            Ok(script) => Html(pages::detail_page(&script)).into_response(),
            Err(e) => e.into_response(),
        },
        Ok(Ok(None)) => (StatusCode::NOT_FOUND, Html(pages::not_found_page())).into_response(),
        Ok(Err(e)) => ApiError::Internal(e).into_response(),
        Err(e) => crate::error::join_err(e).into_response(),
    }
}

/// Feed grid only, for debounced search refreshes.
pub async fn scripts_fragment(
    State(state): State<AppState>,
    Query(feed): Query<FeedQuery>,
) -> Result<Html<String>, ApiError> {
    let scripts = load_feed(&state, &feed.q).await?;
    Ok(Html(card::feed_grid(&scripts)))
}

/// The profile page's own-scripts grid, rendered server-side so the preview
/// truncation and escaping live in one place.
pub async fn my_scripts_fragment(
    State(state): State<AppState>,
    Session(claims): Session,
) -> Result<Html<String>, ApiError> {
    let scripts = load_own(&state, claims.sub).await?;
    Ok(Html(card::profile_grid(&scripts)))
}

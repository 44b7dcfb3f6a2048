use anyhow::anyhow;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use scripthub_db::models::{ScriptFields, ScriptRow};
use scripthub_types::{Keyless, Script};
use scripthub_types::api::ScriptPayload;

use crate::AppState;
use crate::error::{ApiError, join_err};
use crate::session::Session;

/// The feed fetches at most this many rows; the search filter runs over the
/// fetched page only, not the whole table. Known scale limitation, kept.
pub const FEED_FETCH_LIMIT: u32 = 100;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    #[serde(default)]
    pub q: String,
}

/// Case-insensitive substring match across title, game, and code.
pub(crate) fn matches_query(s: &Script, query: &str) -> bool {
    let q = query.to_lowercase();
    s.title.to_lowercase().contains(&q)
        || s.game
            .as_deref()
            .is_some_and(|g| g.to_lowercase().contains(&q))
        || s.code.to_lowercase().contains(&q)
}

/// Row → model conversion. A keyless value outside "yes"/"no" is a schema
/// violation and fails the request rather than defaulting silently.
pub(crate) fn to_script(row: ScriptRow) -> Result<Script, ApiError> {
    let keyless = Keyless::from_stored(&row.keyless)
        .map_err(|e| anyhow!("script {}: {e}", row.id))?;

    let id: Uuid = row
        .id
        .parse()
        .map_err(|e| anyhow!("corrupt script id {:?}: {e}", row.id))?;
    let user_id: Uuid = row
        .user_id
        .parse()
        .map_err(|e| anyhow!("corrupt user_id on script {}: {e}", row.id))?;

    let created_at = row
        .created_at
        .parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without
            // timezone. Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(&row.created_at, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("corrupt created_at {:?} on script {}: {e}", row.created_at, row.id);
            chrono::DateTime::default()
        });

    Ok(Script {
        id,
        title: row.title,
        code: row.code,
        game: row.game,
        icon: row.icon,
        keyless,
        user_id,
        created_at,
    })
}

fn validate(payload: &ScriptPayload) -> Result<(), ApiError> {
    if payload.title.trim().is_empty() || payload.code.trim().is_empty() {
        return Err(ApiError::Validation("Title and code required".into()));
    }
    Ok(())
}

fn none_if_empty(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|s| !s.is_empty())
}

/// Shared by the JSON feed endpoint and the server-rendered feed page.
pub(crate) async fn load_feed(state: &AppState, query: &str) -> Result<Vec<Script>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.recent_scripts(FEED_FETCH_LIMIT))
        .await
        .map_err(join_err)?
        .map_err(ApiError::Internal)?;

    let scripts = rows
        .into_iter()
        .map(to_script)
        .collect::<Result<Vec<_>, _>>()?;

    let query = query.trim();
    if query.is_empty() {
        return Ok(scripts);
    }
    Ok(scripts
        .into_iter()
        .filter(|s| matches_query(s, query))
        .collect())
}

pub async fn list_scripts(
    State(state): State<AppState>,
    Query(feed): Query<FeedQuery>,
) -> Result<Json<Vec<Script>>, ApiError> {
    Ok(Json(load_feed(&state, &feed.q).await?))
}

pub async fn get_script(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Script>, ApiError> {
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || db.db.get_script(&id.to_string()))
        .await
        .map_err(join_err)?
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(to_script(row)?))
}

pub async fn create_script(
    State(state): State<AppState>,
    Session(claims): Session,
    Json(payload): Json<ScriptPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate(&payload)?;

    let id = Uuid::new_v4();
    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let fields = ScriptFields {
            title: payload.title.trim(),
            code: &payload.code,
            game: none_if_empty(payload.game.as_deref()),
            icon: none_if_empty(payload.icon.as_deref()),
            keyless: payload.keyless.as_str(),
        };
        db.db
            .insert_script(&id.to_string(), &claims.sub.to_string(), &fields)?;
        // Re-read for the server-assigned created_at
        db.db
            .get_script(&id.to_string())?
            .ok_or_else(|| anyhow!("script {id} missing right after insert"))
    })
    .await
    .map_err(join_err)?
    .map_err(ApiError::Internal)?;

    Ok((StatusCode::CREATED, Json(to_script(row)?)))
}

/// Update is filtered by id AND the session's user id. Zero rows affected —
/// missing script or someone else's — reports failure without touching
/// anything. The store's ownership filter is the authority; the page's own
/// check is only an early exit.
pub async fn update_script(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<ScriptPayload>,
) -> Result<Json<Script>, ApiError> {
    validate(&payload)?;

    let db = state.clone();
    let row = tokio::task::spawn_blocking(move || {
        let fields = ScriptFields {
            title: payload.title.trim(),
            code: &payload.code,
            game: none_if_empty(payload.game.as_deref()),
            icon: none_if_empty(payload.icon.as_deref()),
            keyless: payload.keyless.as_str(),
        };
        let n = db
            .db
            .update_script(&id.to_string(), &claims.sub.to_string(), &fields)?;
        if n == 0 {
            return Err(ApiError::NotFound);
        }
        db.db
            .get_script(&id.to_string())?
            .ok_or_else(|| ApiError::Internal(anyhow!("script {id} vanished during update")))
    })
    .await
    .map_err(join_err)??;

    Ok(Json(to_script(row)?))
}

/// Same ownership contract as [`update_script`].
pub async fn delete_script(
    State(state): State<AppState>,
    Session(claims): Session,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    let db = state.clone();
    let n = tokio::task::spawn_blocking(move || {
        db.db.delete_script(&id.to_string(), &claims.sub.to_string())
    })
    .await
    .map_err(join_err)?
    .map_err(ApiError::Internal)?;

    if n == 0 {
        return Err(ApiError::NotFound);
    }
    Ok(StatusCode::NO_CONTENT)
}

pub async fn my_scripts(
    State(state): State<AppState>,
    Session(claims): Session,
) -> Result<Json<Vec<Script>>, ApiError> {
    Ok(Json(load_own(&state, claims.sub).await?))
}

pub(crate) async fn load_own(state: &AppState, user_id: Uuid) -> Result<Vec<Script>, ApiError> {
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.scripts_by_user(&user_id.to_string()))
        .await
        .map_err(join_err)?
        .map_err(ApiError::Internal)?;

    rows.into_iter().map(to_script).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use scripthub_types::Keyless;

    fn script(title: &str, game: Option<&str>, code: &str) -> Script {
        Script {
            id: Uuid::new_v4(),
            title: title.to_string(),
            code: code.to_string(),
            game: game.map(str::to_string),
            icon: None,
            keyless: Keyless::Keyed,
            user_id: Uuid::new_v4(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn filter_matches_any_of_the_three_fields() {
        let scripts = [
            script("Aimbot for Game X", None, "aim()"),
            script("ESP Hack", Some("Some Game"), "esp()"),
            script("Speed Run", None, "run fast"),
        ];

        let hits: Vec<_> = scripts.iter().filter(|s| matches_query(s, "game")).collect();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Aimbot for Game X");
        assert_eq!(hits[1].title, "ESP Hack");

        // case-insensitive, and code counts too
        assert!(matches_query(&script("t", None, "USE GAMEPASS"), "gamepass"));
        assert!(!matches_query(&script("Speed Run", None, "run"), "game"));
    }

    #[test]
    fn corrupt_keyless_is_surfaced_not_defaulted() {
        let row = ScriptRow {
            id: Uuid::new_v4().to_string(),
            title: "t".into(),
            code: "c".into(),
            game: None,
            icon: None,
            keyless: "maybe".into(),
            user_id: Uuid::new_v4().to_string(),
            created_at: "2024-05-01 12:00:00".into(),
        };
        assert!(to_script(row).is_err());
    }

    #[test]
    fn sqlite_timestamps_parse_as_utc() {
        let row = ScriptRow {
            id: Uuid::new_v4().to_string(),
            title: "t".into(),
            code: "c".into(),
            game: None,
            icon: None,
            keyless: "yes".into(),
            user_id: Uuid::new_v4().to_string(),
            created_at: "2024-05-01 12:34:56".into(),
        };
        let s = to_script(row).unwrap();
        assert_eq!(s.created_at.to_rfc3339(), "2024-05-01T12:34:56+00:00");
        assert_eq!(s.keyless, Keyless::Keyless);
    }
}

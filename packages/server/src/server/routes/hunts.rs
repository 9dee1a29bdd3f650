use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use leadscan::HuntMode;
use serde::Deserialize;
use uuid::Uuid;

use crate::common::{ApiError, ApiResult};
use crate::domains::hunts::Hunt;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct HuntRequest {
    /// The buyer-intent phrase to hunt for.
    pub query: String,
    pub city: String,
    #[serde(default)]
    pub mode: Option<HuntMode>,
}

/// Start a hunt. Returns 202 with the run id immediately; the run
/// executes as a detached background task and cannot be cancelled.
pub async fn start_hunt(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<HuntRequest>,
) -> ApiResult<(StatusCode, Json<serde_json::Value>)> {
    user.require_create()?;

    let mode = body.mode.unwrap_or(HuntMode::Standard);
    let hunt = state
        .hunts
        .dispatch(&body.query, &body.city, mode, user.user_id)
        .await?;

    tracing::info!(hunt_id = %hunt.id, intent = %hunt.intent, city = %hunt.city, "Hunt dispatched");
    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "success": true,
            "hunt_id": hunt.id,
            "status": hunt.status,
            "message": format!("hunting for '{}' in {}", hunt.intent, hunt.city),
        })),
    ))
}

/// Run status and, once finished, the summary.
pub async fn get_hunt(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let hunt = Hunt::find_by_id(id, &state.db_pool)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NotFound("hunt"))?;
    Ok(Json(serde_json::json!({ "success": true, "hunt": hunt })))
}

pub async fn list_hunts(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let hunts = Hunt::recent(20, &state.db_pool)
        .await
        .map_err(ApiError::Internal)?;
    let count = hunts.len();
    Ok(Json(serde_json::json!({
        "success": true,
        "count": count,
        "hunts": hunts,
    })))
}

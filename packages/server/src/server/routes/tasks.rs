use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use crate::common::{ApiError, ApiResult};
use crate::domains::tasks::Task;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub async fn list_tasks(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let tasks = state.crm.pending_tasks().await?;
    let count = tasks.len();
    Ok(Json(serde_json::json!({
        "success": true,
        "total_pending": count,
        "tasks": tasks,
    })))
}

pub async fn complete_task(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    user.require_create()?;
    let task = Task::complete(id, &state.db_pool)
        .await
        .map_err(ApiError::Internal)?
        .ok_or(ApiError::NotFound("task"))?;
    Ok(Json(serde_json::json!({ "success": true, "task": task })))
}

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::common::{ApiError, ApiResult};
use crate::domains::conversations::AdminActionKind;
use crate::domains::hunts::Hunt;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct AdminChatRequest {
    pub command: String,
}

/// Admin chat: interpret a free-text command into the fixed action
/// vocabulary. Read-only actions execute inline; anything with side
/// effects comes back as a pending descriptor for the operator to
/// confirm through the regular endpoints.
pub async fn admin_chat(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<AdminChatRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    user.require_admin()?;
    if body.command.trim().is_empty() {
        return Err(ApiError::Validation("command must not be empty".into()));
    }

    let action = state.admin_agent.interpret(&body.command).await;
    tracing::info!(username = %user.username, kind = ?action.kind, "Admin command");

    let data = match action.kind {
        AdminActionKind::ShowStats => {
            let stats = state.crm.dashboard().await?;
            Some(serde_json::to_value(stats).unwrap_or_default())
        }
        AdminActionKind::AnalyzeHunts => {
            let hunts = Hunt::recent(10, &state.db_pool)
                .await
                .map_err(ApiError::Internal)?;
            Some(serde_json::to_value(hunts).unwrap_or_default())
        }
        _ => None,
    };

    let executed = data.is_some();
    Ok(Json(serde_json::json!({
        "success": true,
        "action": action,
        "executed": executed,
        "data": data,
    })))
}

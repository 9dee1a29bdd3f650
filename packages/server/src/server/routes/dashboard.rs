use axum::extract::State;
use axum::Json;

use crate::common::ApiResult;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

pub async fn dashboard(
    State(state): State<AppState>,
    _user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    let stats = state.crm.dashboard().await?;
    Ok(Json(serde_json::json!({ "success": true, "stats": stats })))
}

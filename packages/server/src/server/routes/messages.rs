use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::common::ApiResult;
use crate::domains::interactions::InteractionKind;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub channel: Option<String>,
}

fn channel_kind(channel: Option<&str>) -> InteractionKind {
    match channel {
        Some("whatsapp") | None => InteractionKind::Whatsapp,
        _ => InteractionKind::Note,
    }
}

/// Feed an inbound customer message through the agent pipeline.
pub async fn handle_lead_message(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    let outcome = state
        .crm
        .handle_incoming_message(id, &body.message, channel_kind(body.channel.as_deref()))
        .await?;
    Ok(Json(serde_json::json!({ "success": true, "result": outcome })))
}

/// Send an outbound message to a lead.
pub async fn send_lead_message(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<MessageRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    user.require_create()?;
    state.crm.send_message(id, &body.message).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "message sent",
    })))
}

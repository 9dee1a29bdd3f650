use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::common::ApiResult;
use crate::domains::crm::CreateLeadInput;
use crate::domains::leads::models::{LeadFilters, UpdateLead};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

/// Query parameters for lead search.
#[derive(Debug, Deserialize)]
pub struct LeadSearchParams {
    pub status: Option<String>,
    pub source: Option<String>,
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

pub async fn create_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<CreateLeadInput>,
) -> ApiResult<Json<serde_json::Value>> {
    user.require_create()?;
    let lead = state.crm.create_lead(body, user.user_id).await?;
    Ok(Json(serde_json::json!({ "success": true, "lead": lead })))
}

pub async fn search_leads(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(params): Query<LeadSearchParams>,
) -> ApiResult<Json<serde_json::Value>> {
    let filters = LeadFilters {
        status: params.status.map(|s| vec![s]),
        source: params.source.map(|s| vec![s]),
        search: params.search,
    };
    let leads = state
        .crm
        .search_leads(filters, params.limit, params.offset)
        .await?;
    let count = leads.len();
    Ok(Json(serde_json::json!({
        "success": true,
        "count": count,
        "leads": leads,
    })))
}

pub async fn get_lead(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    let details = state.crm.get_lead(id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "lead": details.lead,
        "interactions": details.interactions,
        "conversation_trend": details.conversation_trend,
    })))
}

pub async fn update_lead(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateLead>,
) -> ApiResult<Json<serde_json::Value>> {
    user.require_create()?;
    let lead = state.crm.update_lead(id, body).await?;
    Ok(Json(serde_json::json!({ "success": true, "lead": lead })))
}

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::common::{ApiError, ApiResult};
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
}

/// The dashboard's "extract from text" tool: paste anything, get back
/// the valid numbers and how the snippet classifies.
pub async fn extract_from_text(
    State(_state): State<AppState>,
    _user: AuthUser,
    Json(body): Json<ExtractRequest>,
) -> ApiResult<Json<serde_json::Value>> {
    if body.text.trim().is_empty() {
        return Err(ApiError::Validation("text must not be empty".into()));
    }

    let phones = leadscan::extract_phones(&body.text);
    let tier = leadscan::classify(&body.text);
    let count = phones.len();

    Ok(Json(serde_json::json!({
        "success": true,
        "count": count,
        "phones": phones,
        "tier": tier,
        "word_count": body.text.split_whitespace().count(),
    })))
}

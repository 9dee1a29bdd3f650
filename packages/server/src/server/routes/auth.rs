use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::common::{ApiError, ApiResult};
use crate::domains::auth::User;
use crate::server::app::AppState;
use crate::server::middleware::AuthUser;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub access_token: String,
    pub token_type: &'static str,
    pub username: String,
    pub role: String,
}

/// Credential check issuing a bearer token. Invalid credentials get the
/// same answer whether the user exists or not.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let user = User::find_by_username(&body.username, &state.db_pool)
        .await
        .map_err(ApiError::Internal)?;

    let user = match user {
        Some(user) if user.verify_password(&body.password) => user,
        _ => return Err(ApiError::Unauthorized("invalid credentials".into())),
    };

    let role = user.role();
    let token = state
        .jwt_service
        .create_token(user.id, user.username.clone(), role)
        .map_err(ApiError::Internal)?;

    tracing::info!(username = %user.username, "Login");
    Ok(Json(LoginResponse {
        success: true,
        access_token: token,
        token_type: "Bearer",
        username: user.username,
        role: role.to_string(),
    }))
}

/// Admin-only staff listing.
pub async fn list_users(
    State(state): State<AppState>,
    user: AuthUser,
) -> ApiResult<Json<serde_json::Value>> {
    user.require_admin()?;
    let users = User::find_all(&state.db_pool)
        .await
        .map_err(ApiError::Internal)?;
    let count = users.len();
    Ok(Json(serde_json::json!({
        "success": true,
        "count": count,
        "users": users,
    })))
}

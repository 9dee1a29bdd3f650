use axum::extract::{FromRequestParts, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::Response;
use tracing::debug;
use uuid::Uuid;

use crate::common::ApiError;
use crate::domains::auth::Role;
use crate::server::app::AppState;

/// Authenticated staff user extracted from the JWT.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: Role,
}

impl AuthUser {
    /// Gate for create-level actions (leads, hunts, messages).
    pub fn require_create(&self) -> Result<(), ApiError> {
        if self.role.can_create() {
            Ok(())
        } else {
            Err(ApiError::Forbidden(
                "your role cannot perform this action".into(),
            ))
        }
    }

    /// Gate for admin surfaces.
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role.is_admin() {
            Ok(())
        } else {
            Err(ApiError::Forbidden("admin access required".into()))
        }
    }
}

/// JWT authentication middleware.
///
/// Extracts the bearer token, verifies it, and adds `AuthUser` to the
/// request extensions. With no token or an invalid one the request
/// continues unauthenticated; protected handlers reject at extraction.
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    if let Some(user) = extract_auth_user(&request, &state) {
        debug!(username = %user.username, role = %user.role, "Authenticated request");
        request.extensions_mut().insert(user);
    }
    next.run(request).await
}

fn extract_auth_user(
    request: &axum::http::Request<axum::body::Body>,
    state: &AppState,
) -> Option<AuthUser> {
    let auth_header = request.headers().get("authorization")?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ").unwrap_or(auth_str);

    let claims = state.jwt_service.verify_token(token).ok()?;
    Some(AuthUser {
        user_id: claims.user_id,
        username: claims.username,
        role: claims.role,
    })
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("valid bearer token required".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_gate_follows_roles() {
        let agent = AuthUser {
            user_id: Uuid::now_v7(),
            username: "a".into(),
            role: Role::Agent,
        };
        assert!(agent.require_create().is_ok());
        assert!(agent.require_admin().is_err());

        let viewer = AuthUser {
            role: Role::Viewer,
            ..agent.clone()
        };
        assert!(viewer.require_create().is_err());
    }
}

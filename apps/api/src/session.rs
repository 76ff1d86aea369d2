//! Bearer-session extraction for handlers that require an identity. The
//! token is resolved against the auth provider on every request; there is
//! no local session store.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
};
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;
use crate::supabase::auth::AuthUser;

/// The caller's verified session: the identity behind the bearer token,
/// plus the token itself for forwarding on writes.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: AuthUser,
    pub access_token: String,
}

#[async_trait::async_trait]
impl FromRequestParts<AppState> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(&parts.headers).ok_or(AppError::Unauthorized)?;
        let user = state.auth.current_user(token).await.map_err(|e| {
            debug!("token resolution failed: {e}");
            AppError::Unauthorized
        })?;
        Ok(Session {
            user,
            access_token: token.to_string(),
        })
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

use axum::{extract::FromRequestParts, http::header};
use uuid::Uuid;

use crate::{error::AppError, models::Principal, state::AppState};

/// The signed-in caller, resolved from the bearer token against the
/// in-memory session table.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub token: Uuid,
    pub principal: Principal,
}

impl AuthUser {
    pub fn uid(&self) -> Uuid {
        self.principal.uid
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .ok_or_else(|| AppError::Unauthorized("Please log in to continue".into()))?;

        let auth_str = auth_header
            .to_str()
            .map_err(|_| AppError::Unauthorized("Invalid Authorization header".into()))?;

        if !auth_str.starts_with("Bearer ") {
            return Err(AppError::Unauthorized("Invalid Authorization scheme".into()));
        }
        let token = auth_str.trim_start_matches("Bearer ").trim();
        let token = Uuid::parse_str(token)
            .map_err(|_| AppError::Unauthorized("Invalid session token".into()))?;

        let principal = state
            .sessions
            .read()
            .get(&token)
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Session expired, please log in again".into()))?;

        Ok(AuthUser { token, principal })
    }
}

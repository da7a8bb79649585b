use uuid::Uuid;

use crate::{
    dto::session::{SessionResponse, SignInRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Principal,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn sign_in(
    state: &AppState,
    payload: SignInRequest,
) -> AppResult<ApiResponse<SessionResponse>> {
    let principal = state.identity.sign_in(&payload)?;
    let token = Uuid::new_v4();
    state.sessions.write().insert(token, principal.clone());
    state.mirror_sessions();
    tracing::info!(uid = %principal.uid, "signed in");

    Ok(ApiResponse::success(
        "Signed in",
        SessionResponse { token, principal },
        Some(Meta::empty()),
    ))
}

pub async fn current_session(user: &AuthUser) -> AppResult<ApiResponse<Principal>> {
    Ok(ApiResponse::success(
        "Session",
        user.principal.clone(),
        Some(Meta::empty()),
    ))
}

/// Removes the session and unconditionally clears the user's favorites
/// and cart. There is no per-user server-side persistence to come back
/// to, so nothing survives a sign-out.
pub async fn sign_out(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<serde_json::Value>> {
    state.sessions.write().remove(&user.token);
    state.favorites.write().remove(&user.uid());
    state.carts.write().remove(&user.uid());
    state.mirror_sessions();
    state.mirror_favorites();
    state.mirror_carts();
    tracing::info!(uid = %user.uid(), "signed out");

    Ok(ApiResponse::success(
        "Signed out",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

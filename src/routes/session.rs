use axum::{Json, Router, extract::State, routing::get, routing::post};

use crate::{
    dto::session::{SessionResponse, SignInRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Principal,
    response::ApiResponse,
    services::session_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(current_session))
        .route("/sign-in", post(sign_in))
        .route("/sign-out", post(sign_out))
}

#[utoipa::path(
    post,
    path = "/api/session/sign-in",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Principal issued with a bearer token", body = ApiResponse<SessionResponse>),
    ),
    tag = "Session"
)]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<SignInRequest>,
) -> AppResult<Json<ApiResponse<SessionResponse>>> {
    let resp = session_service::sign_in(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Current principal", body = ApiResponse<Principal>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Session"
)]
pub async fn current_session(
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Principal>>> {
    let resp = session_service::current_session(&user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/session/sign-out",
    responses(
        (status = 200, description = "Session removed; favorites and cart cleared", body = ApiResponse<serde_json::Value>),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Session"
)]
pub async fn sign_out(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = session_service::sign_out(&state, &user).await?;
    Ok(Json(resp))
}

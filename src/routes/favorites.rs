use axum::{Json, Router, extract::State, routing::get, routing::post};

use crate::{
    dto::favorites::{FavoriteProductList, ToggleFavoriteRequest, ToggleFavoriteResponse},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::favorite_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_favorites))
        .route("/toggle", post(toggle_favorite))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorited products in feed order", body = ApiResponse<FavoriteProductList>)
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn list_favorites(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<FavoriteProductList>>> {
    let resp = favorite_service::list_favorites(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/favorites/toggle",
    request_body = ToggleFavoriteRequest,
    responses(
        (status = 200, description = "Membership flipped", body = ApiResponse<ToggleFavoriteResponse>),
        (status = 400, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Favorites"
)]
pub async fn toggle_favorite(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<ToggleFavoriteRequest>,
) -> AppResult<Json<ApiResponse<ToggleFavoriteResponse>>> {
    let resp = favorite_service::toggle_favorite(&state, &user, payload).await?;
    Ok(Json(resp))
}

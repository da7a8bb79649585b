use chrono::Utc;

use crate::{
    dto::{
        favorites::{FavoriteProductList, ToggleFavoriteRequest, ToggleFavoriteResponse},
        products::ProductDto,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Membership flip in the caller's favorite set.
pub async fn toggle_favorite(
    state: &AppState,
    user: &AuthUser,
    payload: ToggleFavoriteRequest,
) -> AppResult<ApiResponse<ToggleFavoriteResponse>> {
    if state.catalog.get(payload.product_id).is_none() {
        return Err(AppError::BadRequest("Product not found".to_string()));
    }

    let favorited = {
        let mut favorites = state.favorites.write();
        let set = favorites.entry(user.uid()).or_default();
        if set.insert(payload.product_id) {
            true
        } else {
            set.remove(&payload.product_id);
            false
        }
    };
    state.mirror_favorites();
    tracing::info!(product_id = %payload.product_id, user_id = %user.uid(), favorited, "favorite toggled");

    let message = if favorited {
        "Added to favorites"
    } else {
        "Removed from favorites"
    };
    Ok(ApiResponse::success(
        message,
        ToggleFavoriteResponse { favorited },
        Some(Meta::empty()),
    ))
}

/// The caller's favorited products, in feed order.
pub async fn list_favorites(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<FavoriteProductList>> {
    let ids = state
        .favorites
        .read()
        .get(&user.uid())
        .cloned()
        .unwrap_or_default();

    let now = Utc::now();
    let items: Vec<ProductDto> = state
        .catalog
        .snapshot()
        .iter()
        .filter(|p| ids.contains(&p.id))
        .map(|p| ProductDto::from_product(p, now))
        .collect();

    let meta = Meta::count(items.len() as i64);
    Ok(ApiResponse::success(
        "Favorites",
        FavoriteProductList { items },
        Some(meta),
    ))
}

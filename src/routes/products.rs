use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::products::{CreateListingRequest, ProductDto, ProductList},
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::listing_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_listing))
        .route("/{id}", get(get_product).delete(delete_listing))
}

#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "Full catalog feed, newest first", body = ApiResponse<ProductList>)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = listing_service::list_products(&state).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Get product", body = ApiResponse<ProductDto>),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    let resp = listing_service::get_product(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateListingRequest,
    responses(
        (status = 200, description = "Listing created", body = ApiResponse<ProductDto>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not signed in"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn create_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateListingRequest>,
) -> AppResult<Json<ApiResponse<ProductDto>>> {
    let resp = listing_service::create_listing(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = Uuid, Path, description = "Product ID")
    ),
    responses(
        (status = 200, description = "Deleted", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Caller is not the seller"),
        (status = 404, description = "Product not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Products"
)]
pub async fn delete_listing(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = listing_service::delete_listing(&state, &user, id).await?;
    Ok(Json(resp))
}

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::{
    dto::products::{CreateListingRequest, ProductDto, ProductList},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{ListingStatus, Product},
    money::parse_price,
    response::{ApiResponse, Meta},
    services::file_service,
    state::AppState,
};

pub async fn list_products(state: &AppState) -> AppResult<ApiResponse<ProductList>> {
    let now = Utc::now();
    let items: Vec<ProductDto> = state
        .catalog
        .snapshot()
        .iter()
        .map(|p| ProductDto::from_product(p, now))
        .collect();

    let meta = Meta::count(items.len() as i64);
    Ok(ApiResponse::success("Products", ProductList { items }, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<ProductDto>> {
    let product = state.catalog.get(id).ok_or(AppError::NotFound)?;
    let dto = ProductDto::from_product(&product, Utc::now());
    Ok(ApiResponse::success("Product", dto, None))
}

pub async fn create_listing(
    state: &AppState,
    user: &AuthUser,
    payload: CreateListingRequest,
) -> AppResult<ApiResponse<ProductDto>> {
    let name = payload.name.trim();
    let description = payload.description.trim();
    let price = payload.price.trim();
    if name.is_empty() || description.is_empty() || price.is_empty() {
        return Err(AppError::BadRequest(
            "Please fill all required fields".to_string(),
        ));
    }

    let initial_price = parse_price(price).ok_or_else(|| {
        AppError::BadRequest("Please enter a valid initial price".to_string())
    })?;

    // An image must reference a file the upload endpoint handed out.
    if let Some(image) = payload.image_url.as_deref() {
        file_service::validate_filename(image)?;
        let is_file = tokio::fs::metadata(state.config.upload_dir.join(image))
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(AppError::BadRequest("Unknown image filename".to_string()));
        }
    }

    let now = Utc::now();
    let product = Product {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: description.to_string(),
        image_url: payload.image_url,
        seller_id: user.uid(),
        seller_name: user.principal.label().to_string(),
        initial_price,
        created_at: now,
        ends_at: now + Duration::hours(state.config.auction_hours),
        status: ListingStatus::Active,
    };
    state.catalog.insert(product.clone());
    tracing::info!(product_id = %product.id, seller_id = %product.seller_id, "listing created");

    Ok(ApiResponse::success(
        "Product listed",
        ProductDto::from_product(&product, now),
        Some(Meta::empty()),
    ))
}

pub async fn delete_listing(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let product = state.catalog.get(id).ok_or(AppError::NotFound)?;
    if product.seller_id != user.uid() {
        return Err(AppError::Forbidden(
            "You are not authorized to delete this product".to_string(),
        ));
    }

    state.catalog.remove(id);
    tracing::info!(product_id = %id, seller_id = %user.uid(), "listing deleted");

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

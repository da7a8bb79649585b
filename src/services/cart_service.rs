use chrono::Utc;
use uuid::Uuid;

use crate::{
    dto::cart::{AddToCartRequest, CartLineDto, CartView},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::CartLine,
    money::format_cents,
    response::{ApiResponse, Meta},
    state::AppState,
};

pub fn cart_total(lines: &[CartLine]) -> i64 {
    lines
        .iter()
        .map(|line| line.price * i64::from(line.quantity))
        .sum()
}

fn view_of(lines: &[CartLine]) -> CartView {
    let total_cents = cart_total(lines);
    CartView {
        items: lines.iter().map(CartLineDto::from).collect(),
        total_cents,
        total: format_cents(total_cents),
    }
}

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    let carts = state.carts.read();
    let lines = carts.get(&user.uid()).map(Vec::as_slice).unwrap_or(&[]);
    let meta = Meta::count(lines.len() as i64);
    Ok(ApiResponse::success("Cart", view_of(lines), Some(meta)))
}

/// First add inserts a line with quantity 1 and a price snapshot taken
/// now; adding the same product again only bumps the quantity.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<ApiResponse<CartLineDto>> {
    let product = state
        .catalog
        .get(payload.product_id)
        .ok_or_else(|| AppError::BadRequest("Product not found".to_string()))?;

    if !product.is_open(Utc::now()) {
        return Err(AppError::BadRequest("This listing has expired".to_string()));
    }
    if product.seller_id == user.uid() {
        return Err(AppError::BadRequest(
            "You cannot add your own item to the cart".to_string(),
        ));
    }

    let line = {
        let mut carts = state.carts.write();
        let lines = carts.entry(user.uid()).or_default();
        match lines.iter_mut().find(|l| l.product_id == product.id) {
            Some(line) => {
                line.quantity += 1;
                CartLineDto::from(&*line)
            }
            None => {
                let line = CartLine {
                    product_id: product.id,
                    name: product.name.clone(),
                    price: product.initial_price,
                    image_url: product.image_url.clone(),
                    quantity: 1,
                };
                let dto = CartLineDto::from(&line);
                lines.push(line);
                dto
            }
        }
    };
    state.mirror_carts();
    tracing::info!(product_id = %product.id, user_id = %user.uid(), "added to cart");

    Ok(ApiResponse::success("Added to cart", line, Some(Meta::empty())))
}

pub async fn change_quantity(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    delta: i32,
) -> AppResult<ApiResponse<CartLineDto>> {
    let line = {
        let mut carts = state.carts.write();
        let lines = carts.get_mut(&user.uid()).ok_or(AppError::NotFound)?;
        let line = lines
            .iter_mut()
            .find(|l| l.product_id == product_id)
            .ok_or(AppError::NotFound)?;
        line.quantity = line.quantity.saturating_add(delta).max(1);
        CartLineDto::from(&*line)
    };
    state.mirror_carts();

    Ok(ApiResponse::success("Quantity updated", line, Some(Meta::empty())))
}

pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let removed = {
        let mut carts = state.carts.write();
        match carts.get_mut(&user.uid()) {
            Some(lines) => {
                let before = lines.len();
                lines.retain(|l| l.product_id != product_id);
                lines.len() != before
            }
            None => false,
        }
    };
    if !removed {
        return Err(AppError::NotFound);
    }
    state.mirror_carts();
    tracing::info!(product_id = %product_id, user_id = %user.uid(), "removed from cart");

    Ok(ApiResponse::success(
        "Removed from cart",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

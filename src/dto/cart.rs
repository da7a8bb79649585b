use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{models::CartLine, money::format_cents};

#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChangeQuantityRequest {
    /// Signed adjustment; the resulting quantity is floored at 1.
    pub delta: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartLineDto {
    pub product_id: Uuid,
    pub name: String,
    pub price: String,
    pub image_url: Option<String>,
    pub quantity: i32,
}

impl From<&CartLine> for CartLineDto {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name.clone(),
            price: format_cents(line.price),
            image_url: line.image_url.clone(),
            quantity: line.quantity,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartView {
    pub items: Vec<CartLineDto>,
    pub total_cents: i64,
    pub total: String,
}

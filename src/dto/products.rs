use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    expiry::auction_status,
    models::{ListingStatus, Product},
    money::format_cents,
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateListingRequest {
    pub name: String,
    pub description: String,
    /// Decimal amount as typed, e.g. "25.50".
    pub price: String,
    /// Filename previously returned by the upload endpoint.
    pub image_url: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub seller_id: Uuid,
    pub seller_name: String,
    pub price: String,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: ListingStatus,
    pub auction_status: String,
}

impl ProductDto {
    /// Status and countdown are re-derived from the end time at render
    /// time; the stored status field is never displayed verbatim.
    pub fn from_product(product: &Product, now: DateTime<Utc>) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            seller_id: product.seller_id,
            seller_name: product.seller_name.clone(),
            price: format_cents(product.initial_price),
            created_at: product.created_at,
            ends_at: product.ends_at,
            status: product.display_status(now),
            auction_status: auction_status(product.ends_at, product.status, now),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<ProductDto>)]
    pub items: Vec<ProductDto>,
}

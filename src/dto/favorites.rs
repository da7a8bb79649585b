use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::products::ProductDto;

#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct ToggleFavoriteRequest {
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleFavoriteResponse {
    /// Membership after the flip.
    pub favorited: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct FavoriteProductList {
    #[schema(value_type = Vec<ProductDto>)]
    pub items: Vec<ProductDto>,
}

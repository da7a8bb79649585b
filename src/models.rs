use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ListingStatus {
    Active,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub image_url: Option<String>,
    pub seller_id: Uuid,
    pub seller_name: String,
    /// Starting price in cents.
    pub initial_price: i64,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: ListingStatus,
}

impl Product {
    /// The stored status is advisory; a listing past its end time is
    /// expired no matter what the record says.
    pub fn display_status(&self, now: DateTime<Utc>) -> ListingStatus {
        if self.ends_at <= now {
            ListingStatus::Expired
        } else {
            self.status
        }
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.display_status(now) == ListingStatus::Active
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    /// Price in cents, snapshotted when the line was first added. Later
    /// catalog edits do not reach into existing carts.
    pub price: i64,
    pub image_url: Option<String>,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    pub uid: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl Principal {
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .or(self.email.as_deref())
            .unwrap_or("Anonymous Seller")
    }
}

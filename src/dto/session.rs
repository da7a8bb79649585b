use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Principal;

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct SignInRequest {
    pub display_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionResponse {
    pub token: Uuid,
    pub principal: Principal,
}

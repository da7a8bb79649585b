use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadResponse {
    /// Server-generated name to pass back as a listing's `image_url`.
    pub filename: String,
}

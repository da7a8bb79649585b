use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
};

use crate::{
    dto::files::UploadResponse,
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::file_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/upload", post(upload_image))
        .route("/images/{filename}", get(serve_image))
}

#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "Stored; returns the generated filename", body = ApiResponse<UploadResponse>),
        (status = 400, description = "Missing imageFile field or oversized payload"),
    ),
    tag = "Files"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::BadRequest(format!("Malformed upload: {err}")))?
    {
        if field.name() != Some("imageFile") {
            continue;
        }
        let original_name = field.file_name().map(str::to_owned);
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::BadRequest(format!("Malformed upload: {err}")))?;
        let filename =
            file_service::save_upload(&state, original_name.as_deref(), &bytes).await?;

        return Ok(Json(ApiResponse::success(
            "File uploaded",
            UploadResponse { filename },
            Some(Meta::empty()),
        )));
    }

    Err(AppError::BadRequest(
        "Missing imageFile field".to_string(),
    ))
}

#[utoipa::path(
    get,
    path = "/api/images/{filename}",
    params(
        ("filename" = String, Path, description = "Filename returned by the upload endpoint")
    ),
    responses(
        (status = 200, description = "Image bytes with content type and length"),
        (status = 400, description = "Invalid filename"),
        (status = 404, description = "Image not found"),
        (status = 500, description = "Unexpected I/O failure"),
    ),
    tag = "Files"
)]
pub async fn serve_image(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    let (bytes, content_type) = file_service::open_image(&state, &filename).await?;
    let response = (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    )
        .into_response();
    Ok(response)
}

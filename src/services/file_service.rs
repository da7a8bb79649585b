use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    state::AppState,
};

/// Traversal guard, applied before any filesystem access. Served names
/// are always flat uuid-based filenames, so separators never appear in a
/// legitimate request.
pub fn validate_filename(name: &str) -> AppResult<()> {
    if name.is_empty() || name.contains("..") || name.contains('/') || name.contains('\\') {
        return Err(AppError::BadRequest("Invalid filename".to_string()));
    }
    Ok(())
}

pub fn content_type_for(name: &str) -> &'static str {
    let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
    match ext.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

fn sanitized_extension(original_name: Option<&str>) -> Option<String> {
    let ext = original_name?.rsplit_once('.')?.1;
    if ext.is_empty() || ext.len() > 8 || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Stores an uploaded image under a generated name and returns it.
pub async fn save_upload(
    state: &AppState,
    original_name: Option<&str>,
    bytes: &[u8],
) -> AppResult<String> {
    if bytes.len() > state.config.max_image_bytes {
        return Err(AppError::BadRequest(
            "Image is too large, please select a smaller one".to_string(),
        ));
    }

    let filename = match sanitized_extension(original_name) {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    };
    let path = state.config.upload_dir.join(&filename);
    tokio::fs::write(&path, bytes).await?;
    tracing::info!(filename = %filename, size = bytes.len(), "image stored");

    Ok(filename)
}

/// Reads a previously uploaded image. Invalid names are rejected before
/// the filesystem is touched; a missing file is 404, anything else 500.
pub async fn open_image(state: &AppState, name: &str) -> AppResult<(Vec<u8>, &'static str)> {
    validate_filename(name)?;

    let path = state.config.upload_dir.join(name);
    match tokio::fs::read(&path).await {
        Ok(bytes) => Ok((bytes, content_type_for(name))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(AppError::NotFound),
        Err(err) => Err(AppError::Io(err)),
    }
}

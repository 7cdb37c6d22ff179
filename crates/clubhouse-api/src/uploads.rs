use axum::{Json, extract::State};
use clubhouse_types::api::UploadImageResponse;
use clubhouse_upstream::{BucketCategory, ImageUpload};
use tracing::info;

use crate::error::ApiError;
use crate::extract::{FormData, UploadedFile};
use crate::state::AppState;

const UPLOAD_FAILED: &str = "Upload failed";

/// Size and content-type checks shared by every image upload. The object
/// key is fixed here as well.
pub fn prepare_image(
    state: &AppState,
    category: BucketCategory,
    identifier: Option<&str>,
    file: UploadedFile,
) -> Result<ImageUpload, ApiError> {
    if file.data.len() > state.max_upload_bytes {
        return Err(ApiError::PayloadTooLarge);
    }

    ImageUpload::new(
        category,
        identifier,
        file.file_name.as_deref(),
        file.content_type.as_deref(),
        file.data,
    )
    .map_err(|e| ApiError::upstream(e, UPLOAD_FAILED))
}

/// POST /upload-image/: multipart `file`, optional `bucket_type` and `file_id`.
pub async fn upload_image(
    State(state): State<AppState>,
    mut form: FormData,
) -> Result<Json<UploadImageResponse>, ApiError> {
    let file = form
        .take_file("file")
        .ok_or_else(|| ApiError::bad_request("No file provided"))?;

    let category = match form.non_blank("bucket_type") {
        None => BucketCategory::Media,
        Some(name) => BucketCategory::from_name(name)
            .ok_or_else(|| ApiError::bad_request("Invalid bucket type"))?,
    };

    let upload = prepare_image(&state, category, form.non_blank("file_id"), file)?;
    let stored = state
        .storage
        .put_image(&upload)
        .await
        .map_err(|e| ApiError::upstream(e, UPLOAD_FAILED))?;

    info!("Stored {} in bucket {}", stored.key, stored.bucket);

    Ok(Json(UploadImageResponse {
        success: true,
        filename: stored.key,
        url: stored.public_url,
        bucket: stored.bucket,
    }))
}

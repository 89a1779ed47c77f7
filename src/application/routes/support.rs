use axum::extract::Multipart;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;

use crate::application::errors::AppError;
use crate::domain::images::ImageUpload;

/// Name of the multipart part carrying the image.
const FILE_FIELD: &str = "file";

/// Largest image accepted by the extraction endpoint.
const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Body limit for image routes: the image itself plus multipart framing.
pub(crate) const IMAGE_BODY_LIMIT_BYTES: usize = MAX_IMAGE_BYTES + 64 * 1024;

const IMAGE_TOO_LARGE: &str = "Image must be under 10 MB";

/// Read the `file` part and reject images over `MAX_IMAGE_BYTES`.
pub(crate) async fn read_bounded_image(multipart: Multipart) -> Result<ImageUpload, AppError> {
    let image = read_image(multipart).await?;
    if image.bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::PayloadTooLarge(IMAGE_TOO_LARGE.to_string()));
    }
    Ok(image)
}

/// Read the `file` part of a multipart body fully into memory.
async fn read_image(mut multipart: Multipart) -> Result<ImageUpload, AppError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(String::from);
        let content_type = field.content_type().map(String::from);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        return Ok(ImageUpload {
            bytes: bytes.to_vec(),
            content_type,
            filename,
        });
    }

    Err(AppError::validation("file is required"))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(IMAGE_TOO_LARGE.to_string())
    } else {
        AppError::validation(err.body_text())
    }
}

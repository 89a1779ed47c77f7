use axum::Json;
use axum::extract::{Multipart, State};
use serde::Serialize;
use tracing::info;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::ApiError;
use crate::application::routes::support::read_bounded_image;
use crate::application::state::AppState;
use crate::domain::images::storage_key;

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    url: String,
}

/// Store an image under a fresh key in the caller's namespace and return its
/// public URL.
#[tracing::instrument(skip(state, auth_user, multipart))]
pub(crate) async fn upload_image(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let image = read_bounded_image(multipart).await?;
    let key = storage_key(&auth_user.user.id, image.extension());
    let content_type = image.content_type().to_string();
    let size = image.bytes.len();

    state
        .image_store
        .upload(&key, image.bytes, &content_type)
        .await?;
    let url = state.image_store.public_url(&key)?;

    info!(%key, %content_type, size, "image uploaded");
    Ok(Json(UploadResponse { url }))
}

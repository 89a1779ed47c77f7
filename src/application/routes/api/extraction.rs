use axum::Json;
use axum::extract::{Multipart, State};
use tracing::info;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::ApiError;
use crate::application::routes::support::read_bounded_image;
use crate::application::state::AppState;
use crate::infrastructure::ai;

/// Read a recipe off a photo with the vision model. Nothing is persisted.
#[tracing::instrument(skip(state, auth_user, multipart))]
pub(crate) async fn parse_image(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let image = read_bounded_image(multipart).await?;

    let (recipe, usage) = ai::extract_recipe(
        &state.http_client,
        &state.openai_url,
        &state.openai_api_key,
        &state.openai_model,
        &image,
    )
    .await?;

    match usage {
        Some(usage) => info!(
            user_id = %auth_user.user.id,
            model = %state.openai_model,
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "recipe extracted from image"
        ),
        None => info!(
            user_id = %auth_user.user.id,
            model = %state.openai_model,
            "recipe extracted from image"
        ),
    }

    Ok(Json(recipe))
}

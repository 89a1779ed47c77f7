pub(crate) mod extraction;
pub(crate) mod images;
pub(crate) mod recipes;

use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, post};

use crate::application::auth::require_auth;
use crate::application::routes::support::IMAGE_BODY_LIMIT_BYTES;
use crate::application::state::AppState;

pub(super) fn router(state: AppState) -> axum::Router<AppState> {
    image_routes()
        .merge(recipe_routes())
        .route_layer(middleware::from_fn_with_state(state, require_auth))
}

fn image_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/parse-image", post(extraction::parse_image))
        .route("/upload-image", post(images::upload_image))
        .layer(DefaultBodyLimit::max(IMAGE_BODY_LIMIT_BYTES))
}

fn recipe_routes() -> axum::Router<AppState> {
    axum::Router::new()
        .route(
            "/recipes",
            get(recipes::list_recipes).post(recipes::save_recipe),
        )
        .route(
            "/recipes/{id}",
            get(recipes::get_recipe).delete(recipes::delete_recipe),
        )
}

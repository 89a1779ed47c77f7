use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;

use crate::application::services::RecipeService;
use crate::domain::repositories::{IdentityProvider, ImageStore, RecipeRepository};
use crate::infrastructure::identity::SupabaseIdentityProvider;
use crate::infrastructure::repositories::recipes::SupabaseRecipeRepository;
use crate::infrastructure::storage::{RECIPE_IMAGES_BUCKET, SupabaseImageStore};
use crate::infrastructure::supabase::SupabaseClient;

/// Model API and browser access settings. These vary between production and
/// tests independently of the backend adapters.
pub struct AppStateConfig {
    pub openai_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub allowed_origin: HeaderValue,
}

#[derive(Clone)]
pub struct AppState {
    pub identity: Arc<dyn IdentityProvider>,
    pub image_store: Arc<dyn ImageStore>,
    pub recipe_repo: Arc<dyn RecipeRepository>,
    pub recipe_service: RecipeService,
    pub http_client: reqwest::Client,
    pub openai_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub allowed_origin: HeaderValue,
}

impl AppState {
    /// Build the application state around explicitly supplied adapters.
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        image_store: Arc<dyn ImageStore>,
        recipe_repo: Arc<dyn RecipeRepository>,
        config: AppStateConfig,
    ) -> Self {
        let recipe_service = RecipeService::new(Arc::clone(&recipe_repo));
        Self {
            identity,
            image_store,
            recipe_repo,
            recipe_service,
            #[allow(clippy::expect_used)]
            http_client: reqwest::ClientBuilder::new()
                .timeout(Duration::from_secs(30))
                .build()
                .expect("failed to build HTTP client"),
            openai_url: config.openai_url,
            openai_api_key: config.openai_api_key,
            openai_model: config.openai_model,
            allowed_origin: config.allowed_origin,
        }
    }

    /// Build the full application state with every adapter backed by the
    /// managed backend.
    pub fn from_supabase(client: &SupabaseClient, config: AppStateConfig) -> Self {
        let identity: Arc<dyn IdentityProvider> =
            Arc::new(SupabaseIdentityProvider::new(client.clone()));
        let image_store: Arc<dyn ImageStore> = Arc::new(SupabaseImageStore::new(
            client.clone(),
            RECIPE_IMAGES_BUCKET,
        ));
        let recipe_repo: Arc<dyn RecipeRepository> =
            Arc::new(SupabaseRecipeRepository::new(client.clone()));

        Self::new(identity, image_store, recipe_repo, config)
    }
}

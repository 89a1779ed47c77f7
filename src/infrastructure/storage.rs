use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::CONTENT_TYPE;

use crate::domain::RepositoryError;
use crate::domain::repositories::ImageStore;
use crate::infrastructure::supabase::SupabaseClient;

pub const RECIPE_IMAGES_BUCKET: &str = "recipe-images";

/// Public-read bucket in the backend's object storage.
#[derive(Clone)]
pub struct SupabaseImageStore {
    client: SupabaseClient,
    bucket: String,
}

impl SupabaseImageStore {
    pub fn new(client: SupabaseClient, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    fn object_url(&self, key: &str) -> Result<reqwest::Url, RepositoryError> {
        self.client
            .object_endpoint(&format!("storage/v1/object/{}", self.bucket), key)
    }
}

#[async_trait]
impl ImageStore for SupabaseImageStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RepositoryError> {
        let url = self.object_url(key)?;
        let request = self
            .client
            .request(Method::POST, url)
            .header(CONTENT_TYPE, content_type)
            .body(bytes);
        let response = self.client.send(request).await?;
        self.client.expect_success(response).await
    }

    fn public_url(&self, key: &str) -> Result<String, RepositoryError> {
        let prefix = format!("storage/v1/object/public/{}", self.bucket);
        self.client
            .object_endpoint(&prefix, key)
            .map(String::from)
    }
}

use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;

use crate::domain::RepositoryError;
use crate::domain::ids::UserId;
use crate::domain::repositories::IdentityProvider;
use crate::domain::users::User;
use crate::infrastructure::supabase::SupabaseClient;

const USER_PATH: &str = "auth/v1/user";

/// Exchanges end-user access tokens for users via the backend's auth service.
#[derive(Clone)]
pub struct SupabaseIdentityProvider {
    client: SupabaseClient,
}

impl SupabaseIdentityProvider {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

#[derive(Debug, Deserialize)]
struct UserRecord {
    id: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[async_trait]
impl IdentityProvider for SupabaseIdentityProvider {
    async fn user_for_token(&self, token: &str) -> Result<User, RepositoryError> {
        let url = self.client.endpoint(USER_PATH)?;
        let response = self
            .client
            .send(self.client.user_request(Method::GET, url, token))
            .await?;
        let record: UserRecord = self.client.handle_response(response).await?;

        let id = record
            .id
            .filter(|id| !id.is_empty())
            .ok_or(RepositoryError::Unauthorized)?;
        Ok(User::new(UserId::new(id), record.email))
    }
}

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::ids::{RecipeId, UserId};
use crate::domain::recipes::{Ingredient, NewIngredientRow, NewRecipe, Recipe};
use crate::domain::users::User;

/// Resolves bearer tokens to users.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Fails with `Unauthorized` (or any other error) when the token does not
    /// map to a live user.
    async fn user_for_token(&self, token: &str) -> Result<User, RepositoryError>;
}

/// Public-read object storage for recipe images.
#[async_trait]
pub trait ImageStore: Send + Sync {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RepositoryError>;

    fn public_url(&self, key: &str) -> Result<String, RepositoryError>;
}

/// Recipe and ingredient rows. Every recipe query takes the owner so that
/// rows belonging to other users are never visible.
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    async fn insert(&self, user_id: &UserId, recipe: &NewRecipe)
    -> Result<Recipe, RepositoryError>;
    async fn insert_ingredients(&self, rows: &[NewIngredientRow]) -> Result<(), RepositoryError>;
    /// Newest first.
    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Recipe>, RepositoryError>;
    async fn get_for_user(
        &self,
        id: &RecipeId,
        user_id: &UserId,
    ) -> Result<Recipe, RepositoryError>;
    /// Ordered by `sort_order`. Callers must have resolved the recipe through
    /// `get_for_user` first.
    async fn list_ingredients(&self, recipe_id: &RecipeId)
    -> Result<Vec<Ingredient>, RepositoryError>;
    /// Silent when nothing matches. Ingredients go with the recipe through the
    /// store's cascading foreign key.
    async fn delete_for_user(&self, id: &RecipeId, user_id: &UserId)
    -> Result<(), RepositoryError>;
}

use async_trait::async_trait;
use reqwest::Method;

use crate::domain::RepositoryError;
use crate::domain::ids::{RecipeId, UserId};
use crate::domain::recipes::{Ingredient, NewIngredientRow, NewRecipe, Recipe};
use crate::domain::repositories::RecipeRepository;
use crate::infrastructure::supabase::SupabaseClient;

const RECIPES_TABLE: &str = "rest/v1/recipes";
const INGREDIENTS_TABLE: &str = "rest/v1/ingredients";

/// Recipe rows in the backend's REST table API.
#[derive(Clone)]
pub struct SupabaseRecipeRepository {
    client: SupabaseClient,
}

impl SupabaseRecipeRepository {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

#[async_trait]
impl RecipeRepository for SupabaseRecipeRepository {
    async fn insert(
        &self,
        user_id: &UserId,
        recipe: &NewRecipe,
    ) -> Result<Recipe, RepositoryError> {
        let url = self.client.endpoint(RECIPES_TABLE)?;
        let request = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "return=representation")
            .json(&recipe.row(user_id));
        let response = self.client.send(request).await?;

        let rows: Vec<Recipe> = self.client.handle_response(response).await?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepositoryError::unexpected("recipe insert returned no rows"))
    }

    async fn insert_ingredients(&self, rows: &[NewIngredientRow]) -> Result<(), RepositoryError> {
        if rows.is_empty() {
            return Ok(());
        }

        let url = self.client.endpoint(INGREDIENTS_TABLE)?;
        let request = self
            .client
            .request(Method::POST, url)
            .header("Prefer", "return=minimal")
            .json(rows);
        let response = self.client.send(request).await?;
        self.client.expect_success(response).await
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Recipe>, RepositoryError> {
        let url = self.client.endpoint(RECIPES_TABLE)?;
        let request = self.client.request(Method::GET, url).query(&[
            ("select", "*".to_string()),
            ("user_id", eq(user_id.as_str())),
            ("order", "created_at.desc".to_string()),
        ]);
        let response = self.client.send(request).await?;
        self.client.handle_response(response).await
    }

    async fn get_for_user(
        &self,
        id: &RecipeId,
        user_id: &UserId,
    ) -> Result<Recipe, RepositoryError> {
        let url = self.client.endpoint(RECIPES_TABLE)?;
        let request = self.client.request(Method::GET, url).query(&[
            ("select", "*".to_string()),
            ("id", eq(id.as_str())),
            ("user_id", eq(user_id.as_str())),
            ("limit", "1".to_string()),
        ]);
        let response = self.client.send(request).await?;

        // An id the id column can't parse matches nothing.
        let rows: Vec<Recipe> = match self.client.handle_response(response).await {
            Err(RepositoryError::InvalidInput(_)) => return Err(RepositoryError::NotFound),
            other => other?,
        };
        rows.into_iter().next().ok_or(RepositoryError::NotFound)
    }

    async fn list_ingredients(
        &self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<Ingredient>, RepositoryError> {
        let url = self.client.endpoint(INGREDIENTS_TABLE)?;
        let request = self.client.request(Method::GET, url).query(&[
            ("select", "*".to_string()),
            ("recipe_id", eq(recipe_id.as_str())),
            ("order", "sort_order.asc".to_string()),
        ]);
        let response = self.client.send(request).await?;
        self.client.handle_response(response).await
    }

    async fn delete_for_user(
        &self,
        id: &RecipeId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let url = self.client.endpoint(RECIPES_TABLE)?;
        let request = self
            .client
            .request(Method::DELETE, url)
            .header("Prefer", "return=minimal")
            .query(&[("id", eq(id.as_str())), ("user_id", eq(user_id.as_str()))]);
        let response = self.client.send(request).await?;
        match self.client.expect_success(response).await {
            Err(RepositoryError::InvalidInput(_)) => Ok(()),
            other => other,
        }
    }
}

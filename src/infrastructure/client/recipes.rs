use anyhow::Result;
use reqwest::Method;
use serde::{Deserialize, Serialize};

use super::{ScranbookClient, check_status, read_json};
use crate::domain::ids::RecipeId;
use crate::domain::recipes::{NewRecipe, Recipe, RecipeWithIngredients};

#[derive(Debug, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: RecipeId,
}

pub struct RecipesClient<'a> {
    client: &'a ScranbookClient,
}

impl<'a> RecipesClient<'a> {
    pub fn new(client: &'a ScranbookClient) -> Self {
        Self { client }
    }

    pub async fn save(&self, recipe: &NewRecipe) -> Result<SavedRecipe> {
        let response = self
            .client
            .call(Method::POST, "recipes")?
            .json(recipe)
            .send()
            .await?;
        read_json(response).await
    }

    /// Newest first.
    pub async fn list(&self) -> Result<Vec<Recipe>> {
        let response = self.client.call(Method::GET, "recipes")?.send().await?;
        read_json(response).await
    }

    pub async fn get(&self, id: &RecipeId) -> Result<RecipeWithIngredients> {
        let response = self
            .client
            .call(Method::GET, &format!("recipes/{id}"))?
            .send()
            .await?;
        read_json(response).await
    }

    pub async fn delete(&self, id: &RecipeId) -> Result<()> {
        let response = self
            .client
            .call(Method::DELETE, &format!("recipes/{id}"))?
            .send()
            .await?;
        check_status(response).await.map(drop)
    }
}

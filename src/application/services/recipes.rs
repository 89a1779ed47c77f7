use std::sync::Arc;

use tracing::{error, warn};

use crate::domain::errors::RepositoryError;
use crate::domain::ids::{RecipeId, UserId};
use crate::domain::recipes::{NewRecipe, Recipe, RecipeWithIngredients};
use crate::domain::repositories::RecipeRepository;

#[derive(Clone)]
pub struct RecipeService {
    recipes: Arc<dyn RecipeRepository>,
}

impl RecipeService {
    pub fn new(recipes: Arc<dyn RecipeRepository>) -> Self {
        Self { recipes }
    }

    /// Insert the recipe row, then its ingredient rows numbered in input order.
    ///
    /// The table API offers no transaction spanning both writes. When the
    /// ingredient insert fails the recipe row is deleted again so that no
    /// ingredient-less recipe is left behind, and the original error is returned.
    pub async fn save(&self, user_id: &UserId, new: &NewRecipe) -> Result<Recipe, RepositoryError> {
        let recipe = self.recipes.insert(user_id, new).await?;

        let rows = new.ingredient_rows(&recipe.id);
        if rows.is_empty() {
            return Ok(recipe);
        }

        if let Err(err) = self.recipes.insert_ingredients(&rows).await {
            warn!(error = %err, recipe_id = %recipe.id, "ingredient insert failed, removing recipe");
            if let Err(cleanup_err) = self.recipes.delete_for_user(&recipe.id, user_id).await {
                error!(
                    error = %cleanup_err,
                    recipe_id = %recipe.id,
                    "failed to remove recipe after ingredient insert failure"
                );
            }
            return Err(err);
        }

        Ok(recipe)
    }

    /// The caller's recipe with its ingredients; `NotFound` for recipes that
    /// don't exist or belong to someone else.
    pub async fn get(
        &self,
        user_id: &UserId,
        id: &RecipeId,
    ) -> Result<RecipeWithIngredients, RepositoryError> {
        let recipe = self.recipes.get_for_user(id, user_id).await?;
        let ingredients = self.recipes.list_ingredients(&recipe.id).await?;
        Ok(RecipeWithIngredients {
            recipe,
            ingredients,
        })
    }
}

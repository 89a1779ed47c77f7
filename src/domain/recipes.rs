use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::ids::{IngredientId, RecipeId, UserId};

/// A stored recipe row. Owned by exactly one user; never updated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    pub id: RecipeId,
    pub user_id: UserId,
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A stored ingredient row, ordered within its recipe by `sort_order`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: IngredientId,
    pub recipe_id: RecipeId,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub sort_order: i32,
}

/// Recipe fields merged with its ingredients, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeWithIngredients {
    #[serde(flatten)]
    pub recipe: Recipe,
    pub ingredients: Vec<Ingredient>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRecipe {
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<NewIngredient>,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The recipe row written to the table store, stamped with its owner.
#[derive(Debug, Clone, Serialize)]
pub struct NewRecipeRow<'a> {
    pub user_id: &'a UserId,
    pub name: &'a str,
    pub steps: &'a [String],
    pub image_url: Option<&'a str>,
}

/// An ingredient row ready for insertion under an existing recipe.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewIngredientRow {
    pub recipe_id: RecipeId,
    pub name: String,
    pub amount: f64,
    pub unit: String,
    pub sort_order: i32,
}

impl NewRecipe {
    pub fn row<'a>(&'a self, user_id: &'a UserId) -> NewRecipeRow<'a> {
        NewRecipeRow {
            user_id,
            name: &self.name,
            steps: &self.steps,
            image_url: self.image_url.as_deref(),
        }
    }

    /// One row per ingredient, numbered by its position in the input list.
    pub fn ingredient_rows(&self, recipe_id: &RecipeId) -> Vec<NewIngredientRow> {
        self.ingredients
            .iter()
            .zip(0..)
            .map(|(ingredient, sort_order)| NewIngredientRow {
                recipe_id: recipe_id.clone(),
                name: ingredient.name.clone(),
                amount: ingredient.amount,
                unit: ingredient.unit.clone(),
                sort_order,
            })
            .collect()
    }
}

use axum::Json;
use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::application::auth::AuthenticatedUser;
use crate::application::errors::{ApiError, AppError};
use crate::application::state::AppState;
use crate::domain::ids::RecipeId;
use crate::domain::recipes::{NewIngredient, NewRecipe, Recipe, RecipeWithIngredients};

#[derive(Debug, Deserialize)]
pub(crate) struct IngredientSubmission {
    name: String,
    amount: f64,
    unit: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecipeSubmission {
    name: String,
    #[serde(default)]
    ingredients: Vec<IngredientSubmission>,
    #[serde(default)]
    steps: Vec<String>,
    #[serde(default)]
    image_url: Option<String>,
}

impl RecipeSubmission {
    fn into_new_recipe(self) -> Result<NewRecipe, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::validation("name is required"));
        }

        let ingredients = self
            .ingredients
            .into_iter()
            .map(|ingredient| {
                if !ingredient.amount.is_finite() || ingredient.amount < 0.0 {
                    return Err(AppError::validation(format!(
                        "amount for {} must be zero or more",
                        ingredient.name
                    )));
                }
                Ok(NewIngredient {
                    name: ingredient.name,
                    amount: ingredient.amount,
                    unit: ingredient.unit,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(NewRecipe {
            name: self.name,
            ingredients,
            steps: self.steps,
            image_url: self.image_url,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SavedRecipe {
    id: RecipeId,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteResponse {
    ok: bool,
}

#[tracing::instrument(skip(state, auth_user, submission))]
pub(crate) async fn save_recipe(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Json(submission): Json<RecipeSubmission>,
) -> Result<Json<SavedRecipe>, ApiError> {
    let new_recipe = submission.into_new_recipe()?;

    let recipe = state
        .recipe_service
        .save(&auth_user.user.id, &new_recipe)
        .await?;

    info!(
        recipe_id = %recipe.id,
        ingredients = new_recipe.ingredients.len(),
        steps = new_recipe.steps.len(),
        "recipe saved"
    );
    Ok(Json(SavedRecipe { id: recipe.id }))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn list_recipes(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
) -> Result<Json<Vec<Recipe>>, ApiError> {
    let recipes = state.recipe_repo.list_for_user(&auth_user.user.id).await?;
    Ok(Json(recipes))
}

#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn get_recipe(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<RecipeWithIngredients>, ApiError> {
    let id = RecipeId::parse(&id).ok_or(AppError::NotFound)?;
    let recipe = state.recipe_service.get(&auth_user.user.id, &id).await?;
    Ok(Json(recipe))
}

/// Always succeeds for ids the caller doesn't own; nothing is touched then.
#[tracing::instrument(skip(state, auth_user))]
pub(crate) async fn delete_recipe(
    State(state): State<AppState>,
    auth_user: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, ApiError> {
    let Some(id) = RecipeId::parse(&id) else {
        return Ok(Json(DeleteResponse { ok: true }));
    };

    state
        .recipe_repo
        .delete_for_user(&id, &auth_user.user.id)
        .await?;

    info!(%id, "recipe delete issued");
    Ok(Json(DeleteResponse { ok: true }))
}

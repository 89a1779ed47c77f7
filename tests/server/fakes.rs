use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use scranbook::domain::RepositoryError;
use scranbook::domain::ids::{IngredientId, RecipeId, UserId};
use scranbook::domain::recipes::{Ingredient, NewIngredientRow, NewRecipe, Recipe};
use scranbook::domain::repositories::{IdentityProvider, ImageStore, RecipeRepository};
use scranbook::domain::users::User;

pub const PUBLIC_STORAGE_BASE: &str = "https://storage.test/recipe-images";

/// Maps fixed bearer tokens to users.
#[derive(Default)]
pub struct FakeIdentity {
    users: HashMap<String, User>,
}

impl FakeIdentity {
    pub fn with_user(mut self, token: &str, user: User) -> Self {
        self.users.insert(token.to_string(), user);
        self
    }
}

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn user_for_token(&self, token: &str) -> Result<User, RepositoryError> {
        self.users
            .get(token)
            .cloned()
            .ok_or(RepositoryError::Unauthorized)
    }
}

#[derive(Debug, Clone)]
pub struct StoredObject {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

#[derive(Default)]
pub struct InMemoryImageStore {
    objects: Mutex<HashMap<String, StoredObject>>,
}

impl InMemoryImageStore {
    pub fn objects(&self) -> HashMap<String, StoredObject> {
        self.objects.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageStore for InMemoryImageStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), RepositoryError> {
        self.objects.lock().unwrap().insert(
            key.to_string(),
            StoredObject {
                bytes,
                content_type: content_type.to_string(),
            },
        );
        Ok(())
    }

    fn public_url(&self, key: &str) -> Result<String, RepositoryError> {
        Ok(format!("{PUBLIC_STORAGE_BASE}/{key}"))
    }
}

/// Table store double. Deleting a recipe takes its ingredients with it, like
/// the cascading foreign key in the real schema.
#[derive(Default)]
pub struct InMemoryRecipeRepository {
    recipes: Mutex<Vec<Recipe>>,
    ingredients: Mutex<Vec<Ingredient>>,
    fail_ingredient_inserts: AtomicBool,
    clock: AtomicI64,
}

impl InMemoryRecipeRepository {
    pub fn fail_ingredient_inserts(&self) {
        self.fail_ingredient_inserts.store(true, Ordering::SeqCst);
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.lock().unwrap().len()
    }

    pub fn ingredient_rows(&self, recipe_id: &RecipeId) -> Vec<Ingredient> {
        self.ingredients
            .lock()
            .unwrap()
            .iter()
            .filter(|row| &row.recipe_id == recipe_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecipeRepository for InMemoryRecipeRepository {
    async fn insert(
        &self,
        user_id: &UserId,
        recipe: &NewRecipe,
    ) -> Result<Recipe, RepositoryError> {
        // Strictly increasing timestamps keep newest-first ordering deterministic.
        let tick = self.clock.fetch_add(1, Ordering::SeqCst);
        let stored = Recipe {
            id: RecipeId::new(uuid::Uuid::new_v4().to_string()),
            user_id: user_id.clone(),
            name: recipe.name.clone(),
            steps: recipe.steps.clone(),
            image_url: recipe.image_url.clone(),
            created_at: Utc::now() + Duration::milliseconds(tick),
        };
        self.recipes.lock().unwrap().push(stored.clone());
        Ok(stored)
    }

    async fn insert_ingredients(&self, rows: &[NewIngredientRow]) -> Result<(), RepositoryError> {
        if self.fail_ingredient_inserts.load(Ordering::SeqCst) {
            return Err(RepositoryError::unexpected("ingredients table unavailable"));
        }

        let mut ingredients = self.ingredients.lock().unwrap();
        ingredients.extend(rows.iter().map(|row| Ingredient {
            id: IngredientId::new(uuid::Uuid::new_v4().to_string()),
            recipe_id: row.recipe_id.clone(),
            name: row.name.clone(),
            amount: row.amount,
            unit: row.unit.clone(),
            sort_order: row.sort_order,
        }));
        Ok(())
    }

    async fn list_for_user(&self, user_id: &UserId) -> Result<Vec<Recipe>, RepositoryError> {
        let mut recipes: Vec<Recipe> = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|recipe| &recipe.user_id == user_id)
            .cloned()
            .collect();
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn get_for_user(
        &self,
        id: &RecipeId,
        user_id: &UserId,
    ) -> Result<Recipe, RepositoryError> {
        self.recipes
            .lock()
            .unwrap()
            .iter()
            .find(|recipe| &recipe.id == id && &recipe.user_id == user_id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_ingredients(
        &self,
        recipe_id: &RecipeId,
    ) -> Result<Vec<Ingredient>, RepositoryError> {
        let mut rows = self.ingredient_rows(recipe_id);
        rows.sort_by_key(|row| row.sort_order);
        Ok(rows)
    }

    async fn delete_for_user(
        &self,
        id: &RecipeId,
        user_id: &UserId,
    ) -> Result<(), RepositoryError> {
        let mut recipes = self.recipes.lock().unwrap();
        let before = recipes.len();
        recipes.retain(|recipe| !(&recipe.id == id && &recipe.user_id == user_id));
        if recipes.len() < before {
            self.ingredients
                .lock()
                .unwrap()
                .retain(|row| &row.recipe_id != id);
        }
        Ok(())
    }
}

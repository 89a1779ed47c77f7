mod recipes;

pub use recipes::RecipeService;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use super::print_json;
use crate::domain::ids::RecipeId;
use crate::domain::recipes::NewRecipe;
use crate::infrastructure::client::ScranbookClient;

#[derive(Debug, Subcommand)]
pub enum RecipeCommands {
    /// List your recipes, newest first
    List,
    /// Get a recipe with its ingredients
    Get(RecipeIdCommand),
    /// Delete a recipe
    Delete(RecipeIdCommand),
    /// Save a recipe from a JSON file
    Save(SaveRecipeCommand),
}

pub async fn run(client: &ScranbookClient, cmd: RecipeCommands) -> Result<()> {
    match cmd {
        RecipeCommands::List => list_recipes(client).await,
        RecipeCommands::Get(c) => get_recipe(client, c).await,
        RecipeCommands::Delete(c) => delete_recipe(client, c).await,
        RecipeCommands::Save(c) => save_recipe(client, c).await,
    }
}

#[derive(Debug, Args)]
pub struct RecipeIdCommand {
    #[arg(long)]
    pub id: String,
}

#[derive(Debug, Args)]
pub struct SaveRecipeCommand {
    /// JSON file with `name`, `ingredients`, `steps` and optional `image_url`
    #[arg(long)]
    pub file: PathBuf,
}

pub async fn list_recipes(client: &ScranbookClient) -> Result<()> {
    let recipes = client.recipes().list().await?;
    print_json(&recipes)
}

pub async fn get_recipe(client: &ScranbookClient, command: RecipeIdCommand) -> Result<()> {
    let recipe = client.recipes().get(&RecipeId::new(command.id)).await?;
    print_json(&recipe)
}

pub async fn delete_recipe(client: &ScranbookClient, command: RecipeIdCommand) -> Result<()> {
    client.recipes().delete(&RecipeId::new(command.id)).await?;
    eprintln!("Recipe deleted.");
    Ok(())
}

pub async fn save_recipe(client: &ScranbookClient, command: SaveRecipeCommand) -> Result<()> {
    let contents = std::fs::read_to_string(&command.file)
        .with_context(|| format!("failed to read {}", command.file.display()))?;
    let recipe: NewRecipe = serde_json::from_str(&contents).context("invalid recipe JSON")?;

    let saved = client.recipes().save(&recipe).await?;
    print_json(&saved)
}

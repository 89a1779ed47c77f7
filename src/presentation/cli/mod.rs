pub mod images;
pub mod recipes;

use std::net::SocketAddr;

use clap::{Args, Parser, Subcommand};
use images::ImageFileCommand;
use recipes::RecipeCommands;

use crate::infrastructure::ai::DEFAULT_MODEL;

#[derive(Debug, Parser)]
#[command(author, version, about = "Turn recipe photos into a personal recipe book", long_about = None)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        env = "SCRANBOOK_URL",
        default_value = "http://localhost:8000"
    )]
    pub api_url: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the HTTP server
    Serve(ServeCommand),

    /// Manage saved recipes
    Recipe {
        #[command(subcommand)]
        command: RecipeCommands,
    },

    /// Extract a recipe from a photo without saving it
    #[command(name = "parse-image")]
    ParseImage(ImageFileCommand),

    /// Upload a photo and print its public URL
    #[command(name = "upload-image")]
    UploadImage(ImageFileCommand),
}

#[derive(Debug, Args)]
pub struct ServeCommand {
    #[arg(long, env = "SCRANBOOK_BIND_ADDRESS", default_value = "127.0.0.1:8000")]
    pub bind_address: SocketAddr,

    #[arg(long, env = "SUPABASE_URL")]
    pub supabase_url: String,

    #[arg(long, env = "SUPABASE_SERVICE_KEY", hide_env_values = true)]
    pub supabase_service_key: String,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub openai_api_key: Option<String>,

    #[arg(long, env = "SCRANBOOK_OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub openai_model: String,

    #[arg(long, env = "FRONTEND_URL", default_value = "http://localhost:5173")]
    pub frontend_url: String,
}

pub(crate) fn print_json<T>(value: &T) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}

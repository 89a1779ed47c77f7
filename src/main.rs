use anyhow::Result;
use clap::Parser;
use scranbook::application::{ServerConfig, serve};
use scranbook::infrastructure::client::ScranbookClient;
use scranbook::presentation::cli::{Cli, Commands, ServeCommand, images, recipes};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (before clap parses env vars)
    let _ = dotenvy::dotenv();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(cmd) => run_server(cmd).await,
        Commands::Recipe { command } => {
            let client = ScranbookClient::from_env(&cli.api_url)?;
            recipes::run(&client, command).await
        }
        Commands::ParseImage(cmd) => {
            let client = ScranbookClient::from_env(&cli.api_url)?;
            images::parse_image(&client, cmd).await
        }
        Commands::UploadImage(cmd) => {
            let client = ScranbookClient::from_env(&cli.api_url)?;
            images::upload_image(&client, cmd).await
        }
    }
}

async fn run_server(command: ServeCommand) -> Result<()> {
    let config = ServerConfig {
        bind_address: command.bind_address,
        supabase_url: command.supabase_url,
        supabase_service_key: command.supabase_service_key,
        openai_api_key: command.openai_api_key.unwrap_or_default(),
        openai_model: command.openai_model,
        frontend_url: command.frontend_url,
    };

    serve(config).await
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if logging cannot be initialized
fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var("RUST_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(env_filter);

    if use_json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().compact())
            .init();
    }
}

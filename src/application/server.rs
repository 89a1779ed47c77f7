use std::net::SocketAddr;

use anyhow::Context;
use axum::http::HeaderValue;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};

use crate::application::routes::app_router;
use crate::application::state::{AppState, AppStateConfig};
use crate::infrastructure::ai::OPENAI_URL;
use crate::infrastructure::supabase::SupabaseClient;

pub struct ServerConfig {
    pub bind_address: SocketAddr,
    pub supabase_url: String,
    pub supabase_service_key: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub frontend_url: String,
}

pub async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    let allowed_origin = HeaderValue::from_str(config.frontend_url.trim_end_matches('/'))
        .with_context(|| format!("invalid FRONTEND_URL: {}", config.frontend_url))?;

    let supabase = SupabaseClient::from_base_url(&config.supabase_url, config.supabase_service_key)
        .context("failed to build Supabase client")?;

    if config.openai_api_key.is_empty() {
        warn!("OPENAI_API_KEY is not set; image parsing requests will fail");
    }

    let state = AppState::from_supabase(
        &supabase,
        AppStateConfig {
            openai_url: OPENAI_URL.to_string(),
            openai_api_key: config.openai_api_key,
            openai_model: config.openai_model,
            allowed_origin,
        },
    );

    let listener = TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("failed to bind to {}", config.bind_address))?;

    let app = app_router(state);

    info!(
        address = %config.bind_address,
        supabase = %config.supabase_url,
        frontend = %config.frontend_url,
        "starting HTTP server"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated unexpectedly")?;

    info!("server shutdown complete");

    Ok(())
}

#[allow(clippy::expect_used)] // Startup: panicking is appropriate if signal handlers fail
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}

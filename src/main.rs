mod appstate;
mod config;
mod error;
mod inference;
mod routes;
#[cfg(test)]
mod testing;
mod types;

use anyhow::Context;
use clap::Parser;
use tracing::{info, warn};

use crate::{
    appstate::AppState,
    config::{Args, Settings, detect_ci},
    inference::AzureChatClient,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let validate_key = args.validate_key;
    let ci = detect_ci();
    if ci {
        warn!("CI environment detected, missing credentials fall back to placeholders");
    }
    let settings = Settings::resolve(args, ci).context("invalid configuration")?;
    info!(
        deployment = %settings.deployment,
        endpoint = settings.endpoint.as_deref().unwrap_or("<unset>"),
        "configuration loaded"
    );

    let state = AppState::new(settings);

    if validate_key {
        return check_credentials(&state).await;
    }

    info!("starting server...");

    let app = routes::app(state.clone());

    let addr = state.settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to address: {}", addr))?;

    info!(
        "listening on {}",
        listener
            .local_addr()
            .context("failed to get local address")?
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("failed to start server")?;

    info!("server stopped");
    Ok(())
}

async fn check_credentials(state: &AppState) -> anyhow::Result<()> {
    let client = AzureChatClient::new(
        &state.settings,
        &state.settings.deployment,
        state.client.clone(),
    )
    .context("cannot build completion client")?;
    info!(
        deployment = client.model(),
        api_version = client.params().api_version,
        "validating credentials"
    );

    let (valid, message) = client.validate_credential().await;
    println!("[KEY TEST] {}", message);
    if !valid {
        anyhow::bail!("credential check failed for deployment {}", client.model());
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}

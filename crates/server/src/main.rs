mod api;
mod automation;
mod bootstrap;
mod dispatcher;
mod gateway;
mod health;
mod notify;
mod site;

use anyhow::Result;
use axum::Router;
use paintd_core::{AppConfig, LoadOptions};
use tokio::net::TcpListener;

fn init_logging(config: &AppConfig) {
    use paintd_core::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    // Load config and initialize logging before any other operations
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config);

    let bind = &app.config.server.bind_address;
    let dispatcher = spawn_service(
        "dispatcher",
        bind,
        app.config.server.dispatcher_port,
        dispatcher::router(app.dispatcher.clone()),
    )
    .await?;
    let gateway = spawn_service(
        "gateway",
        bind,
        app.config.server.gateway_port,
        gateway::router(app.gateway.clone(), &app.config.site.asset_dir),
    )
    .await?;
    let site = spawn_service(
        "site",
        bind,
        app.config.server.site_port,
        site::router(app.site.clone(), &app.config.site.asset_dir),
    )
    .await?;
    let _ = (dispatcher, gateway, site);

    tracing::info!(
        event_name = "system.server.started",
        bind_address = %bind,
        dispatcher_port = app.config.server.dispatcher_port,
        gateway_port = app.config.server.gateway_port,
        site_port = app.config.server.site_port,
        "paintd-server started"
    );

    wait_for_shutdown().await?;
    tracing::info!(event_name = "system.server.stopping", "paintd-server stopping");

    Ok(())
}

async fn spawn_service(
    name: &'static str,
    bind_address: &str,
    port: u16,
    router: Router,
) -> Result<tokio::task::JoinHandle<()>> {
    let address = format!("{bind_address}:{port}");
    let listener = TcpListener::bind(&address).await?;

    tracing::info!(
        event_name = "system.service.listening",
        service = name,
        bind_address = %address,
        "service listening"
    );

    Ok(tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router).await {
            tracing::error!(
                event_name = "system.service.error",
                service = name,
                error = %error,
                "service terminated unexpectedly"
            );
        }
    }))
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}

mod backend;
mod charts;
mod config;
mod manual;
mod refresh;
mod render;

use std::{sync::Arc, time::Duration};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::Mutex;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::{
    backend::BackendClient,
    config::Config,
    manual::{CommandSubmitter, ManualForm},
    refresh::RefreshService,
    render::term::{TermChart, TermSurface},
    render::Dashboard,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (ignore error if file absent — env vars may be set externally)
    let _ = dotenvy::dotenv();

    // Initialise tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    // Load config
    let config = Config::from_env()?;
    info!(backend = %config.backend_base_url, "Greenhouse dashboard starting");

    // Shared HTTP client and the owned render state
    let backend = BackendClient::new(&config);
    let dashboard = Arc::new(Mutex::new(Dashboard::new(
        TermChart::new("DHT"),
        TermChart::new("Light"),
        TermSurface::new(),
    )));

    // Spawn the two refresh loops. Both run for the process lifetime; they
    // are never cancelled or restarted.
    let refresh = RefreshService::new(
        backend.clone(),
        Arc::clone(&dashboard),
        Duration::from_secs(config.full_refresh_secs),
        Duration::from_secs(config.relay_refresh_secs),
    );
    tokio::spawn(refresh.clone().run_full_cycles());
    tokio::spawn(refresh.run_relay_cycles());

    // Manual-override prompt on stdin
    let submitter = CommandSubmitter::new(backend, dashboard);

    tokio::select! {
        _ = command_loop(&submitter) => {}
        _ = shutdown_signal() => {}
    }

    Ok(())
}

const USAGE: &str =
    "Manual controls: dht <temp> <hum> | light <lux> | emergency | knob <target> <value>";

/// Reads manual-override commands from stdin and feeds them to the submitter.
/// Field values are passed through raw; the submitter handles numeric parsing
/// and sends unparseable fields as null.
async fn command_loop(submitter: &CommandSubmitter<TermChart, TermSurface>) {
    println!("{USAGE}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Ok(Some(line)) = lines.next_line().await {
        let parts: Vec<&str> = line.split_whitespace().collect();
        match parts.as_slice() {
            [] => {}
            ["dht", rest @ ..] => {
                let form = ManualForm {
                    temp: rest.first().map(|s| s.to_string()),
                    hum: rest.get(1).map(|s| s.to_string()),
                    ..Default::default()
                };
                submitter.send_dht(&form).await;
            }
            ["light", rest @ ..] => {
                let form = ManualForm {
                    lux: rest.first().map(|s| s.to_string()),
                    ..Default::default()
                };
                submitter.send_light(&form).await;
            }
            ["emergency"] => submitter.send_emergency().await,
            ["knob", rest @ ..] => {
                let form = ManualForm {
                    target: rest.first().map(|s| s.to_string()),
                    tval: rest.get(1).map(|s| s.to_string()),
                    ..Default::default()
                };
                submitter.send_knob(&form).await;
            }
            _ => println!("{USAGE}"),
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}

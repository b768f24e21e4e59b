use anyhow::Context;
use clap::Parser;
use market_sync::app::server;
use market_sync::utils::{logger, validation::Validate};
use market_sync::{Cli, SyncApp, SyncError};
use tokio::signal;
use tokio::sync::broadcast;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for SIGINT: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Received SIGINT, shutting down"),
        () = terminate => tracing::info!("Received SIGTERM, shutting down"),
    }
}

/// Startup errors caused by configuration end the process with exit code 1.
fn exit_on_config_error<T>(result: Result<T, SyncError>) -> Result<T, SyncError> {
    match result {
        Err(e) if e.is_config() => {
            tracing::error!("❌ Configuration error: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
        other => other,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; the process environment still applies.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_logger(cli.verbose);
    }

    tracing::info!("Starting market-sync");

    let config = match cli.load_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };
    tracing::debug!("Config: {:?}", config);

    let app = exit_on_config_error(SyncApp::from_config(&config))
        .context("failed to build platform clients")?;

    if let Some(jobs) = cli.once_jobs() {
        let outcomes = app.run_once(&jobs).await;
        let failed: Vec<_> = outcomes
            .iter()
            .filter(|(_, report)| report.is_none())
            .map(|(kind, _)| kind.as_str())
            .collect();

        if !failed.is_empty() {
            eprintln!("❌ Failed jobs: {}", failed.join(", "));
            std::process::exit(2);
        }
        println!("✅ {} job(s) completed", outcomes.len());
        return Ok(());
    }

    let scheduler = exit_on_config_error(app.scheduler(&config.schedule))?;
    let (shutdown_tx, _) = broadcast::channel::<()>(4);

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    tracing::info!("Server running on {}", addr);

    let server_handle = tokio::spawn(server::serve(listener, shutdown_tx.subscribe()));

    let signal_handle = {
        let shutdown = shutdown_tx.clone();
        tokio::spawn(async move {
            shutdown_signal().await;
            let _ = shutdown.send(());
        })
    };

    scheduler.run(&shutdown_tx).await;
    signal_handle.abort();
    let _ = shutdown_tx.send(());

    server_handle
        .await
        .context("server task panicked")?
        .context("server error")?;

    tracing::info!("market-sync stopped");
    Ok(())
}

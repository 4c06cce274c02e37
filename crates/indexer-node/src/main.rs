use std::process::ExitCode;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info, warn};

use indexer_node::config::SHUTDOWN_DEADLINE;
use indexer_node::container::SharedInfra;
use indexer_node::{CatalogConsumer, Config};
use indexer_orchestrator::OrchestratorLoop;
use telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

async fn run() -> Result<(), ExitCode> {
    let config = Config::from_env().map_err(|e| {
        eprintln!("bootstrap failed: {e}");
        ExitCode::FAILURE
    })?;

    let mut telemetry_config = TelemetryConfig::from_env();
    telemetry_config.service_name = "indexer-node".to_string();
    let _telemetry_guard = init_telemetry(telemetry_config).map_err(|e| {
        eprintln!("failed to initialise telemetry: {e}");
        ExitCode::FAILURE
    })?;

    info!(environment = %config.environment, chains = config.chains.len(), "indexer-node starting");

    let infra = SharedInfra::connect(&config).await.map_err(|e| {
        error!(error = %e, "bootstrap failed");
        ExitCode::FAILURE
    })?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut tasks = tokio::task::JoinSet::new();
    let polling_interval = Duration::from_secs(config.polling_interval_seconds);

    for chain in &config.chains {
        let orchestrator = infra.build_orchestrator(chain, polling_interval).map_err(|e| {
            error!(chain_id = %chain.chain_id, error = %e, "bootstrap failed");
            ExitCode::FAILURE
        })?;
        let rx = shutdown_rx.clone();
        let chain_id = chain.chain_id.clone();
        tasks.spawn(async move {
            if let Err(e) = orchestrator.run(rx).await {
                error!(chain_id = %chain_id, error = %e, "orchestrator loop exited with an error");
            }
        });
    }

    let catalog_projector = infra.build_catalog_projector().await.map_err(|e| {
        error!(error = %e, "bootstrap failed");
        ExitCode::FAILURE
    })?;
    let catalog_consumer = CatalogConsumer::connect(&config.rabbitmq_url).await.map_err(|e| {
        error!(error = %e, "bootstrap failed");
        ExitCode::FAILURE
    })?;
    let catalog_shutdown = shutdown_rx.clone();
    tasks.spawn(async move {
        if let Err(e) = catalog_consumer.run(&catalog_projector, catalog_shutdown).await {
            error!(error = %e, "catalog consumer exited with an error");
        }
    });

    let heartbeat_interval = Duration::from_secs(config.heartbeat_interval_seconds);
    let chain_ids: Vec<_> = config.chains.iter().map(|c| c.chain_id.clone()).collect();
    let heartbeat_publisher = infra.publisher.clone();
    let heartbeat_shutdown = shutdown_rx.clone();
    tasks.spawn(async move {
        indexer_node::health::run_heartbeat(heartbeat_publisher, chain_ids, heartbeat_interval, heartbeat_shutdown).await;
    });

    // wallet-link and media-pipeline are request-driven services, not
    // polling loops; they are built here so an embedding API layer has them
    // ready, but this binary spawns no task for them.
    let _wallet_link = infra.build_wallet_link();
    let _media_pipeline = infra
        .build_media_pipeline(&config.media_storage_root, &config.pinning_endpoint)
        .await
        .map_err(|e| {
            error!(error = %e, "bootstrap failed");
            ExitCode::FAILURE
        })?;

    tokio::signal::ctrl_c().await.ok();
    info!("shutdown signal received, stopping supervised tasks");
    let _ = shutdown_tx.send(true);

    let drain = async {
        while tasks.join_next().await.is_some() {}
    };

    match tokio::time::timeout(SHUTDOWN_DEADLINE, drain).await {
        Ok(()) => {
            info!("all tasks stopped cleanly");
            Ok(())
        }
        Err(_) => {
            warn!("shutdown deadline exceeded, forcing exit");
            tasks.shutdown().await;
            Err(ExitCode::FAILURE)
        }
    }
}

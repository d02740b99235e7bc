use lending_dashboard_client::config;
use lending_dashboard_client::history::pipeline::{fetch_position_history, PositionHistory};
use lending_dashboard_client::indexer::client::IndexerClient;
use lending_dashboard_client::logging;
use lending_dashboard_client::positions::DashboardInputs;

use std::fs;
use std::time::Duration;

use dotenvy::dotenv;
use tokio::time::interval;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logging
    if let Err(e) = logging::init_logging(env!("CARGO_BIN_NAME")) {
        eprintln!("Failed to initialize logging: {}", e);
        return Err(e);
    }

    // Load configuration
    let cfg = config::Config::load();
    info!(
        indexer_url = %cfg.indexer_url,
        user = %cfg.user_address,
        "Configuration loaded and logging initialized"
    );

    // Load caller-supplied positions (the wallet/on-chain collaborators' output)
    let inputs = DashboardInputs::load_from_file(&cfg.positions_file)?;
    info!(
        deposit_positions = inputs.deposit_positions.len(),
        loan_positions = inputs.loan_positions.len(),
        collateral_pools = inputs.collateral_info.len(),
        "Dashboard inputs loaded"
    );

    let client = IndexerClient::new(&cfg.indexer_url)?;

    // Last complete result, served stale while a refresh fails
    let mut latest: Option<PositionHistory> = None;

    let mut ticker = interval(Duration::from_secs(cfg.poll_interval_secs));
    info!(
        interval_secs = cfg.poll_interval_secs,
        "Starting dashboard refresh loop"
    );

    loop {
        ticker.tick().await;

        match fetch_position_history(&client, &inputs, &cfg.user_address).await {
            Ok(history) => {
                info!(
                    deposit_points = history.deposits.len(),
                    borrow_points = history.borrows.len(),
                    collateral_points = history.collateral.len(),
                    "Refresh cycle completed"
                );
                if let Some(path) = &cfg.history_out {
                    match serde_json::to_string_pretty(&history) {
                        Ok(json) => {
                            if let Err(e) = fs::write(path, json) {
                                error!(file = %path, ?e, "Failed to write history output");
                            }
                        }
                        Err(e) => error!(?e, "Failed to serialize history output"),
                    }
                }
                latest = Some(history);
            }
            Err(e) => {
                // Keep the previous series on screen; the next tick retries
                warn!(
                    error = %e,
                    has_cached_result = latest.is_some(),
                    "Refresh cycle failed, serving cached series"
                );
            }
        }
    }
}

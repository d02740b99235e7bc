use std::time::Duration;

use reqwest::Client;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use super::query::POSITION_HISTORY_QUERY;
use super::types::GraphqlResponse;
use crate::constants::HTTP_TIMEOUT_SECS;

#[derive(Debug, Error)]
pub enum IndexerError {
    #[error("invalid indexer endpoint: {0}")]
    Endpoint(#[from] url::ParseError),
    #[error("indexer request failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct IndexerClient {
    http_client: Client,
    endpoint: Url,
}

impl IndexerClient {
    pub fn new(endpoint: &str) -> Result<Self, IndexerError> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http_client,
            endpoint: Url::parse(endpoint)?,
        })
    }

    /// Issue the one batched history query. A non-success status fails the
    /// whole refresh; retry is the polling loop's responsibility, not ours.
    #[instrument(skip(self), fields(endpoint = %self.endpoint))]
    pub async fn fetch_history(&self) -> Result<GraphqlResponse, IndexerError> {
        debug!("Fetching pool snapshots and collateral events");

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(&json!({ "query": POSITION_HISTORY_QUERY }))
            .send()
            .await?
            .error_for_status()?;

        let parsed: GraphqlResponse = response.json().await?;
        debug!(
            snapshot_count = parsed.data.pool_snapshots.items.len(),
            supply_event_count = parsed.data.supply_collateral_events.items.len(),
            withdraw_event_count = parsed.data.withdraw_collateral_events.items.len(),
            "Indexer response parsed"
        );
        Ok(parsed)
    }
}

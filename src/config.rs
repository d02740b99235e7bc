use dotenvy::dotenv;
use std::env;

use crate::constants::{DEFAULT_POLL_INTERVAL_SECS, DEFAULT_POSITIONS_FILE};

pub struct Config {
    pub indexer_url: String,
    pub user_address: String,
    pub positions_file: String,
    pub poll_interval_secs: u64,
    pub history_out: Option<String>,
}

impl Config {
    pub fn load() -> Self {
        dotenv().ok();

        let indexer_url = env::var("INDEXER_URL").expect("Missing INDEXER_URL");
        let user_address = env::var("USER_ADDRESS").expect("Missing USER_ADDRESS");

        let positions_file =
            env::var("POSITIONS_FILE").unwrap_or_else(|_| DEFAULT_POSITIONS_FILE.to_string());

        let poll_interval_secs = env::var("POLL_INTERVAL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        // Optional JSON sink for the latest computed series
        let history_out = env::var("HISTORY_OUT").ok();

        Config {
            indexer_url,
            user_address,
            positions_file,
            poll_interval_secs,
            history_out,
        }
    }
}

pub mod amounts;
pub mod config;
pub mod constants;
pub mod history;
pub mod indexer;
pub mod logging;
pub mod positions;

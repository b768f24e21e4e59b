pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::Cli;

pub use adapters::{BackMarketClient, ShopifyClient};
pub use app::SyncApp;
pub use config::SyncConfig;
pub use core::{OverlapPolicy, Scheduler};
pub use utils::error::{Result, SyncError};

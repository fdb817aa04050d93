//! Command implementations for spontyctl CLI

use anyhow::{Context, Result};

use spontyctl_client::SpontyClient;
use spontyctl_core::BackendConfig;

pub mod auth;
pub mod config;
pub mod events;
pub mod friends;
pub mod groups;
pub mod inbox;
pub mod profile;

// Re-export main dispatcher functions for flat access from main.rs
pub use auth::run_auth;
pub use config::run_config;
pub use events::run_events;
pub use friends::run_friends;
pub use groups::run_groups;
pub use inbox::run_inbox;
pub use profile::run_profile;

/// Build the backend client from environment and config file.
pub(crate) fn client() -> Result<SpontyClient> {
    let config = BackendConfig::load().context("backend not configured")?;
    Ok(SpontyClient::new(config))
}

/// Render any serializable value as pretty JSON on stdout.
pub(crate) fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

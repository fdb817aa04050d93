//! Config commands - backend endpoint settings
//!
//! The URL and anon key identify the hosted project; the anon key is
//! public by design but still redacted in `show` output so it does not
//! end up in pasted terminal logs.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use spontyctl_core::BackendConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write backend URL and anon key to the config file
    Init {
        /// Project base URL, e.g. https://abcdefgh.supabase.co
        #[arg(long)]
        url: String,
        /// Public anon key of the project
        #[arg(long)]
        anon_key: String,
    },
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
}

pub fn run_config(args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommand::Init { url, anon_key } => {
            let config = BackendConfig::new(url, anon_key);
            config.save().context("failed to write config file")?;
            println!("Config written to {}", BackendConfig::config_path().display());
        }

        ConfigCommand::Show => {
            let config = BackendConfig::load().context("backend not configured")?;
            println!("url:      {}", config.url);
            println!("anon_key: {}", redact(&config.anon_key));
        }

        ConfigCommand::Path => {
            println!("{}", BackendConfig::config_path().display());
        }
    }

    Ok(())
}

fn redact(key: &str) -> String {
    if key.len() <= 8 {
        return "********".to_string();
    }
    let prefix: String = key.chars().take(8).collect();
    format!("{prefix}...")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_keeps_prefix_only() {
        assert_eq!(redact("eyJhbGciOiJIUzI1NiJ9"), "eyJhbGci...");
        assert_eq!(redact("short"), "********");
    }
}

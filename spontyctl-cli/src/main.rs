//! spontyctl CLI - command-line client for the spontyUP events backend
//!
//! This is the main entry point for the spontyctl command-line tool, which provides:
//! - Account management against the hosted auth endpoint (`auth` subcommand)
//! - Profile display and editing (`profile` subcommand)
//! - Friends, friend search and friend requests (`friends` subcommand)
//! - Friend groups and memberships (`groups` subcommand)
//! - Events: feed, hosting, creation and invitations (`events` subcommand)
//! - Pending invitations and requests (`inbox` subcommand)
//! - Backend endpoint configuration (`config` subcommand)

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "spontyctl",
    author,
    version,
    about = "Command-line client for the spontyUP spontaneous-events backend",
    long_about = "Plan spontaneous events from the terminal: manage friends and friend \
                  groups, create events, send invitations and answer the ones waiting \
                  in your inbox. Talks to the same hosted backend as the mobile app."
)]
struct Cli {
    /// Suppress progress spinners (for script/LLM consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Sign up, sign in/out and inspect the current session
    Auth(commands::auth::AuthArgs),
    /// Show or edit your own profile
    Profile(commands::profile::ProfileArgs),
    /// Friends, friend search and friend requests
    Friends(commands::friends::FriendsArgs),
    /// Friend groups and their members
    Groups(commands::groups::GroupsArgs),
    /// Events: feed, hosting, creation and invitations
    Events(commands::events::EventsArgs),
    /// Pending invitations and friend requests addressed to you
    Inbox(commands::inbox::InboxArgs),
    /// Manage backend endpoint configuration (init, show, path)
    Config(commands::config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

fn init_tracing() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|err| anyhow!(err))
}

/// Load .env from the working directory, then ~/.spontyctl/.env. The
/// first definition of a variable wins, matching dotenvy semantics.
fn load_env() {
    if dotenvy::dotenv().is_ok() {
        debug!("loaded .env from current directory");
    }
    let home_env = spontyctl_core::BackendConfig::config_dir().join(".env");
    if home_env.exists() && dotenvy::from_path(&home_env).is_ok() {
        debug!(path = %home_env.display(), "loaded .env from config directory");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing().ok();
    load_env();
    let cli = Cli::parse();

    // Initialize UI quiet mode from flag, env var, and TTY detection
    ui::init_quiet_mode(cli.quiet);

    match cli.command {
        Commands::Auth(args) => commands::run_auth(args).await?,
        Commands::Profile(args) => commands::run_profile(args).await?,
        Commands::Friends(args) => commands::run_friends(args).await?,
        Commands::Groups(args) => commands::run_groups(args).await?,
        Commands::Events(args) => commands::run_events(args).await?,
        Commands::Inbox(args) => commands::run_inbox(args).await?,
        Commands::Config(args) => commands::run_config(args)?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}

//! Auth commands - account lifecycle against the hosted auth endpoint
//!
//! Signup can optionally complete profile registration in the same run;
//! until a profile is registered the rest of the app treats the account
//! as half-onboarded, and `auth status` says so.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::ui;

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommand {
    /// Create an account; pass --username to register the profile too
    Signup {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SPONTYUP_PASSWORD", hide_env_values = true)]
        password: String,
        /// Username for the profile (completes registration when given)
        #[arg(long)]
        username: Option<String>,
        /// Full display name for the profile
        #[arg(long, default_value = "")]
        full_name: String,
    },
    /// Sign in with email and password
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "SPONTYUP_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Revoke the session and forget it locally
    Logout,
    /// Complete profile registration for a signed-in account
    Register {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        full_name: String,
    },
    /// Show the session and registration state
    Status,
}

pub async fn run_auth(args: AuthArgs) -> Result<()> {
    match args.command {
        AuthCommand::Signup {
            email,
            password,
            username,
            full_name,
        } => {
            let client = super::client()?;
            let session = client
                .sign_up(&email, &password)
                .await
                .context("sign-up failed")?;
            println!("Signed up as {} ({})", email, session.user.id);

            match username {
                Some(username) => {
                    client
                        .register_profile(&username, &full_name)
                        .await
                        .context("profile registration failed")?;
                    println!("Profile registered as @{username}");
                }
                None => {
                    println!(
                        "Complete registration with: spontyctl auth register --username <name>"
                    );
                }
            }
        }

        AuthCommand::Login { email, password } => {
            let client = super::client()?;
            let pb = ui::spinner("Signing in...");
            match client.sign_in(&email, &password).await {
                Ok(session) => {
                    ui::finish_success(pb, format!("Signed in as {email}"));
                    tracing::debug!(user = %session.user.id, "session stored");
                }
                Err(err) => {
                    ui::finish_error(pb, "Sign-in failed");
                    return Err(err).context("sign-in failed");
                }
            }
            if !client.is_registered().await.unwrap_or(true) {
                println!(
                    "Profile not registered yet. Run: spontyctl auth register --username <name>"
                );
            }
        }

        AuthCommand::Logout => {
            let client = super::client()?;
            client.sign_out().await.context("sign-out failed")?;
            println!("Signed out.");
        }

        AuthCommand::Register {
            username,
            full_name,
        } => {
            let client = super::client()?;
            client
                .register_profile(&username, &full_name)
                .await
                .context("profile registration failed")?;
            println!("Profile registered as @{username}");
        }

        AuthCommand::Status => {
            let client = super::client()?;
            match client.current_user() {
                None => println!("Not signed in."),
                Some(user) => {
                    println!(
                        "Signed in as {} ({})",
                        user.email.as_deref().unwrap_or("<no email>"),
                        user.id
                    );
                    match client.current_profile().await {
                        Ok(profile) if profile.registered => {
                            println!("Profile: @{} ({})", profile.username, profile.display_name());
                        }
                        Ok(_) => {
                            println!("Profile registration incomplete.");
                            println!("Run: spontyctl auth register --username <name>");
                        }
                        Err(err) => println!("Could not load profile: {err}"),
                    }
                }
            }
        }
    }

    Ok(())
}

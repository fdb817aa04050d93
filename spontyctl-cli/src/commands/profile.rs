//! Profile commands - the signed-in user's own card

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use spontyctl_core::models::Profile;

#[derive(Parser, Debug)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Show your profile with friend and group counts
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update username and full name
    Update {
        #[arg(long)]
        username: String,
        #[arg(long, default_value = "")]
        full_name: String,
    },
}

/// Profile card shape: what the app shows on the profile screen.
#[derive(Debug, Serialize)]
struct ProfileCard {
    profile: Profile,
    friends: usize,
    groups: usize,
}

pub async fn run_profile(args: ProfileArgs) -> Result<()> {
    match args.command {
        ProfileCommand::Show { json } => {
            let client = super::client()?;
            let profile = client.current_profile().await.context("failed to load profile")?;
            let friends = client.friendships().await.context("failed to load friends")?;
            let groups = client.groups().await.context("failed to load groups")?;

            let card = ProfileCard {
                profile,
                friends: friends.len(),
                groups: groups.len(),
            };

            if json {
                super::print_json(&card)?;
            } else {
                println!("@{} ({})", card.profile.username, card.profile.display_name());
                if !card.profile.registered {
                    println!("  registration incomplete");
                }
                println!("  friends: {}", card.friends);
                println!("  groups:  {}", card.groups);
            }
        }

        ProfileCommand::Update {
            username,
            full_name,
        } => {
            let client = super::client()?;
            client
                .update_profile(&username, &full_name)
                .await
                .context("failed to update profile")?;
            println!("Profile updated: @{username}");
        }
    }

    Ok(())
}

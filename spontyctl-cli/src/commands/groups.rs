//! Groups commands - friend groups and their memberships
//!
//! Members are always addressed by the friend's user id on the command
//! line; the friendship id the member rows need is resolved from the
//! friends list, so only actual friends can be added.

use std::collections::{HashMap, HashSet};

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use spontyctl_client::SpontyClient;
use spontyctl_core::models::NewGroupMember;

#[derive(Parser, Debug)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Subcommand, Debug)]
pub enum GroupsCommand {
    /// List your groups
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a group, optionally with initial members
    Create {
        name: String,
        /// Friend user id to add (repeatable)
        #[arg(long = "member", value_name = "USER_ID")]
        members: Vec<Uuid>,
    },
    /// Show a group and its members
    Show {
        group_id: Uuid,
        #[arg(long)]
        json: bool,
    },
    /// Add friends to a group (friends already in it are skipped)
    Add {
        group_id: Uuid,
        /// Friend user id to add (repeatable)
        #[arg(long = "member", value_name = "USER_ID", required = true)]
        members: Vec<Uuid>,
    },
    /// List your groups that contain a given friend
    OfFriend {
        /// The friend's user id
        user_id: Uuid,
        #[arg(long)]
        json: bool,
    },
}

pub async fn run_groups(args: GroupsArgs) -> Result<()> {
    match args.command {
        GroupsCommand::List { json } => {
            let client = super::client()?;
            let groups = client.groups().await.context("failed to load groups")?;
            if json {
                super::print_json(&groups)?;
            } else if groups.is_empty() {
                println!("No groups yet. Try: spontyctl groups create <name>");
            } else {
                for group in &groups {
                    println!("{:<24} {}", group.name, group.id);
                }
            }
        }

        GroupsCommand::Create { name, members } => {
            let client = super::client()?;
            let group = client
                .create_group(&name)
                .await
                .context("failed to create group")?;
            println!("Created group '{}' ({})", group.name, group.id);

            if !members.is_empty() {
                let rows = member_rows(&client, group.id, &members, &HashSet::new()).await?;
                client
                    .add_group_members(&rows)
                    .await
                    .context("failed to add members")?;
                println!("Added {} member(s).", rows.len());
            }
        }

        GroupsCommand::Show { group_id, json } => {
            let client = super::client()?;
            let members = client
                .members_with_profiles(group_id)
                .await
                .context("failed to load group members")?;
            if json {
                super::print_json(&members)?;
            } else if members.is_empty() {
                println!("Group has no members.");
            } else {
                for member in &members {
                    println!(
                        "@{:<20} {}  ({})",
                        member.profile.username,
                        member.profile.display_name(),
                        member.profile.id
                    );
                }
            }
        }

        GroupsCommand::Add { group_id, members } => {
            let client = super::client()?;
            let existing: HashSet<Uuid> = client
                .group_members(group_id)
                .await
                .context("failed to load group members")?
                .into_iter()
                .map(|m| m.friend_id)
                .collect();

            let rows = member_rows(&client, group_id, &members, &existing).await?;
            if rows.is_empty() {
                println!("All of those friends are already in the group.");
            } else {
                let count = rows.len();
                client
                    .add_group_members(&rows)
                    .await
                    .context("failed to add members")?;
                println!("Added {count} member(s).");
            }
        }

        GroupsCommand::OfFriend { user_id, json } => {
            let client = super::client()?;
            let groups = client
                .groups_containing_friend(user_id)
                .await
                .context("failed to load groups")?;
            if json {
                super::print_json(&groups)?;
            } else if groups.is_empty() {
                println!("That friend is not in any of your groups.");
            } else {
                for group in &groups {
                    println!("{:<24} {}", group.name, group.id);
                }
            }
        }
    }

    Ok(())
}

/// Resolve friend user ids into member rows, skipping ids already in
/// the group. Ids that are not friends are an error, not a silent skip.
async fn member_rows(
    client: &SpontyClient,
    group_id: Uuid,
    member_ids: &[Uuid],
    existing: &HashSet<Uuid>,
) -> Result<Vec<NewGroupMember>> {
    let friends = client
        .friends_with_profiles()
        .await
        .context("failed to load friends")?;
    let by_id: HashMap<Uuid, Uuid> = friends
        .iter()
        .map(|f| (f.friendship.friend_id, f.friendship.friendship_id))
        .collect();

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    for &friend_id in member_ids {
        if existing.contains(&friend_id) || !seen.insert(friend_id) {
            continue;
        }
        let friendship_id = *by_id
            .get(&friend_id)
            .ok_or_else(|| anyhow!("{friend_id} is not in your friends list"))?;
        rows.push(NewGroupMember {
            group_id,
            friend_id,
            friendship_id,
        });
    }
    Ok(rows)
}

//! Friends commands - listing, search and friend requests

use std::collections::HashSet;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use spontyctl_client::SpontyClient;
use spontyctl_core::models::{FriendGroup, FriendRequestStatus};

#[derive(Parser, Debug)]
pub struct FriendsArgs {
    #[command(subcommand)]
    pub command: FriendsCommand,
}

#[derive(Subcommand, Debug)]
pub enum FriendsCommand {
    /// List your friends
    List {
        /// Restrict to members of one of your groups
        #[arg(long, value_name = "GROUP_ID")]
        group: Option<Uuid>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one friend and the groups of yours they belong to
    Show {
        /// The friend's user id
        user_id: Uuid,
        #[arg(long)]
        json: bool,
    },
    /// Search users by username prefix
    Search {
        prefix: String,
        #[arg(long)]
        json: bool,
    },
    /// Send a friend request
    Request {
        /// The receiver's user id
        user_id: Uuid,
    },
    /// List received friend requests (pending only unless --all)
    Requests {
        #[arg(long)]
        all: bool,
        #[arg(long)]
        json: bool,
    },
    /// List users you have sent requests to
    Sent {
        #[arg(long)]
        json: bool,
    },
    /// Accept a received friend request
    Accept {
        request_id: Uuid,
    },
    /// Decline a received friend request
    Decline {
        request_id: Uuid,
    },
}

pub async fn run_friends(args: FriendsArgs) -> Result<()> {
    match args.command {
        FriendsCommand::List { group, json } => {
            let client = super::client()?;
            let friends = match group {
                Some(group_id) => {
                    let group = resolve_group(&client, group_id).await?;
                    client
                        .friends_in_group(&group)
                        .await
                        .context("failed to load friends")?
                }
                None => client
                    .friends_with_profiles()
                    .await
                    .context("failed to load friends")?,
            };
            if json {
                super::print_json(&friends)?;
            } else if friends.is_empty() && group.is_some() {
                println!("That group has no members.");
            } else if friends.is_empty() {
                println!("No friends yet. Try: spontyctl friends search <prefix>");
            } else {
                for friend in &friends {
                    println!(
                        "@{:<20} {}  ({})",
                        friend.profile.username,
                        friend.profile.display_name(),
                        friend.profile.id
                    );
                }
            }
        }

        FriendsCommand::Show { user_id, json } => {
            let client = super::client()?;
            let friend = client
                .friend_with_profile(user_id)
                .await
                .context("failed to load friend")?;
            let groups = client
                .groups_containing_friend(user_id)
                .await
                .context("failed to load groups")?;

            if json {
                #[derive(serde::Serialize)]
                struct FriendDetail<'a> {
                    friend: &'a spontyctl_core::FriendProfile,
                    groups: &'a [spontyctl_core::FriendGroup],
                }
                super::print_json(&FriendDetail {
                    friend: &friend,
                    groups: &groups,
                })?;
            } else {
                println!(
                    "@{} ({})",
                    friend.profile.username,
                    friend.profile.display_name()
                );
                if groups.is_empty() {
                    println!("  not in any of your groups");
                } else {
                    println!("  in your groups:");
                    for group in &groups {
                        println!("    {}  ({})", group.name, group.id);
                    }
                }
            }
        }

        FriendsCommand::Search { prefix, json } => {
            let client = super::client()?;
            let results = client
                .search_profiles(&prefix)
                .await
                .context("search failed")?;

            if json {
                super::print_json(&results)?;
            } else if results.is_empty() {
                println!("No users matching '{prefix}'.");
            } else {
                let requested: HashSet<Uuid> = client
                    .sent_request_profiles()
                    .await
                    .context("failed to load sent requests")?
                    .into_iter()
                    .map(|p| p.id)
                    .collect();
                for profile in &results {
                    let marker = if requested.contains(&profile.id) {
                        "  (request sent)"
                    } else {
                        ""
                    };
                    println!("@{:<20} {}{}", profile.username, profile.id, marker);
                }
            }
        }

        FriendsCommand::Request { user_id } => {
            let client = super::client()?;
            client
                .send_friend_request(user_id)
                .await
                .context("failed to send friend request")?;
            println!("Friend request sent.");
        }

        FriendsCommand::Requests { all, json } => {
            let client = super::client()?;
            let requests = if all {
                client.requests_with_profiles().await
            } else {
                client.pending_requests_with_profiles().await
            }
            .context("failed to load friend requests")?;

            if json {
                super::print_json(&requests)?;
            } else if requests.is_empty() {
                println!("No friend requests.");
            } else {
                for entry in &requests {
                    println!(
                        "{}  @{:<20} {}",
                        entry.request.id, entry.profile.username, entry.request.status
                    );
                }
            }
        }

        FriendsCommand::Sent { json } => {
            let client = super::client()?;
            let profiles = client
                .sent_request_profiles()
                .await
                .context("failed to load sent requests")?;
            if json {
                super::print_json(&profiles)?;
            } else if profiles.is_empty() {
                println!("No outgoing friend requests.");
            } else {
                for profile in &profiles {
                    println!("@{:<20} {}", profile.username, profile.id);
                }
            }
        }

        FriendsCommand::Accept { request_id } => {
            respond(&super::client()?, request_id, FriendRequestStatus::Accepted).await?;
            println!("Friend request accepted.");
        }

        FriendsCommand::Decline { request_id } => {
            respond(&super::client()?, request_id, FriendRequestStatus::Declined).await?;
            println!("Friend request declined.");
        }
    }

    Ok(())
}

/// Look an owned group up by id. Ids of other people's groups read as
/// nonexistent, matching what the backend would let us see anyway.
async fn resolve_group(client: &SpontyClient, group_id: Uuid) -> Result<FriendGroup> {
    let owned = client.groups().await.context("failed to load groups")?;
    owned
        .into_iter()
        .find(|g| g.id == group_id)
        .ok_or_else(|| anyhow!("{group_id} is not one of your groups"))
}

async fn respond(
    client: &SpontyClient,
    request_id: Uuid,
    status: FriendRequestStatus,
) -> Result<()> {
    let requests = client
        .friend_requests()
        .await
        .context("failed to load friend requests")?;
    let request = requests
        .into_iter()
        .find(|r| r.id == request_id)
        .ok_or_else(|| anyhow!("no received friend request with id {request_id}"))?;
    client
        .respond_friend_request(&request, status)
        .await
        .context("failed to answer friend request")?;
    Ok(())
}

//! Inbox commands - answer what is waiting for you
//!
//! The inbox is the union of pending event invitations and pending
//! friend requests, the two things that need an answer. Invitations
//! are answered per event; friend requests are answered under
//! `spontyctl friends accept/decline`.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use spontyctl_client::SpontyClient;
use spontyctl_core::models::InvitationStatus;

#[derive(Parser, Debug)]
pub struct InboxArgs {
    #[command(subcommand)]
    pub command: InboxCommand,
}

#[derive(Subcommand, Debug)]
pub enum InboxCommand {
    /// List pending invitations and friend requests
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Accept an invitation to an event
    Accept {
        event_id: Uuid,
    },
    /// Decline an invitation to an event
    Decline {
        event_id: Uuid,
    },
    /// Answer tentatively to an invitation
    Maybe {
        event_id: Uuid,
    },
}

pub async fn run_inbox(args: InboxArgs) -> Result<()> {
    match args.command {
        InboxCommand::List { json } => {
            let client = super::client()?;
            let events = client
                .inbox_events_with_invitations()
                .await
                .context("failed to load inbox")?;
            let requests = client
                .pending_requests_with_profiles()
                .await
                .context("failed to load friend requests")?;

            if json {
                #[derive(serde::Serialize)]
                struct Inbox<'a> {
                    invitations: &'a [spontyctl_core::EventWithInvitations],
                    friend_requests: &'a [spontyctl_core::RequestProfile],
                }
                super::print_json(&Inbox {
                    invitations: &events,
                    friend_requests: &requests,
                })?;
                return Ok(());
            }

            if events.is_empty() && requests.is_empty() {
                println!("Inbox is empty.");
                return Ok(());
            }

            if !events.is_empty() {
                println!("Invitations:");
                for entry in &events {
                    println!(
                        "  {}  {}  {}  ({})",
                        entry.event.event_date.format("%Y-%m-%d %H:%M"),
                        entry.event.title,
                        entry.event.location,
                        entry.event.id
                    );
                }
                println!("  Answer with: spontyctl inbox accept|decline|maybe <event-id>");
            }

            if !requests.is_empty() {
                println!("Friend requests:");
                for entry in &requests {
                    println!(
                        "  {}  @{} ({})",
                        entry.request.id,
                        entry.profile.username,
                        entry.profile.display_name()
                    );
                }
                println!("  Answer with: spontyctl friends accept|decline <request-id>");
            }
        }

        InboxCommand::Accept { event_id } => {
            respond(&super::client()?, event_id, InvitationStatus::Accepted).await?;
            println!("Invitation accepted.");
        }

        InboxCommand::Decline { event_id } => {
            respond(&super::client()?, event_id, InvitationStatus::Declined).await?;
            println!("Invitation declined.");
        }

        InboxCommand::Maybe { event_id } => {
            respond(&super::client()?, event_id, InvitationStatus::Tentative).await?;
            println!("Marked as tentative.");
        }
    }

    Ok(())
}

async fn respond(client: &SpontyClient, event_id: Uuid, status: InvitationStatus) -> Result<()> {
    let event = client.event(event_id).await.context("failed to load event")?;
    client
        .respond_invitation(&event, status)
        .await
        .context("failed to answer invitation")?;
    Ok(())
}

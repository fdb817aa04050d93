//! Events commands - feed, hosting, creation and invitations
//!
//! Inviting works on user ids: `--friend` adds one friend, `--group`
//! adds every member of one of your groups. The receiver set is
//! de-duplicated and anyone already invited (and the host) is skipped,
//! so repeating an invite never creates duplicate invitations. Run
//! without flags, `invite` just lists the guests you already invited.

use std::collections::HashSet;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, NaiveDateTime, Utc};
use clap::{Parser, Subcommand};
use uuid::Uuid;

use spontyctl_client::SpontyClient;
use spontyctl_core::models::{EventStatus, EventUpdate, EventWithInvitations, FriendGroup};
use spontyctl_core::views;

use crate::ui;

#[derive(Parser, Debug)]
pub struct EventsArgs {
    #[command(subcommand)]
    pub command: EventsCommand,
}

#[derive(Subcommand, Debug)]
pub enum EventsCommand {
    /// Upcoming feed: events you host or are invited to
    Feed {
        /// Filter by title substring (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Events you host
    Hosted {
        #[arg(long)]
        json: bool,
    },
    /// Your hosted events still in draft
    Drafts {
        /// Filter by title substring (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        json: bool,
    },
    /// Event details: guest lists by answer and your role
    Show {
        event_id: Uuid,
        /// Only count guests you invited yourself
        #[arg(long)]
        sent: bool,
        #[arg(long)]
        json: bool,
    },
    /// Create an event and invite friends and groups
    Create {
        #[arg(long)]
        title: String,
        /// Date and time, RFC 3339 or "YYYY-MM-DD HH:MM" (UTC)
        #[arg(long)]
        date: String,
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "")]
        description: String,
        /// Make the event visible to friends of invited friends
        #[arg(long)]
        open_circle: bool,
        /// Friend user id to invite (repeatable)
        #[arg(long = "friend", value_name = "USER_ID")]
        friends: Vec<Uuid>,
        /// Group id whose members to invite (repeatable)
        #[arg(long = "group", value_name = "GROUP_ID")]
        groups: Vec<Uuid>,
    },
    /// Edit title, date, location or description
    Update {
        event_id: Uuid,
        #[arg(long)]
        title: Option<String>,
        /// Date and time, RFC 3339 or "YYYY-MM-DD HH:MM" (UTC)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Cancel an event you host (guests keep seeing it as cancelled)
    Cancel {
        event_id: Uuid,
    },
    /// Invite more guests; with no flags, list who you already invited
    Invite {
        event_id: Uuid,
        /// Friend user id to invite (repeatable)
        #[arg(long = "friend", value_name = "USER_ID")]
        friends: Vec<Uuid>,
        /// Group id whose members to invite (repeatable)
        #[arg(long = "group", value_name = "GROUP_ID")]
        groups: Vec<Uuid>,
    },
    /// Events you have been invited to
    Invited {
        #[arg(long)]
        json: bool,
    },
}

pub async fn run_events(args: EventsArgs) -> Result<()> {
    match args.command {
        EventsCommand::Feed { search, json } => {
            let client = super::client()?;
            let pb = ui::spinner("Loading feed...");
            let events = match client.feed_events_with_invitations().await {
                Ok(events) => {
                    ui::finish_success(pb, "Feed loaded");
                    events
                }
                Err(err) => {
                    ui::finish_error(pb, "Failed to load feed");
                    return Err(err).context("failed to load feed");
                }
            };
            let feed = views::feed(events, Utc::now(), search.as_deref());
            render_event_list(&feed, json, "Nothing on the feed.")?;
        }

        EventsCommand::Hosted { json } => {
            let client = super::client()?;
            let hosted = client
                .hosted_events_with_invitations()
                .await
                .context("failed to load hosted events")?;
            render_event_list(&hosted, json, "You are not hosting any events.")?;
        }

        EventsCommand::Drafts { search, json } => {
            let client = super::client()?;
            let hosted = client
                .hosted_events_with_invitations()
                .await
                .context("failed to load hosted events")?;
            let drafts = views::drafts(hosted, search.as_deref());
            render_event_list(&drafts, json, "No drafts.")?;
        }

        EventsCommand::Show {
            event_id,
            sent,
            json,
        } => {
            let client = super::client()?;
            let mut details = client
                .event_with_invitations(event_id)
                .await
                .context("failed to load event")?;
            if sent {
                details.invitations = client
                    .event_invitations_sent_by_me(event_id)
                    .await
                    .context("failed to load sent invitations")?;
            }
            let profiles = client
                .invitation_receiver_profiles(&details.invitations)
                .await
                .context("failed to load guest profiles")?;
            let guests = views::partition_guests(&details.invitations, profiles);

            if json {
                #[derive(serde::Serialize)]
                struct EventDetail<'a> {
                    #[serde(flatten)]
                    details: &'a EventWithInvitations,
                    guests: &'a views::GuestLists,
                }
                super::print_json(&EventDetail {
                    details: &details,
                    guests: &guests,
                })?;
            } else {
                render_event_line(&details);
                if !details.event.description.is_empty() {
                    println!("  {}", details.event.description);
                }
                render_guests("going", &guests.going);
                render_guests("tentative", &guests.tentative);
                render_guests("pending", &guests.pending);
                render_guests("declined", &guests.declined);
                if guests.is_empty() && sent {
                    println!("  no invitations sent by you yet");
                } else if guests.is_empty() {
                    println!("  no invitations yet");
                }
            }
        }

        EventsCommand::Create {
            title,
            date,
            location,
            description,
            open_circle,
            friends,
            groups,
        } => {
            let client = super::client()?;
            let event_date = parse_event_date(&date)?;
            let event = client
                .create_event(&title, event_date, &location, &description, open_circle)
                .await
                .context("failed to create event")?;
            println!("Created '{}' ({})", event.title, event.id);

            let receivers = assemble_receivers(
                &client,
                &friends,
                &groups,
                &HashSet::new(),
                event.user_id,
            )
            .await?;
            if receivers.is_empty() {
                println!(
                    "No invitations sent yet. Add guests with: spontyctl events invite {}",
                    event.id
                );
            } else {
                client
                    .invite(event.id, &receivers)
                    .await
                    .context("failed to send invitations")?;
                println!("Invited {} guest(s).", receivers.len());
            }
        }

        EventsCommand::Update {
            event_id,
            title,
            date,
            location,
            description,
        } => {
            let client = super::client()?;
            let current = client.event(event_id).await.context("failed to load event")?;
            let event_date = match date {
                Some(raw) => parse_event_date(&raw)?,
                None => current.event_date,
            };
            let changes = EventUpdate {
                title: title.unwrap_or(current.title),
                description: description.unwrap_or(current.description),
                event_date,
                location: location.unwrap_or(current.location),
            };
            client
                .update_event(event_id, &changes)
                .await
                .context("failed to update event")?;
            println!("Event updated.");
        }

        EventsCommand::Cancel { event_id } => {
            let client = super::client()?;
            client
                .cancel_event(event_id)
                .await
                .context("failed to cancel event")?;
            println!("Event cancelled.");
        }

        EventsCommand::Invite {
            event_id,
            friends,
            groups,
        } => {
            let client = super::client()?;
            if friends.is_empty() && groups.is_empty() {
                let invited = client
                    .friends_invited_to(event_id)
                    .await
                    .context("failed to load invited friends")?;
                if invited.is_empty() {
                    println!("You have not invited anyone yet.");
                } else {
                    println!("Already invited by you:");
                    for friend in &invited {
                        println!(
                            "  @{} ({})",
                            friend.profile.username,
                            friend.profile.display_name()
                        );
                    }
                }
                println!("Add guests with --friend <USER_ID> or --group <GROUP_ID>.");
                return Ok(());
            }

            let details = client
                .event_with_invitations(event_id)
                .await
                .context("failed to load event")?;
            let already: HashSet<Uuid> = details
                .invitations
                .iter()
                .map(|i| i.receiver_id)
                .collect();

            let receivers =
                assemble_receivers(&client, &friends, &groups, &already, details.event.user_id)
                    .await?;
            if receivers.is_empty() {
                println!("Everyone selected is already invited.");
            } else {
                client
                    .invite(event_id, &receivers)
                    .await
                    .context("failed to send invitations")?;
                println!("Invited {} guest(s).", receivers.len());
            }
        }

        EventsCommand::Invited { json } => {
            let client = super::client()?;
            let events = client
                .invited_events()
                .await
                .context("failed to load invited events")?;
            if json {
                super::print_json(&events)?;
            } else if events.is_empty() {
                println!("No invitations.");
            } else {
                for event in &events {
                    println!(
                        "{}  {}  {}  ({})",
                        event.event_date.format("%Y-%m-%d %H:%M"),
                        event.title,
                        event.location,
                        event.id
                    );
                }
            }
        }
    }

    Ok(())
}

/// Union of explicit friends and group members, minus exclusions. Group
/// ids must name groups the signed-in user owns.
async fn assemble_receivers(
    client: &SpontyClient,
    friend_ids: &[Uuid],
    group_ids: &[Uuid],
    already_invited: &HashSet<Uuid>,
    host: Uuid,
) -> Result<Vec<Uuid>> {
    let member_ids = if group_ids.is_empty() {
        Vec::new()
    } else {
        let groups = resolve_groups(client, group_ids).await?;
        client
            .members_of_groups(&groups)
            .await
            .context("failed to load group members")?
            .into_iter()
            .map(|m| m.member.friend_id)
            .collect()
    };

    Ok(views::invitation_receivers(
        friend_ids.iter().copied(),
        member_ids,
        already_invited,
        host,
    ))
}

async fn resolve_groups(client: &SpontyClient, group_ids: &[Uuid]) -> Result<Vec<FriendGroup>> {
    let owned = client.groups().await.context("failed to load groups")?;
    group_ids
        .iter()
        .map(|id| {
            owned
                .iter()
                .find(|g| g.id == *id)
                .cloned()
                .ok_or_else(|| anyhow!("{id} is not one of your groups"))
        })
        .collect()
}

fn render_event_list(events: &[EventWithInvitations], json: bool, empty: &str) -> Result<()> {
    if json {
        super::print_json(&events)?;
    } else if events.is_empty() {
        println!("{empty}");
    } else {
        for entry in events {
            render_event_line(entry);
        }
    }
    Ok(())
}

fn render_event_line(entry: &EventWithInvitations) {
    let status = match entry.event.status {
        EventStatus::Published => String::new(),
        other => format!("  [{other}]"),
    };
    let role = if entry.viewer_is_host { "hosting" } else { "invited" };
    println!(
        "{}  {}  {}  {} guest(s), {}{}  ({})",
        entry.event.event_date.format("%Y-%m-%d %H:%M"),
        entry.event.title,
        entry.event.location,
        entry.invitations.len(),
        role,
        status,
        entry.event.id
    );
}

fn render_guests(label: &str, profiles: &[spontyctl_core::Profile]) {
    if profiles.is_empty() {
        return;
    }
    println!("  {label}:");
    for profile in profiles {
        println!("    @{} ({})", profile.username, profile.display_name());
    }
}

/// Accepts RFC 3339 or a terminal-friendly "YYYY-MM-DD HH:MM" (UTC).
fn parse_event_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
        .map_err(|_| anyhow!("unrecognized date '{raw}' (use RFC 3339 or \"YYYY-MM-DD HH:MM\")"))?;
    Ok(naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_parse_event_date_rfc3339() {
        let dt = parse_event_date("2025-06-14T18:30:00+02:00").unwrap();
        assert_eq!(dt.hour(), 16);
    }

    #[test]
    fn test_parse_event_date_simple_format() {
        let dt = parse_event_date("2025-06-14 18:30").unwrap();
        assert_eq!(dt.to_rfc3339(), "2025-06-14T18:30:00+00:00");

        let with_t = parse_event_date("2025-06-14T18:30").unwrap();
        assert_eq!(with_t, dt);
    }

    #[test]
    fn test_parse_event_date_rejects_garbage() {
        let err = parse_event_date("next friday").unwrap_err();
        assert!(err.to_string().contains("next friday"));
    }
}

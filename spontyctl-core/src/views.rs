//! Pure list shaping shared by every frontend surface.
//!
//! Everything here is deterministic over its inputs; fetching stays in
//! the client crate so these functions can be tested without a backend.

use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{EventStatus, EventWithInvitations, Invitation, InvitationStatus, Profile};

/// Hours past its start time an event stays visible on the feed.
pub const FEED_GRACE_HOURS: i64 = 24;

fn title_matches(title: &str, search: Option<&str>) -> bool {
    match search {
        None => true,
        Some(needle) => title.to_lowercase().contains(&needle.to_lowercase()),
    }
}

/// Feed ordering: drop events older than the grace window, apply the
/// optional case-insensitive title search, sort soonest first.
pub fn feed(
    mut events: Vec<EventWithInvitations>,
    now: DateTime<Utc>,
    search: Option<&str>,
) -> Vec<EventWithInvitations> {
    let cutoff = now - Duration::hours(FEED_GRACE_HOURS);
    events.retain(|e| e.event.event_date >= cutoff && title_matches(&e.event.title, search));
    events.sort_by_key(|e| e.event.event_date);
    events
}

/// Hosted events still in draft, with the same optional title search.
pub fn drafts(
    mut hosted: Vec<EventWithInvitations>,
    search: Option<&str>,
) -> Vec<EventWithInvitations> {
    hosted.retain(|e| {
        e.viewer_is_host
            && e.event.status == EventStatus::Draft
            && title_matches(&e.event.title, search)
    });
    hosted
}

/// Guests of one event, partitioned by their invitation answer.
/// Profiles without an invitation row are not listed anywhere.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GuestLists {
    pub going: Vec<Profile>,
    pub pending: Vec<Profile>,
    pub declined: Vec<Profile>,
    pub tentative: Vec<Profile>,
}

impl GuestLists {
    pub fn is_empty(&self) -> bool {
        self.going.is_empty()
            && self.pending.is_empty()
            && self.declined.is_empty()
            && self.tentative.is_empty()
    }
}

pub fn partition_guests(invitations: &[Invitation], profiles: Vec<Profile>) -> GuestLists {
    let status_by_receiver: HashMap<Uuid, InvitationStatus> = invitations
        .iter()
        .map(|i| (i.receiver_id, i.status))
        .collect();

    let mut lists = GuestLists::default();
    for profile in profiles {
        match status_by_receiver.get(&profile.id) {
            Some(InvitationStatus::Accepted) => lists.going.push(profile),
            Some(InvitationStatus::Pending) => lists.pending.push(profile),
            Some(InvitationStatus::Declined) => lists.declined.push(profile),
            Some(InvitationStatus::Tentative) => lists.tentative.push(profile),
            None => {}
        }
    }
    lists
}

/// Receivers for a new invitation batch: the selected friends plus all
/// members of the selected groups, de-duplicated, minus anyone already
/// invited and minus the host. Sorted so the insert order is stable.
pub fn invitation_receivers(
    friend_ids: impl IntoIterator<Item = Uuid>,
    group_member_ids: impl IntoIterator<Item = Uuid>,
    already_invited: &HashSet<Uuid>,
    host: Uuid,
) -> Vec<Uuid> {
    let mut receivers: BTreeSet<Uuid> = friend_ids
        .into_iter()
        .chain(group_member_ids)
        .collect();
    receivers.remove(&host);
    receivers
        .into_iter()
        .filter(|id| !already_invited.contains(id))
        .collect()
}

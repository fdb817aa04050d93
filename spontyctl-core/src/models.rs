//! Record types for the spontyUP backend.
//!
//! Field names match the hosted schema column names exactly, so every
//! struct deserializes straight from PostgREST JSON without rename
//! attributes. Status enums are stored capitalized ("Pending", not
//! "pending") and serde's default unit-variant encoding matches that.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SpontyError;

/// A user profile row. `registered` stays false until onboarding
/// completes, which gates the rest of the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: Uuid,
    pub username: String,
    pub full_name: Option<String>,
    pub registered: bool,
}

impl Profile {
    /// Display name, falling back to the username when no full name is set.
    pub fn display_name(&self) -> &str {
        match self.full_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.username,
        }
    }
}

/// One direction of a friendship, read from the `friendships_view`
/// database view. The view emits a row per (user, friend) direction;
/// `friendship_id` identifies the underlying relation row and is shared
/// by both directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Friendship {
    pub user_id: Uuid,
    pub friend_id: Uuid,
    pub friend_username: String,
    pub friendship_id: Uuid,
}

/// Lifecycle of an event. Cancelling and deleting are soft: the row
/// stays and only the status changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventStatus {
    Draft,
    Published,
    Cancelled,
    Deleted,
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EventStatus::Draft => "Draft",
            EventStatus::Published => "Published",
            EventStatus::Cancelled => "Cancelled",
            EventStatus::Deleted => "Deleted",
        };
        write!(f, "{label}")
    }
}

impl FromStr for EventStatus {
    type Err = SpontyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(EventStatus::Draft),
            "published" => Ok(EventStatus::Published),
            "cancelled" => Ok(EventStatus::Cancelled),
            "deleted" => Ok(EventStatus::Deleted),
            _ => Err(SpontyError::invalid_status("event status", s)),
        }
    }
}

/// An event row from the `events` table. `user_id` is the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub status: EventStatus,
    pub location: String,
    pub description: String,
    pub is_open_circle: bool,
}

impl Event {
    pub fn is_hosted_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// Answer state of an event invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Declined,
    Tentative,
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            InvitationStatus::Pending => "Pending",
            InvitationStatus::Accepted => "Accepted",
            InvitationStatus::Declined => "Declined",
            InvitationStatus::Tentative => "Tentative",
        };
        write!(f, "{label}")
    }
}

impl FromStr for InvitationStatus {
    type Err = SpontyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(InvitationStatus::Pending),
            "accepted" => Ok(InvitationStatus::Accepted),
            "declined" => Ok(InvitationStatus::Declined),
            "tentative" => Ok(InvitationStatus::Tentative),
            _ => Err(SpontyError::invalid_status("invitation status", s)),
        }
    }
}

/// An invitation row. The sender invited the receiver to the event;
/// the receiver owns the status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invitation {
    pub id: Uuid,
    pub event_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: InvitationStatus,
}

/// Answer state of a friend request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FriendRequestStatus {
    Pending,
    Accepted,
    Declined,
}

impl fmt::Display for FriendRequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FriendRequestStatus::Pending => "Pending",
            FriendRequestStatus::Accepted => "Accepted",
            FriendRequestStatus::Declined => "Declined",
        };
        write!(f, "{label}")
    }
}

impl FromStr for FriendRequestStatus {
    type Err = SpontyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pending" => Ok(FriendRequestStatus::Pending),
            "accepted" => Ok(FriendRequestStatus::Accepted),
            "declined" => Ok(FriendRequestStatus::Declined),
            _ => Err(SpontyError::invalid_status("friend request status", s)),
        }
    }
}

/// A friend request row. Accepting one creates the friendship
/// server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendRequest {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendRequestStatus,
}

/// A named friend group, from the `groups` table. `user_id` is the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FriendGroup {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
}

/// Membership of one friend in one group. Carries both the friend's
/// profile id and the friendship row id so either side can be joined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupMember {
    pub id: Uuid,
    pub group_id: Uuid,
    pub friend_id: Uuid,
    pub friendship_id: Uuid,
}

// ---------------------------------------------------------------------------
// Write payloads. Each serializes exactly the columns it sets; the
// database fills ids and defaults.

#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub full_name: String,
}

/// Profile update that also flips the `registered` flag, used once at
/// the end of onboarding.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileRegistration {
    pub username: String,
    pub full_name: String,
    pub registered: bool,
}

impl ProfileRegistration {
    pub fn new(username: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            full_name: full_name.into(),
            registered: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewEvent {
    pub user_id: Uuid,
    pub title: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub description: String,
    pub is_open_circle: bool,
}

/// Full-row event edit. All editable columns are sent every time, the
/// caller overlays changed fields onto the current values.
#[derive(Debug, Clone, Serialize)]
pub struct EventUpdate {
    pub title: String,
    pub description: String,
    pub event_date: DateTime<Utc>,
    pub location: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewFriendRequest {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct FriendRequestUpdate {
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: FriendRequestStatus,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewFriendGroup {
    pub user_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewGroupMember {
    pub group_id: Uuid,
    pub friend_id: Uuid,
    pub friendship_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewInvitation {
    pub event_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
}

#[derive(Debug, Clone, Serialize)]
pub struct InvitationUpdate {
    pub event_id: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub status: InvitationStatus,
}

// ---------------------------------------------------------------------------
// Composed read models, assembled client-side from multiple tables.

/// A friendship paired with the friend's profile.
#[derive(Debug, Clone, Serialize)]
pub struct FriendProfile {
    pub friendship: Friendship,
    pub profile: Profile,
}

/// A group membership paired with the member's profile.
#[derive(Debug, Clone, Serialize)]
pub struct MemberProfile {
    pub member: GroupMember,
    pub profile: Profile,
}

/// A friend request paired with the counterpart's profile.
#[derive(Debug, Clone, Serialize)]
pub struct RequestProfile {
    pub request: FriendRequest,
    pub profile: Profile,
}

/// An event with its invitation list and the viewer's role.
#[derive(Debug, Clone, Serialize)]
pub struct EventWithInvitations {
    pub event: Event,
    pub invitations: Vec<Invitation>,
    pub viewer_is_host: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_from_postgrest_row() {
        let json = r#"{
            "id": "6f2c8e1a-4b3d-4f5e-9a1b-2c3d4e5f6a7b",
            "username": "mara",
            "full_name": null,
            "registered": true
        }"#;
        let profile: Profile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.username, "mara");
        assert_eq!(profile.full_name, None);
        assert!(profile.registered);
        assert_eq!(profile.display_name(), "mara");
    }

    #[test]
    fn test_display_name_prefers_full_name() {
        let profile = Profile {
            id: Uuid::new_v4(),
            username: "mara".to_string(),
            full_name: Some("Mara Jensen".to_string()),
            registered: true,
        };
        assert_eq!(profile.display_name(), "Mara Jensen");
    }

    #[test]
    fn test_event_row_round_trip() {
        let json = r#"{
            "id": "00000000-0000-0000-0000-000000000001",
            "user_id": "00000000-0000-0000-0000-000000000002",
            "title": "Lakeside bonfire",
            "event_date": "2025-06-14T18:30:00+00:00",
            "status": "Published",
            "location": "North shore",
            "description": "Bring blankets",
            "is_open_circle": false
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.status, EventStatus::Published);
        assert_eq!(event.title, "Lakeside bonfire");

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["status"], "Published");
        assert_eq!(back["is_open_circle"], false);
    }

    #[test]
    fn test_statuses_serialize_capitalized() {
        assert_eq!(
            serde_json::to_string(&InvitationStatus::Pending).unwrap(),
            "\"Pending\""
        );
        assert_eq!(
            serde_json::to_string(&EventStatus::Cancelled).unwrap(),
            "\"Cancelled\""
        );
        assert_eq!(
            serde_json::to_string(&FriendRequestStatus::Declined).unwrap(),
            "\"Declined\""
        );
    }

    #[test]
    fn test_status_from_str_is_case_insensitive() {
        assert_eq!(
            "tentative".parse::<InvitationStatus>().unwrap(),
            InvitationStatus::Tentative
        );
        assert_eq!(
            "CANCELLED".parse::<EventStatus>().unwrap(),
            EventStatus::Cancelled
        );
        assert!("maybe".parse::<InvitationStatus>().is_err());
    }

    #[test]
    fn test_registration_payload_sets_flag() {
        let params = ProfileRegistration::new("mara", "Mara Jensen");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["registered"], true);
        assert_eq!(json["username"], "mara");
    }

    #[test]
    fn test_invitation_update_serializes_all_columns() {
        let update = InvitationUpdate {
            event_id: Uuid::nil(),
            sender_id: Uuid::nil(),
            receiver_id: Uuid::nil(),
            status: InvitationStatus::Accepted,
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["status"], "Accepted");
        assert!(json.get("event_id").is_some());
        assert!(json.get("receiver_id").is_some());
    }
}

//! Events: direct reads and the composed event + invitations views.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use spontyctl_core::models::{
    Event, EventStatus, EventUpdate, EventWithInvitations, Invitation, NewEvent, Profile,
};

use crate::error::Result;
use crate::postgrest::Query;
use crate::SpontyClient;

impl SpontyClient {
    /// Events the signed-in user has an invitation to.
    pub async fn invited_events(&self) -> Result<Vec<Event>> {
        let invitations = self.my_invitations().await?;
        let event_ids: Vec<Uuid> = invitations.iter().map(|i| i.event_id).collect();
        self.rows("events", Query::select("*").in_ids("id", &event_ids))
            .await
    }

    /// Single event by id.
    pub async fn event(&self, event_id: Uuid) -> Result<Event> {
        self.row("events", Query::select("*").eq("id", event_id))
            .await
    }

    /// Events created by the signed-in user.
    pub async fn hosted_events(&self) -> Result<Vec<Event>> {
        let me = self.ensure_user()?;
        self.rows("events", Query::select("*").eq("user_id", me.id))
            .await
    }

    /// Create an event hosted by the signed-in user and return the
    /// stored row with its generated id.
    pub async fn create_event(
        &self,
        title: &str,
        event_date: DateTime<Utc>,
        location: &str,
        description: &str,
        is_open_circle: bool,
    ) -> Result<Event> {
        let me = self.ensure_user()?;
        debug!(title, "creating event");
        let row = NewEvent {
            user_id: me.id,
            title: title.to_string(),
            event_date,
            location: location.to_string(),
            description: description.to_string(),
            is_open_circle,
        };
        self.insert_returning("events", &row).await
    }

    /// Edit the editable columns of an event.
    pub async fn update_event(&self, event_id: Uuid, changes: &EventUpdate) -> Result<()> {
        self.update("events", Query::filter().eq("id", event_id), changes)
            .await
    }

    /// Soft-cancel an event; the row stays for everyone already invited.
    pub async fn cancel_event(&self, event_id: Uuid) -> Result<()> {
        #[derive(Serialize)]
        struct StatusChange {
            status: EventStatus,
        }
        debug!(event = %event_id, "cancelling event");
        self.update(
            "events",
            Query::filter().eq("id", event_id),
            &StatusChange {
                status: EventStatus::Cancelled,
            },
        )
        .await
    }

    /// One event with its full invitation list; the host flag reflects
    /// the signed-in viewer.
    pub async fn event_with_invitations(&self, event_id: Uuid) -> Result<EventWithInvitations> {
        let me = self.ensure_user()?;
        let event = self.event(event_id).await?;
        let invitations = self.event_invitations(event_id).await?;
        let viewer_is_host = event.is_hosted_by(me.id);
        Ok(EventWithInvitations {
            event,
            invitations,
            viewer_is_host,
        })
    }

    /// Feed source: every event the signed-in user hosts or is invited
    /// to, each carrying its full invitation list.
    pub async fn feed_events_with_invitations(&self) -> Result<Vec<EventWithInvitations>> {
        let invitations = self.my_invitations().await?;
        let hosted = self.hosted_events().await?;
        let hosted_ids: HashSet<Uuid> = hosted.iter().map(|e| e.id).collect();

        let event_ids: Vec<Uuid> = invitations
            .iter()
            .map(|i| i.event_id)
            .chain(hosted.iter().map(|e| e.id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let events: Vec<Event> = self
            .rows("events", Query::select("*").in_ids("id", &event_ids))
            .await?;
        let mut by_event = self.invitations_for_events(&event_ids).await?;

        Ok(events
            .into_iter()
            .map(|event| EventWithInvitations {
                invitations: by_event.remove(&event.id).unwrap_or_default(),
                viewer_is_host: hosted_ids.contains(&event.id),
                event,
            })
            .collect())
    }

    /// Inbox source: events behind the signed-in user's pending
    /// invitations, carrying only the pending ones.
    pub async fn inbox_events_with_invitations(&self) -> Result<Vec<EventWithInvitations>> {
        let pending = self.pending_invitations().await?;
        let event_ids: Vec<Uuid> = pending.iter().map(|i| i.event_id).collect();
        let events: Vec<Event> = self
            .rows("events", Query::select("*").in_ids("id", &event_ids))
            .await?;
        let mut by_event = self.pending_invitations_for_events(&event_ids).await?;

        Ok(events
            .into_iter()
            .map(|event| EventWithInvitations {
                invitations: by_event.remove(&event.id).unwrap_or_default(),
                viewer_is_host: false,
                event,
            })
            .collect())
    }

    /// Hosting view source: the signed-in user's events with their
    /// invitation lists.
    pub async fn hosted_events_with_invitations(&self) -> Result<Vec<EventWithInvitations>> {
        let hosted = self.hosted_events().await?;
        let event_ids: Vec<Uuid> = hosted.iter().map(|e| e.id).collect();
        let mut by_event = self.invitations_for_events(&event_ids).await?;

        Ok(hosted
            .into_iter()
            .map(|event| EventWithInvitations {
                invitations: by_event.remove(&event.id).unwrap_or_default(),
                viewer_is_host: true,
                event,
            })
            .collect())
    }

    /// Profiles of everyone with an invitation in the given list,
    /// fetched in one batch. Pairs with the guest partition helpers.
    pub async fn invitation_receiver_profiles(
        &self,
        invitations: &[Invitation],
    ) -> Result<Vec<Profile>> {
        let receiver_ids: Vec<Uuid> = invitations
            .iter()
            .map(|i| i.receiver_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        self.rows("profiles", Query::select("*").in_ids("id", &receiver_ids))
            .await
    }
}

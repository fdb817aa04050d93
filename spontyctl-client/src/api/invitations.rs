//! Event invitations: inbox reads, per-event reads and batch sends.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use spontyctl_core::join::bucket_by;
use spontyctl_core::models::{Event, Invitation, InvitationStatus, InvitationUpdate, NewInvitation};

use crate::error::{ApiError, Result};
use crate::postgrest::Query;
use crate::SpontyClient;

impl SpontyClient {
    /// All invitations addressed to the signed-in user.
    pub async fn my_invitations(&self) -> Result<Vec<Invitation>> {
        let me = self.ensure_user()?;
        self.rows("invitations", Query::select("*").eq("receiver_id", me.id))
            .await
    }

    /// Invitations addressed to the signed-in user still pending.
    pub async fn pending_invitations(&self) -> Result<Vec<Invitation>> {
        let me = self.ensure_user()?;
        self.rows(
            "invitations",
            Query::select("*")
                .eq("receiver_id", me.id)
                .eq("status", InvitationStatus::Pending),
        )
        .await
    }

    /// Every invitation of one event.
    pub async fn event_invitations(&self, event_id: Uuid) -> Result<Vec<Invitation>> {
        self.rows("invitations", Query::select("*").eq("event_id", event_id))
            .await
    }

    /// Invitations of one event sent by the signed-in user.
    pub async fn event_invitations_sent_by_me(&self, event_id: Uuid) -> Result<Vec<Invitation>> {
        let me = self.ensure_user()?;
        self.rows(
            "invitations",
            Query::select("*").eq("event_id", event_id).eq("sender_id", me.id),
        )
        .await
    }

    /// Invitations for a set of events, bucketed by event id. Events
    /// without invitations have no entry.
    pub async fn invitations_for_events(
        &self,
        event_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Invitation>>> {
        let rows: Vec<Invitation> = self
            .rows("invitations", Query::select("*").in_ids("event_id", event_ids))
            .await?;
        Ok(bucket_by(rows, |i| i.event_id))
    }

    /// Pending subset of [`Self::invitations_for_events`].
    pub async fn pending_invitations_for_events(
        &self,
        event_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<Invitation>>> {
        let rows: Vec<Invitation> = self
            .rows(
                "invitations",
                Query::select("*")
                    .in_ids("event_id", event_ids)
                    .eq("status", InvitationStatus::Pending),
            )
            .await?;
        Ok(bucket_by(rows, |i| i.event_id))
    }

    /// Invite a set of receivers to an event, with the signed-in user
    /// as sender. An empty receiver set is rejected before any request
    /// goes out.
    pub async fn invite(&self, event_id: Uuid, receiver_ids: &[Uuid]) -> Result<()> {
        let me = self.ensure_user()?;
        if receiver_ids.is_empty() {
            return Err(ApiError::EmptyInvitees);
        }
        let rows: Vec<NewInvitation> = receiver_ids
            .iter()
            .map(|&receiver_id| NewInvitation {
                event_id,
                sender_id: me.id,
                receiver_id,
            })
            .collect();
        debug!(event = %event_id, count = rows.len(), "sending invitations");
        self.insert("invitations", &rows).await
    }

    /// Answer the signed-in user's invitation to the given event.
    pub async fn respond_invitation(&self, event: &Event, status: InvitationStatus) -> Result<()> {
        let me = self.ensure_user()?;
        debug!(event = %event.id, %status, "answering invitation");
        let changes = InvitationUpdate {
            event_id: event.id,
            sender_id: event.user_id,
            receiver_id: me.id,
            status,
        };
        self.update(
            "invitations",
            Query::filter().eq("event_id", event.id).eq("receiver_id", me.id),
            &changes,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{signed_in_client, signed_out_client};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_invite_rejects_empty_receiver_set() {
        let dir = TempDir::new().unwrap();
        let (client, _) = signed_in_client(dir.path());

        let err = client.invite(Uuid::new_v4(), &[]).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyInvitees));
    }

    #[tokio::test]
    async fn test_sent_by_me_requires_session() {
        let dir = TempDir::new().unwrap();
        let client = signed_out_client(dir.path());

        let err = client
            .event_invitations_sent_by_me(Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NoSession));
    }
}

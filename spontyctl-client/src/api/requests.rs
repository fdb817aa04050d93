//! Friend requests, sent and received.

use tracing::debug;
use uuid::Uuid;

use spontyctl_core::join::join_unique;
use spontyctl_core::models::{
    FriendRequest, FriendRequestStatus, FriendRequestUpdate, NewFriendRequest, Profile,
    RequestProfile,
};

use crate::error::Result;
use crate::postgrest::Query;
use crate::SpontyClient;

impl SpontyClient {
    /// All requests addressed to the signed-in user.
    pub async fn friend_requests(&self) -> Result<Vec<FriendRequest>> {
        let me = self.ensure_user()?;
        self.rows("friend_requests", Query::select("*").eq("receiver_id", me.id))
            .await
    }

    /// Received requests still awaiting an answer.
    pub async fn pending_friend_requests(&self) -> Result<Vec<FriendRequest>> {
        let me = self.ensure_user()?;
        self.rows(
            "friend_requests",
            Query::select("*")
                .eq("receiver_id", me.id)
                .eq("status", FriendRequestStatus::Pending),
        )
        .await
    }

    /// All received requests joined with the senders' profiles.
    pub async fn requests_with_profiles(&self) -> Result<Vec<RequestProfile>> {
        let requests = self.friend_requests().await?;
        self.join_sender_profiles(requests).await
    }

    /// Pending received requests joined with the senders' profiles.
    pub async fn pending_requests_with_profiles(&self) -> Result<Vec<RequestProfile>> {
        let requests = self.pending_friend_requests().await?;
        self.join_sender_profiles(requests).await
    }

    async fn join_sender_profiles(
        &self,
        requests: Vec<FriendRequest>,
    ) -> Result<Vec<RequestProfile>> {
        let sender_ids: Vec<Uuid> = requests.iter().map(|r| r.sender_id).collect();
        let profiles: Vec<Profile> = self
            .rows("profiles", Query::select("*").in_ids("id", &sender_ids))
            .await?;
        Ok(join_unique(
            requests,
            profiles,
            |r| r.sender_id,
            |p| p.id,
            |request, profile| RequestProfile { request, profile },
        ))
    }

    /// Profiles of everyone the signed-in user has an outgoing request
    /// to, regardless of answer.
    pub async fn sent_request_profiles(&self) -> Result<Vec<Profile>> {
        let me = self.ensure_user()?;
        let sent: Vec<FriendRequest> = self
            .rows("friend_requests", Query::select("*").eq("sender_id", me.id))
            .await?;
        let receiver_ids: Vec<Uuid> = sent.iter().map(|r| r.receiver_id).collect();
        self.rows("profiles", Query::select("*").in_ids("id", &receiver_ids))
            .await
    }

    /// Propose a friendship.
    pub async fn send_friend_request(&self, receiver_id: Uuid) -> Result<()> {
        let me = self.ensure_user()?;
        debug!(receiver = %receiver_id, "sending friend request");
        let row = NewFriendRequest {
            sender_id: me.id,
            receiver_id,
        };
        self.insert("friend_requests", &row).await
    }

    /// Answer a received request. Accepting makes the backend create
    /// the friendship rows.
    pub async fn respond_friend_request(
        &self,
        request: &FriendRequest,
        status: FriendRequestStatus,
    ) -> Result<()> {
        let changes = FriendRequestUpdate {
            sender_id: request.sender_id,
            receiver_id: request.receiver_id,
            status,
        };
        self.update("friend_requests", Query::filter().eq("id", request.id), &changes)
            .await
    }
}

//! Friendships and the profile joins layered on them.
//!
//! `friendships_view` already denormalizes one row per (user, friend)
//! direction, so "my friends" is a single filter; the profile variants
//! add one batched profile fetch and a local join.

use std::collections::HashSet;

use uuid::Uuid;

use spontyctl_core::join::join_unique;
use spontyctl_core::models::{
    FriendGroup, FriendProfile, Friendship, GroupMember, Invitation, Profile,
};

use crate::error::{ApiError, Result};
use crate::postgrest::Query;
use crate::SpontyClient;

impl SpontyClient {
    /// Friendship rows of the signed-in user, one per friend.
    pub async fn friendships(&self) -> Result<Vec<Friendship>> {
        let user = self.ensure_user()?;
        self.rows("friendships_view", Query::select("*").eq("user_id", user.id))
            .await
    }

    /// Friendships joined with the friends' profiles. A friend whose
    /// profile row is missing is skipped rather than failing the list.
    pub async fn friends_with_profiles(&self) -> Result<Vec<FriendProfile>> {
        let friendships = self.friendships().await?;
        let friend_ids: Vec<Uuid> = friendships.iter().map(|f| f.friend_id).collect();
        let profiles: Vec<Profile> = self
            .rows("profiles", Query::select("*").in_ids("id", &friend_ids))
            .await?;
        Ok(join_unique(
            friendships,
            profiles,
            |f| f.friend_id,
            |p| p.id,
            |friendship, profile| FriendProfile {
                friendship,
                profile,
            },
        ))
    }

    /// Friendship and profile of one specific user. Looking up yourself
    /// is rejected: you are not in your own friends list.
    pub async fn friend_with_profile(&self, user_id: Uuid) -> Result<FriendProfile> {
        let me = self.ensure_user()?;
        if me.id == user_id {
            return Err(ApiError::SelfFriendship);
        }
        let profile = self.profile(user_id).await?;
        let friendship: Friendship = self
            .row(
                "friendships_view",
                Query::select("*").eq("user_id", me.id).eq("friend_id", user_id),
            )
            .await?;
        Ok(FriendProfile {
            friendship,
            profile,
        })
    }

    /// Friends restricted to the members of one group.
    pub async fn friends_in_group(&self, group: &FriendGroup) -> Result<Vec<FriendProfile>> {
        let friends = self.friends_with_profiles().await?;
        let members: Vec<GroupMember> = self
            .rows("group_members", Query::select("*").eq("group_id", group.id))
            .await?;
        let member_friendships: HashSet<Uuid> =
            members.iter().map(|m| m.friendship_id).collect();
        Ok(friends
            .into_iter()
            .filter(|f| member_friendships.contains(&f.friendship.friendship_id))
            .collect())
    }

    /// Friends the signed-in user has already invited to an event.
    pub async fn friends_invited_to(&self, event_id: Uuid) -> Result<Vec<FriendProfile>> {
        let me = self.ensure_user()?;
        let friends = self.friends_with_profiles().await?;
        let sent: Vec<Invitation> = self
            .rows(
                "invitations",
                Query::select("*").eq("event_id", event_id).eq("sender_id", me.id),
            )
            .await?;
        let invited: HashSet<Uuid> = sent.iter().map(|i| i.receiver_id).collect();
        Ok(friends
            .into_iter()
            .filter(|f| invited.contains(&f.profile.id))
            .collect())
    }
}

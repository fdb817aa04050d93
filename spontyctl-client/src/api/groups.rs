//! Friend groups and memberships.

use std::collections::BTreeSet;

use tracing::debug;
use uuid::Uuid;

use spontyctl_core::join::join_unique;
use spontyctl_core::models::{
    FriendGroup, GroupMember, MemberProfile, NewFriendGroup, NewGroupMember, Profile,
};

use crate::error::{ApiError, Result};
use crate::postgrest::Query;
use crate::SpontyClient;

impl SpontyClient {
    /// Groups owned by the signed-in user.
    pub async fn groups(&self) -> Result<Vec<FriendGroup>> {
        let me = self.ensure_user()?;
        self.rows("groups", Query::select("*").eq("user_id", me.id))
            .await
    }

    /// Create a named group and return the stored row.
    pub async fn create_group(&self, name: &str) -> Result<FriendGroup> {
        let me = self.ensure_user()?;
        debug!(name, "creating group");
        let row = NewFriendGroup {
            user_id: me.id,
            name: name.to_string(),
        };
        self.insert_returning("groups", &row).await
    }

    /// Member rows of one group.
    pub async fn group_members(&self, group_id: Uuid) -> Result<Vec<GroupMember>> {
        self.rows("group_members", Query::select("*").eq("group_id", group_id))
            .await
    }

    /// Members of one group joined with their profiles.
    pub async fn members_with_profiles(&self, group_id: Uuid) -> Result<Vec<MemberProfile>> {
        let members = self.group_members(group_id).await?;
        self.join_member_profiles(members).await
    }

    /// Members across several groups. A friend appearing in more than
    /// one group keeps one member row per group but costs one profile
    /// fetch.
    pub async fn members_of_groups(&self, groups: &[FriendGroup]) -> Result<Vec<MemberProfile>> {
        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let members: Vec<GroupMember> = self
            .rows("group_members", Query::select("*").in_ids("group_id", &group_ids))
            .await?;
        self.join_member_profiles(members).await
    }

    async fn join_member_profiles(
        &self,
        members: Vec<GroupMember>,
    ) -> Result<Vec<MemberProfile>> {
        let friend_ids: Vec<Uuid> = members
            .iter()
            .map(|m| m.friend_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let profiles: Vec<Profile> = self
            .rows("profiles", Query::select("*").in_ids("id", &friend_ids))
            .await?;
        Ok(join_unique(
            members,
            profiles,
            |m| m.friend_id,
            |p| p.id,
            |member, profile| MemberProfile { member, profile },
        ))
    }

    /// Add friends to a group. An empty batch is rejected before any
    /// request goes out.
    pub async fn add_group_members(&self, members: &[NewGroupMember]) -> Result<()> {
        if members.is_empty() {
            return Err(ApiError::EmptyMembers);
        }
        debug!(count = members.len(), "adding group members");
        self.insert("group_members", members).await
    }

    /// The signed-in user's groups that already contain a given friend.
    pub async fn groups_containing_friend(&self, friend_id: Uuid) -> Result<Vec<FriendGroup>> {
        let groups = self.groups().await?;
        let group_ids: Vec<Uuid> = groups.iter().map(|g| g.id).collect();
        let memberships: Vec<GroupMember> = self
            .rows(
                "group_members",
                Query::select("*")
                    .in_ids("group_id", &group_ids)
                    .eq("friend_id", friend_id),
            )
            .await?;
        let containing: Vec<Uuid> = memberships.iter().map(|m| m.group_id).collect();
        self.rows("groups", Query::select("*").in_ids("id", &containing))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{signed_in_client, signed_out_client};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_add_group_members_rejects_empty_batch() {
        let dir = TempDir::new().unwrap();
        let (client, _) = signed_in_client(dir.path());

        let err = client.add_group_members(&[]).await.unwrap_err();
        assert!(matches!(err, ApiError::EmptyMembers));
    }

    #[tokio::test]
    async fn test_members_of_groups_requires_session() {
        let dir = TempDir::new().unwrap();
        let client = signed_out_client(dir.path());

        // An empty group list must not sidestep the session check.
        let err = client.members_of_groups(&[]).await.unwrap_err();
        assert!(matches!(err, ApiError::NoSession));
    }

    #[tokio::test]
    async fn test_members_of_no_groups_skips_the_request() {
        let dir = TempDir::new().unwrap();
        let (client, _) = signed_in_client(dir.path());

        // Nothing listens on the test backend, so this only passes if
        // the empty id filter never sends a request.
        let members = client.members_of_groups(&[]).await.unwrap();
        assert!(members.is_empty());
    }
}

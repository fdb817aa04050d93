//! Profile reads, updates and username search.

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use spontyctl_core::models::{Profile, ProfileRegistration, ProfileUpdate};

use crate::error::Result;
use crate::postgrest::Query;
use crate::SpontyClient;

impl SpontyClient {
    /// Any profile by id.
    pub async fn profile(&self, user_id: Uuid) -> Result<Profile> {
        self.row("profiles", Query::select("*").eq("id", user_id))
            .await
    }

    /// Profile row of the signed-in user.
    pub async fn current_profile(&self) -> Result<Profile> {
        let user = self.ensure_user()?;
        self.profile(user.id).await
    }

    /// Change own username and full name.
    pub async fn update_profile(&self, username: &str, full_name: &str) -> Result<()> {
        let user = self.ensure_user()?;
        let changes = ProfileUpdate {
            username: username.to_string(),
            full_name: full_name.to_string(),
        };
        self.update("profiles", Query::filter().eq("id", user.id), &changes)
            .await
    }

    /// Finish onboarding: set username and full name and mark the
    /// profile registered.
    pub async fn register_profile(&self, username: &str, full_name: &str) -> Result<()> {
        let user = self.ensure_user()?;
        debug!(username, "registering profile");
        let changes = ProfileRegistration::new(username, full_name);
        self.update("profiles", Query::filter().eq("id", user.id), &changes)
            .await
    }

    /// Whether the signed-in user completed profile registration.
    pub async fn is_registered(&self) -> Result<bool> {
        Ok(self.current_profile().await?.registered)
    }

    /// Username prefix search, delegated to a server-side function so
    /// matching stays consistent with the app.
    pub async fn search_profiles(&self, prefix: &str) -> Result<Vec<Profile>> {
        #[derive(Serialize)]
        struct Params<'a> {
            prefix: &'a str,
        }
        self.rpc("search_profiles_by_username_prefix", &Params { prefix })
            .await
    }
}

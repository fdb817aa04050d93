//! Typed client for the spontyUP backend.
//!
//! The backend is a hosted Postgres fronted by PostgREST plus a GoTrue
//! auth endpoint; there is no custom server. All row-level access rules
//! live in the database, so this crate is a faithful REST client: auth,
//! five REST verbs, and the multi-fetch joins the flat schema requires.
//!
//! Operations hang off [`SpontyClient`], grouped by aggregate under
//! `api/`. The session persists across processes through
//! [`SessionStore`] and refreshes itself when the access token nears
//! expiry.

mod api;
pub mod auth;
pub mod error;
mod postgrest;
pub mod session;

pub use auth::{AuthClient, AuthUser, Session};
pub use error::{ApiError, Result};
pub use session::SessionStore;

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;
use tracing::{debug, warn};

use spontyctl_core::BackendConfig;

/// Client handle: HTTP pool, backend endpoints and the current session.
///
/// Cheap to share behind a reference; all methods take `&self`. The
/// session mutex is only held to copy the session in or out, never
/// across an await point.
pub struct SpontyClient {
    http: reqwest::Client,
    config: BackendConfig,
    auth: AuthClient,
    store: SessionStore,
    session: Mutex<Option<Session>>,
}

impl SpontyClient {
    /// Client with the default session store location.
    pub fn new(config: BackendConfig) -> Self {
        Self::with_store(config, SessionStore::new())
    }

    /// Client with an explicit session store, for tests and embedding.
    pub fn with_store(config: BackendConfig, store: SessionStore) -> Self {
        let http = reqwest::Client::new();
        let auth = AuthClient::new(http.clone(), &config.url, &config.anon_key);
        let session = match store.load() {
            Ok(session) => session,
            Err(err) => {
                // A broken session file should degrade to signed-out,
                // not brick every command.
                warn!("ignoring unreadable session file: {err}");
                None
            }
        };
        Self {
            http,
            config,
            auth,
            store,
            session: Mutex::new(session),
        }
    }

    /// Client configured from the environment and config file.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(BackendConfig::load()?))
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.config.url
    }

    pub(crate) fn anon_key(&self) -> &str {
        &self.config.anon_key
    }

    fn session_guard(&self) -> MutexGuard<'_, Option<Session>> {
        // Lock poisoning only happens if a holder panicked while
        // copying; the data is still a plain Option.
        self.session.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Identity of the signed-in user, if any.
    pub fn current_user(&self) -> Option<AuthUser> {
        self.session_guard().as_ref().map(|s| s.user.clone())
    }

    /// Signed-in user, or the uniform no-session error every
    /// user-scoped operation starts with.
    pub fn ensure_user(&self) -> Result<AuthUser> {
        self.current_user().ok_or(ApiError::NoSession)
    }

    /// Bearer token for REST calls, refreshing when close to expiry.
    /// A successful refresh is persisted so later invocations reuse it.
    pub(crate) async fn access_token(&self) -> Result<String> {
        let current = self.session_guard().clone().ok_or(ApiError::NoSession)?;
        if !current.needs_refresh(Utc::now()) {
            return Ok(current.access_token);
        }

        debug!("access token near expiry, refreshing");
        let refreshed = self.auth.refresh(&current.refresh_token).await?;
        self.store.save(&refreshed)?;
        let token = refreshed.access_token.clone();
        *self.session_guard() = Some(refreshed);
        Ok(token)
    }

    /// Create an account and adopt the returned session.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.auth.sign_up(email, password).await?;
        self.adopt(session.clone())?;
        Ok(session)
    }

    /// Password sign-in; the session is persisted for later invocations.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let session = self.auth.sign_in(email, password).await?;
        self.adopt(session.clone())?;
        Ok(session)
    }

    /// Revoke the session server-side and forget it locally. The local
    /// half always happens, even when revocation fails on an already
    /// dead token.
    pub async fn sign_out(&self) -> Result<()> {
        let current = self.session_guard().clone();
        if let Some(session) = current {
            if let Err(err) = self.auth.sign_out(&session.access_token).await {
                warn!("server-side sign-out failed: {err}");
            }
        }
        self.store.clear()?;
        *self.session_guard() = None;
        Ok(())
    }

    fn adopt(&self, session: Session) -> Result<()> {
        self.store.save(&session)?;
        *self.session_guard() = Some(session);
        Ok(())
    }
}

/// Offline client builders shared by the module tests.
#[cfg(test)]
pub(crate) mod testing {
    use std::path::Path;

    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use spontyctl_core::BackendConfig;

    use crate::auth::{AuthUser, Session};
    use crate::session::SessionStore;
    use crate::SpontyClient;

    /// Backend address nothing listens on, so an operation that should
    /// have stopped at a local guard fails fast instead of hanging.
    pub(crate) fn offline_config() -> BackendConfig {
        BackendConfig::new("http://127.0.0.1:1", "anon-key")
    }

    pub(crate) fn fresh_session() -> Session {
        Session {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: Some("a@b.c".to_string()),
            },
        }
    }

    /// Client with no stored session.
    pub(crate) fn signed_out_client(dir: &Path) -> SpontyClient {
        let store = SessionStore::at(dir.join("session.json"));
        SpontyClient::with_store(offline_config(), store)
    }

    /// Client that picks up a freshly seeded session, plus the session
    /// user's id.
    pub(crate) fn signed_in_client(dir: &Path) -> (SpontyClient, Uuid) {
        let path = dir.join("session.json");
        let session = fresh_session();
        let user_id = session.user.id;
        SessionStore::at(&path).save(&session).unwrap();
        let client = SpontyClient::with_store(offline_config(), SessionStore::at(path));
        (client, user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::testing::{fresh_session, offline_config, signed_out_client};
    use tempfile::TempDir;

    #[test]
    fn test_fresh_client_has_no_user() {
        let dir = TempDir::new().unwrap();
        let client = signed_out_client(dir.path());
        assert!(client.current_user().is_none());
        assert!(matches!(client.ensure_user(), Err(ApiError::NoSession)));
    }

    #[test]
    fn test_client_picks_up_stored_session() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let stored = fresh_session();
        SessionStore::at(&path).save(&stored).unwrap();

        let client = SpontyClient::with_store(offline_config(), SessionStore::at(&path));
        assert_eq!(client.current_user().unwrap(), stored.user);
    }

    #[test]
    fn test_corrupt_session_file_degrades_to_signed_out() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, "garbage").unwrap();

        let client = SpontyClient::with_store(offline_config(), SessionStore::at(&path));
        assert!(client.current_user().is_none());
    }
}

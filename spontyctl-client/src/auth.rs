//! GoTrue password authentication.
//!
//! Covers the four auth endpoints the app uses: signup, password
//! sign-in, token refresh and logout. Every request carries the public
//! anon key; logout additionally carries the bearer token it revokes.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{ApiError, Result};

/// Seconds before expiry at which a token counts as stale.
const REFRESH_MARGIN_SECS: i64 = 60;

/// Identity of an authenticated user, as the auth endpoint reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
}

/// A bearer session for REST calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl Session {
    /// True when the access token is past, or within a minute of, expiry.
    pub fn needs_refresh(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(REFRESH_MARGIN_SECS) >= self.expires_at
    }
}

/// Raw token endpoint response. `expires_at` (unix seconds) is preferred
/// when present; older server versions only send `expires_in`.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    #[serde(default)]
    expires_at: Option<i64>,
    user: AuthUser,
}

impl TokenResponse {
    fn into_session(self, now: DateTime<Utc>) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .or_else(|| self.expires_in.map(|secs| now + Duration::seconds(secs)))
            .unwrap_or_else(|| now + Duration::hours(1));
        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at,
            user: self.user,
        }
    }
}

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Client for the hosted auth endpoint.
pub struct AuthClient {
    http: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub fn new(http: reqwest::Client, project_url: &str, anon_key: &str) -> Self {
        Self {
            http,
            base_url: format!("{}/auth/v1", project_url.trim_end_matches('/')),
            anon_key: anon_key.to_string(),
        }
    }

    /// Create an account. The backend is configured without email
    /// confirmation, so the response already carries a usable session.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<Session> {
        debug!(email, "signing up");
        self.token_request("signup", None, &Credentials { email, password })
            .await
    }

    /// Password sign-in.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        debug!(email, "signing in");
        self.token_request("token", Some("password"), &Credentials { email, password })
            .await
    }

    /// Exchange a refresh token for a fresh session.
    pub async fn refresh(&self, refresh_token: &str) -> Result<Session> {
        self.token_request("token", Some("refresh_token"), &RefreshGrant { refresh_token })
            .await
    }

    /// Revoke the session server-side. Success is a bare 204.
    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .http
            .post(format!("{}/logout", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(ApiError::from_response("sign-out", response).await);
        }
        Ok(())
    }

    async fn token_request<B: Serialize>(
        &self,
        path: &str,
        grant_type: Option<&str>,
        body: &B,
    ) -> Result<Session> {
        let mut request = self
            .http
            .post(format!("{}/{}", self.base_url, path))
            .header("apikey", &self.anon_key)
            .json(body);
        if let Some(grant_type) = grant_type {
            request = request.query(&[("grant_type", grant_type)]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(ApiError::from_response("authentication", response).await);
        }

        let text = response.text().await?;
        let token: TokenResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::decode("auth session", e))?;
        Ok(token.into_session(Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_refresh_near_expiry() {
        let now = Utc::now();
        let session = Session {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_at: now + Duration::seconds(30),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: None,
            },
        };
        assert!(session.needs_refresh(now));

        let fresh = Session {
            expires_at: now + Duration::hours(1),
            ..session
        };
        assert!(!fresh.needs_refresh(now));
    }

    #[test]
    fn test_token_response_prefers_expires_at() {
        let now = Utc::now();
        let json = format!(
            r#"{{
                "access_token": "at",
                "refresh_token": "rt",
                "expires_in": 3600,
                "expires_at": {},
                "user": {{"id": "00000000-0000-0000-0000-000000000001", "email": "a@b.c"}}
            }}"#,
            (now + Duration::hours(2)).timestamp()
        );
        let token: TokenResponse = serde_json::from_str(&json).unwrap();
        let session = token.into_session(now);
        let delta = session.expires_at - now;
        assert!(delta > Duration::minutes(110) && delta <= Duration::hours(2));
    }

    #[test]
    fn test_token_response_falls_back_to_expires_in() {
        let now = Utc::now();
        let json = r#"{
            "access_token": "at",
            "refresh_token": "rt",
            "expires_in": 3600,
            "user": {"id": "00000000-0000-0000-0000-000000000001", "email": null}
        }"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        let session = token.into_session(now);
        assert_eq!(session.expires_at, now + Duration::seconds(3600));
        assert_eq!(session.user.email, None);
    }
}

//! On-disk session persistence.
//!
//! Each CLI invocation is a fresh process, so the session from `auth
//! login` is written to ~/.spontyctl/session.json and read back on the
//! next run. The file holds bearer tokens; on unix it is created 0600
//! so the tokens are never readable by other users.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use spontyctl_core::BackendConfig;

use crate::auth::Session;
use crate::error::{ApiError, Result};

const SESSION_FILE: &str = "session.json";

pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    /// Store at the default location, ~/.spontyctl/session.json.
    pub fn new() -> Self {
        Self {
            path: BackendConfig::config_dir().join(SESSION_FILE),
        }
    }

    /// Store at an explicit path.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session, if any.
    pub fn load(&self) -> Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let json = fs::read_to_string(&self.path).map_err(ApiError::session_store)?;
        let session: Session = serde_json::from_str(&json).map_err(ApiError::session_file)?;
        debug!(path = %self.path.display(), "loaded stored session");
        Ok(Some(session))
    }

    /// Persist a session, creating the directory if needed.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(ApiError::session_store)?;
        }
        let json = serde_json::to_string_pretty(session).map_err(ApiError::session_file)?;
        write_restricted(&self.path, json.as_bytes()).map_err(ApiError::session_store)?;
        debug!(path = %self.path.display(), "saved session");
        Ok(())
    }

    /// Delete the persisted session. Missing file is fine.
    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::session_store(e)),
        }
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the file owner-only from the first byte. The mode is set at
/// open, so a fresh file is never momentarily world-readable; a file
/// left looser by an earlier version is tightened before the write.
#[cfg(unix)]
fn write_restricted(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(bytes)
}

#[cfg(not(unix))]
fn write_restricted(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::write(path, bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthUser;
    use chrono::{Duration, Utc};
    use tempfile::TempDir;
    use uuid::Uuid;

    fn session() -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_at: Utc::now() + Duration::hours(1),
            user: AuthUser {
                id: Uuid::new_v4(),
                email: Some("a@b.c".to_string()),
            },
        }
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));

        let original = session();
        store.save(&original).unwrap();

        let loaded = store.load().unwrap().unwrap();
        assert_eq!(loaded.access_token, original.access_token);
        assert_eq!(loaded.user, original.user);
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path().join("absent.json"));
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_load_corrupt_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let err = SessionStore::at(path).load().unwrap_err();
        assert!(matches!(err, ApiError::SessionFile { .. }));
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));

        store.save(&session()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = SessionStore::at(dir.path().join("session.json"));
        store.save(&session()).unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn test_save_tightens_existing_loose_file() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        SessionStore::at(&path).save(&session()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

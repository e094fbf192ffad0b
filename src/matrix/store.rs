//! On-disk state of the Matrix account.
//!
//! The bot keeps a data directory holding:
//! - `session`: JSON file with the login tokens and the last sync token
//! - `sqlite`: SQLite store of the Matrix SDK (room state, encryption keys)
//!
//! A missing or unreadable `session` file means the bot has to log in again.

use std::path::{Path, PathBuf};

use log::{debug, trace, warn};
use matrix_sdk::authentication::matrix::MatrixSession;
use serde::{Deserialize, Serialize};
use tokio::{fs, sync::Mutex};

const SESSION_FILE: &str = "session";
const SQLITE_DIR: &str = "sqlite";

/// Content of the `session` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SavedSession {
    /// Login tokens of the bot's device
    user_session: MatrixSession,
    /// Where the next sync resumes from
    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Handle on the data directory of the bot account.
pub struct SessionStore {
    dir: PathBuf,
    saved: Mutex<Option<SavedSession>>,
}

impl SessionStore {
    /// Opens the data directory, loading the saved session if there is one.
    ///
    /// The directory is created when missing.
    pub async fn open(dir: &Path) -> anyhow::Result<Self> {
        fs::create_dir_all(dir).await?;

        let saved = match read_session(&dir.join(SESSION_FILE)).await {
            Ok(saved) => Some(saved),
            Err(e) => {
                debug!("no usable session in {}: {}", dir.display(), e);
                None
            }
        };

        Ok(SessionStore {
            dir: dir.to_path_buf(),
            saved: Mutex::new(saved),
        })
    }

    /// Path of the SDK's SQLite store.
    pub fn sqlite_path(&self) -> PathBuf {
        self.dir.join(SQLITE_DIR)
    }

    /// Login tokens saved by a previous run.
    pub async fn user_session(&self) -> Option<MatrixSession> {
        self.saved
            .lock()
            .await
            .as_ref()
            .map(|saved| saved.user_session.clone())
    }

    /// Sync token saved by a previous run.
    pub async fn sync_token(&self) -> Option<String> {
        self.saved
            .lock()
            .await
            .as_ref()
            .and_then(|saved| saved.sync_token.clone())
    }

    /// Saves fresh login tokens, forgetting the previous sync token.
    pub async fn save_user_session(&self, user_session: &MatrixSession) -> anyhow::Result<()> {
        trace!("saving user session");

        let mut saved = self.saved.lock().await;
        let session = SavedSession {
            user_session: user_session.clone(),
            sync_token: None,
        };
        self.write(&session).await?;
        *saved = Some(session);

        Ok(())
    }

    /// Saves the sync token next to the login tokens.
    ///
    /// Ignored when no login was saved yet.
    pub async fn save_sync_token(&self, sync_token: String) -> anyhow::Result<()> {
        trace!("saving sync token {}", sync_token);

        let mut saved = self.saved.lock().await;
        let Some(session) = saved.as_mut() else {
            warn!("sync token received before any login was saved");
            return Ok(());
        };
        session.sync_token = Some(sync_token);
        self.write(session).await
    }

    async fn write(&self, session: &SavedSession) -> anyhow::Result<()> {
        let serialized = serde_json::to_string(session)?;
        fs::write(self.dir.join(SESSION_FILE), serialized).await?;
        Ok(())
    }
}

async fn read_session(path: &Path) -> anyhow::Result<SavedSession> {
    let content = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use matrix_sdk::{SessionMeta, SessionTokens};
    use tempfile::TempDir;

    use super::*;

    fn create_user_session() -> MatrixSession {
        MatrixSession {
            meta: SessionMeta {
                user_id: "@undercover:example.com".try_into().unwrap(),
                device_id: "DEVICEID".into(),
            },
            tokens: SessionTokens {
                access_token: "access_token".to_string(),
                refresh_token: None,
            },
        }
    }

    #[tokio::test]
    async fn test_open_empty_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(temp_dir.path()).await.unwrap();

        assert!(store.user_session().await.is_none());
        assert!(store.sync_token().await.is_none());
        assert_eq!(store.sqlite_path(), temp_dir.path().join("sqlite"));
    }

    #[tokio::test]
    async fn test_open_creates_missing_dir() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("data").join("session");

        SessionStore::open(&dir).await.unwrap();
        assert!(dir.is_dir());
    }

    #[tokio::test]
    async fn test_open_ignores_corrupted_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("session"), "not json")
            .await
            .unwrap();

        let store = SessionStore::open(temp_dir.path()).await.unwrap();
        assert!(store.user_session().await.is_none());
    }

    #[tokio::test]
    async fn test_session_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();

        let store = SessionStore::open(temp_dir.path()).await.unwrap();
        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();
        store.save_sync_token("s42".to_string()).await.unwrap();

        let reopened = SessionStore::open(temp_dir.path()).await.unwrap();
        assert_eq!(
            reopened.user_session().await.unwrap().meta.user_id.to_string(),
            "@undercover:example.com"
        );
        assert_eq!(reopened.sync_token().await, Some("s42".to_string()));
    }

    #[tokio::test]
    async fn test_new_login_drops_sync_token() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(temp_dir.path()).await.unwrap();
        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();
        store.save_sync_token("s42".to_string()).await.unwrap();

        store
            .save_user_session(&create_user_session())
            .await
            .unwrap();
        assert!(store.sync_token().await.is_none());
    }

    #[tokio::test]
    async fn test_sync_token_without_login_is_not_written() {
        let temp_dir = TempDir::new().unwrap();
        let store = SessionStore::open(temp_dir.path()).await.unwrap();

        store.save_sync_token("s1".to_string()).await.unwrap();
        assert!(!temp_dir.path().join("session").exists());
    }

    #[test]
    fn test_sync_token_omitted_when_none() {
        let saved = SavedSession {
            user_session: create_user_session(),
            sync_token: None,
        };

        let serialized = serde_json::to_string(&saved).unwrap();
        assert!(!serialized.contains("sync_token"));
        assert!(serialized.contains("@undercover:example.com"));
    }
}

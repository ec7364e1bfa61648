//! Persistence of the Matrix login between restarts.
//!
//! The data directory holds:
//! - `session`: JSON file with the access token and the last sync token
//! - `sqlite`: state store of the Matrix SDK
//!
//! Games are never persisted, only the login is.

use std::path::{Path, PathBuf};

use log::{debug, trace};
use matrix_sdk::authentication::matrix;
use serde::{Deserialize, Serialize};
use tokio::fs;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedLogin {
    user_session: matrix::MatrixSession,

    #[serde(skip_serializing_if = "Option::is_none")]
    sync_token: Option<String>,
}

/// Login state read from, and written to, the data directory.
#[derive(Clone)]
pub struct SessionFile {
    login: Option<PersistedLogin>,
    sqlite_path: PathBuf,
    session_path: PathBuf,
}

impl SessionFile {
    /// Reads the login saved in `data_dir`, if any.
    ///
    /// A missing or unreadable session file means a fresh login is needed.
    pub async fn load(data_dir: &Path) -> SessionFile {
        let sqlite_path = data_dir.join("sqlite");
        let session_path = data_dir.join("session");
        debug!("read session at {}", session_path.display());

        let login = match SessionFile::read_login(&session_path).await {
            Ok(login) => Some(login),
            Err(err) => {
                debug!("no previous login: {}", err);
                None
            }
        };

        SessionFile {
            login,
            sqlite_path,
            session_path,
        }
    }

    async fn read_login(session_path: &Path) -> anyhow::Result<PersistedLogin> {
        if !fs::try_exists(session_path).await? {
            anyhow::bail!("session file does not exist");
        }

        let session_data = fs::read_to_string(session_path).await?;
        Ok(serde_json::from_str(&session_data)?)
    }

    pub fn has_login(&self) -> bool {
        self.login.is_some()
    }

    pub fn sqlite_path(&self) -> &Path {
        &self.sqlite_path
    }

    pub fn user_session(&self) -> Option<&matrix::MatrixSession> {
        self.login.as_ref().map(|login| &login.user_session)
    }

    pub fn sync_token(&self) -> Option<String> {
        self.login.as_ref().and_then(|login| login.sync_token.clone())
    }

    /// Saves the latest sync token next to the saved login.
    pub async fn save_sync_token(&self, sync_token: String) -> anyhow::Result<()> {
        trace!("persist sync token {}", sync_token);

        let mut login = SessionFile::read_login(&self.session_path).await?;
        login.sync_token = Some(sync_token);
        fs::write(&self.session_path, serde_json::to_string(&login)?).await?;

        Ok(())
    }

    /// Saves a fresh login, dropping any previous sync token.
    pub async fn save_user_session(&self, user_session: &matrix::MatrixSession) -> anyhow::Result<()> {
        trace!("persist user session");

        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let login = PersistedLogin {
            user_session: user_session.clone(),
            sync_token: None,
        };
        fs::write(&self.session_path, serde_json::to_string(&login)?).await?;

        Ok(())
    }
}

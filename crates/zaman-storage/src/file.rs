// SPDX-FileCopyrightText: 2026 Zaman Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! File-backed session store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{debug, warn};
use zaman_config::SessionConfig;
use zaman_core::{Session, SessionStore, ZamanError};

/// Stores the session token as a single line in a file.
///
/// Writes go to a sibling temporary file that is renamed over the target, so
/// a crash mid-write never leaves a truncated token behind. On unix the file
/// is readable by the owner only.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(&config.token_path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "session_token".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl SessionStore for FileSessionStore {
    async fn load(&self) -> Result<Option<Session>, ZamanError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(storage_error(e)),
        };

        let token = raw.trim();
        if token.is_empty() {
            return Ok(None);
        }
        // Opaque tokens stay on disk; the user simply logs in again.
        let session = Session::from_token(token);
        if session.is_none() {
            warn!(path = %self.path.display(), "stored token carries no user id, ignoring");
        }
        Ok(session)
    }

    async fn save(&self, session: &Session) -> Result<(), ZamanError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await.map_err(storage_error)?;
        }

        let tmp = self.temp_path();
        tokio::fs::write(&tmp, session.token()).await.map_err(storage_error)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&tmp, std::fs::Permissions::from_mode(0o600))
                .await
                .map_err(storage_error)?;
        }

        if let Err(e) = tokio::fs::rename(&tmp, &self.path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(storage_error(e));
        }
        debug!(path = %self.path.display(), "session token saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), ZamanError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "session token removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(storage_error(e)),
        }
    }
}

fn storage_error(e: std::io::Error) -> ZamanError {
    ZamanError::Storage {
        source: Box::new(e),
    }
}

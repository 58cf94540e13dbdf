//! Logged-in user for this service instance.
//!
//! The username token lives in `AppState`, is loaded from disk at startup and
//! written back on every login/logout.

pub mod handlers;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session file error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub struct SessionState {
    path: PathBuf,
    current: Arc<RwLock<Option<String>>>,
}

impl SessionState {
    /// Restores the persisted session, if any. A missing file means logged out.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref().to_path_buf();
        let current = match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                let user = contents.trim().to_string();
                (!user.is_empty()).then_some(user)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if let Some(user) = &current {
            info!("Restored session for '{user}'");
        }

        Ok(Self {
            path,
            current: Arc::new(RwLock::new(current)),
        })
    }

    pub async fn current(&self) -> Option<String> {
        self.current.read().await.clone()
    }

    pub async fn login(&self, user: String) -> Result<(), SessionError> {
        let mut current = self.current.write().await;
        tokio::fs::write(&self.path, &user).await?;
        info!("User '{user}' logged in");
        *current = Some(user);
        Ok(())
    }

    pub async fn logout(&self) -> Result<(), SessionError> {
        let mut current = self.current.write().await;
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        if let Some(user) = current.take() {
            info!("User '{user}' logged out");
        }
        Ok(())
    }
}

use std::path::{Path, PathBuf};

use crate::{
    error::{Res, SyncError},
    types::Token,
    warning,
};

/// Token persisted as JSON at a fixed path between runs.
pub struct TokenCache {
    path: PathBuf,
}

impl TokenCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenCache { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the cached token. A missing or malformed file is a
    /// [`SyncError::TokenLoad`].
    pub async fn load(&self) -> Res<Token> {
        let content = async_fs::read_to_string(&self.path)
            .await
            .map_err(|e| SyncError::TokenLoad(format!("{}: {}", self.path.display(), e)))?;
        serde_json::from_str(&content)
            .map_err(|e| SyncError::TokenLoad(format!("{}: {}", self.path.display(), e)))
    }

    pub async fn persist(&self, token: &Token) -> Res<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }

    /// Best-effort [`persist`](Self::persist): failures are only logged.
    pub async fn save(&self, token: &Token) {
        if let Err(e) = self.persist(token).await {
            warning!("Failed to save token to {}: {}", self.path.display(), e);
        }
    }
}

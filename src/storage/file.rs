use crate::application::models::user::User;
use crate::error::ApiError;
use crate::session::tokens::TokenPair;
use crate::storage::{TokenStore, UserStore};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, ApiError> {
    match fs::read(path).await {
        Ok(bytes) => {
            let value = serde_json::from_slice(&bytes)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!("No stored data at {}", path.display());
            Ok(None)
        }
        Err(e) => Err(ApiError::Io(e)),
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ApiError> {
    let bytes = serde_json::to_vec(value)?;
    fs::write(path, bytes).await.map_err(ApiError::Io)
}

async fn remove_file(path: &Path) -> Result<(), ApiError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ApiError::Io(e)),
    }
}

/// Persists the credential pair as a JSON file.
#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn get(&self) -> Result<Option<TokenPair>, ApiError> {
        read_json(&self.path).await
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), ApiError> {
        debug!("Saving token pair to {}", self.path.display());
        write_json(&self.path, tokens).await
    }

    async fn remove(&self) -> Result<(), ApiError> {
        debug!("Removing token pair at {}", self.path.display());
        remove_file(&self.path).await
    }
}

/// Persists the user profile as a JSON file.
#[derive(Debug)]
pub struct FileUserStore {
    path: PathBuf,
}

impl FileUserStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl UserStore for FileUserStore {
    async fn get(&self) -> Result<Option<User>, ApiError> {
        read_json(&self.path).await
    }

    async fn save(&self, user: &User) -> Result<(), ApiError> {
        write_json(&self.path, user).await
    }

    async fn remove(&self) -> Result<(), ApiError> {
        remove_file(&self.path).await
    }
}

pub mod file;

pub mod memory;

use crate::application::models::user::User;
use crate::error::ApiError;
use crate::session::tokens::TokenPair;
use async_trait::async_trait;

/// Durable storage for the credential pair. Implementations must survive
/// process restarts (the in-memory variant exists for tests and short-lived
/// embeddings).
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self) -> Result<Option<TokenPair>, ApiError>;
    async fn save(&self, tokens: &TokenPair) -> Result<(), ApiError>;
    async fn remove(&self) -> Result<(), ApiError>;
}

/// Durable storage for the signed-in user's profile.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get(&self) -> Result<Option<User>, ApiError>;
    async fn save(&self, user: &User) -> Result<(), ApiError>;
    async fn remove(&self) -> Result<(), ApiError>;
}

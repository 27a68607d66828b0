use crate::application::models::user::User;
use crate::error::ApiError;
use crate::session::tokens::TokenPair;
use crate::storage::{TokenStore, UserStore};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-process token store. Not durable; intended for tests and embeddings
/// that manage persistence elsewhere.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    tokens: RwLock<Option<TokenPair>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            tokens: RwLock::new(Some(tokens)),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn get(&self) -> Result<Option<TokenPair>, ApiError> {
        Ok(self.tokens.read().expect("token store lock poisoned").clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), ApiError> {
        *self.tokens.write().expect("token store lock poisoned") = Some(tokens.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), ApiError> {
        *self.tokens.write().expect("token store lock poisoned") = None;
        Ok(())
    }
}

/// In-process user store.
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    user: RwLock<Option<User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get(&self) -> Result<Option<User>, ApiError> {
        Ok(self.user.read().expect("user store lock poisoned").clone())
    }

    async fn save(&self, user: &User) -> Result<(), ApiError> {
        *self.user.write().expect("user store lock poisoned") = Some(user.clone());
        Ok(())
    }

    async fn remove(&self) -> Result<(), ApiError> {
        *self.user.write().expect("user store lock poisoned") = None;
        Ok(())
    }
}

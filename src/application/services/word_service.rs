use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::models::user::StatusMessage,
    application::models::word::{
        FavoriteEntry, FavoriteUpdateRequest, HistoryAddRequest, HistoryByDay, HistoryEntry,
        WordEntry,
    },
    error::ApiError,
    transport::http_client::AuthHttpClient,
    utils::history::group_history_by_day,
};

/// Word catalog, search history and favorites.
#[async_trait]
pub trait WordService: Send + Sync {
    /// The word catalog with the caller's favorite flag on each entry.
    async fn get_words(&self, user_id: i64) -> Result<Vec<WordEntry>, ApiError>;

    /// Records a looked-up word in the user's history.
    async fn add_to_history(&self, word: &str, user_id: i64) -> Result<StatusMessage, ApiError>;

    /// The user's history, newest first.
    async fn get_history(&self, user_id: i64) -> Result<Vec<HistoryEntry>, ApiError>;

    /// The user's history grouped by day, newest day first.
    async fn get_history_by_day(&self, user_id: i64) -> Result<Vec<HistoryByDay>, ApiError>;

    /// Marks or unmarks a word as favorite.
    async fn set_favorite(
        &self,
        word: &str,
        favorite: bool,
        user_id: i64,
    ) -> Result<StatusMessage, ApiError>;

    /// The user's favorite words, most recently updated first.
    async fn get_favorites(&self, user_id: i64) -> Result<Vec<FavoriteEntry>, ApiError>;
}

pub struct WordServiceImpl {
    client: Arc<AuthHttpClient>,
}

impl WordServiceImpl {
    pub fn new(client: Arc<AuthHttpClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl WordService for WordServiceImpl {
    async fn get_words(&self, user_id: i64) -> Result<Vec<WordEntry>, ApiError> {
        info!("Fetching word list");

        let words: Vec<WordEntry> = self
            .client
            .get(&format!("/words?user_id={}", user_id))
            .await?;

        debug!("Fetched {} words", words.len());
        Ok(words)
    }

    async fn add_to_history(&self, word: &str, user_id: i64) -> Result<StatusMessage, ApiError> {
        debug!("Adding '{}' to history", word);

        let request = HistoryAddRequest {
            word: word.to_string(),
            user_id,
        };
        self.client.post("/history", &request).await
    }

    async fn get_history(&self, user_id: i64) -> Result<Vec<HistoryEntry>, ApiError> {
        info!("Fetching search history");

        let entries: Vec<HistoryEntry> = self
            .client
            .get(&format!("/history?user_id={}", user_id))
            .await?;

        debug!("Fetched {} history entries", entries.len());
        Ok(entries)
    }

    async fn get_history_by_day(&self, user_id: i64) -> Result<Vec<HistoryByDay>, ApiError> {
        let entries = self.get_history(user_id).await?;
        Ok(group_history_by_day(&entries))
    }

    async fn set_favorite(
        &self,
        word: &str,
        favorite: bool,
        user_id: i64,
    ) -> Result<StatusMessage, ApiError> {
        debug!("Setting favorite flag for '{}' to {}", word, favorite);

        let request = FavoriteUpdateRequest {
            word: word.to_string(),
            favorite: (if favorite { "Y" } else { "N" }).to_string(),
            user_id,
        };
        self.client.post("/favorite", &request).await
    }

    async fn get_favorites(&self, user_id: i64) -> Result<Vec<FavoriteEntry>, ApiError> {
        info!("Fetching favorites");

        let favorites: Vec<FavoriteEntry> = self
            .client
            .get(&format!("/favorite?user_id={}", user_id))
            .await?;

        debug!("Fetched {} favorites", favorites.len());
        Ok(favorites)
    }
}

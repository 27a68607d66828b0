use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{application::models::dictionary::DictionaryEntry, error::ApiError};

#[derive(Debug, Deserialize)]
struct LookupErrorBody {
    message: Option<String>,
}

/// Thin client for the external dictionary API. Lookups are public, so this
/// client is deliberately separate from the authenticated gateway and never
/// carries a bearer credential.
#[derive(Debug)]
pub struct DictionaryService {
    client: Client,
    base_url: String,
}

impl DictionaryService {
    pub fn new(base_url: &str, timeout: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .context("Failed to build dictionary HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Looks up a word, returning its entries (phonetics, meanings,
    /// definitions). An unknown word yields a backend error carrying the
    /// dictionary API's message.
    #[instrument(skip(self))]
    pub async fn lookup(&self, word: &str) -> Result<Vec<DictionaryEntry>, ApiError> {
        let url = format!("{}/{}", self.base_url, word);
        debug!("Looking up '{}'", word);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            let entries: Vec<DictionaryEntry> = serde_json::from_str(&body_text)?;
            debug!("Found {} entries for '{}'", entries.len(), word);
            Ok(entries)
        } else {
            let message = serde_json::from_str::<LookupErrorBody>(&body_text)
                .ok()
                .and_then(|b| b.message);
            Err(ApiError::backend(status, message))
        }
    }
}

#[cfg(test)]
mod tests_dictionary_service {
    use super::*;
    use crate::utils::logger::setup_logger;
    use mockito::Server;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_lookup_success() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("GET", "/hello")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{
                    "word": "hello",
                    "phonetic": "/həˈloʊ/",
                    "phonetics": [],
                    "meanings": [{
                        "partOfSpeech": "noun",
                        "definitions": [{"definition": "A greeting.", "example": null}]
                    }]
                }]"#,
            )
            .create_async()
            .await;

        let service = DictionaryService::new(&server.url(), 30).unwrap();
        let entries = service.lookup("hello").await.unwrap();

        assert_eq!(entries[0].word, "hello");
        assert_eq!(entries[0].meanings[0].part_of_speech, "noun");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_lookup_unknown_word() {
        setup_logger();
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("GET", "/zzzz")
            .with_status(404)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "title": "No Definitions Found",
                    "message": "Sorry pal, we couldn't find definitions for the word you were looking for.",
                    "resolution": "You can try the search again at later time or head to the web instead."
                }"#,
            )
            .create_async()
            .await;

        let service = DictionaryService::new(&server.url(), 30).unwrap();
        let err = service.lookup("zzzz").await.unwrap_err();

        assert_eq!(
            err.message(),
            "Sorry pal, we couldn't find definitions for the word you were looking for."
        );
    }
}

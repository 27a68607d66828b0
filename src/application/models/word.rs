use serde::{Deserialize, Serialize};

/// A word from the catalog, joined with the caller's favorite flag.
/// The backend encodes the flag as `"Y"` / `"N"`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WordEntry {
    pub word: String,
    pub favorite: String,
}

impl WordEntry {
    pub fn is_favorite(&self) -> bool {
        self.favorite == "Y"
    }
}

/// One row of the user's search history.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub word: String,
    pub created_at: String,
}

/// One row of the user's favorites list.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FavoriteEntry {
    pub word: String,
    pub favorite: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct HistoryAddRequest {
    pub word: String,
    pub user_id: i64,
}

#[derive(Debug, Serialize)]
pub struct FavoriteUpdateRequest {
    pub word: String,
    pub favorite: String,
    pub user_id: i64,
}

/// History entries grouped under the day they were recorded.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryByDay {
    pub title: String,
    pub data: Vec<HistoryEntry>,
}

#[cfg(test)]
mod tests_word_models {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_word_entry_favorite_flag() {
        let yes: WordEntry = serde_json::from_str(r#"{"word":"hello","favorite":"Y"}"#).unwrap();
        let no: WordEntry = serde_json::from_str(r#"{"word":"world","favorite":"N"}"#).unwrap();
        assert!(yes.is_favorite());
        assert!(!no.is_favorite());
    }

    #[test]
    fn test_history_entry_deserialization() {
        let entry: HistoryEntry = serde_json::from_str(
            r#"{"id":3,"word":"lexicon","created_at":"2024-05-01 10:22:00"}"#,
        )
        .unwrap();
        assert_eq!(entry.id, 3);
        assert_eq!(entry.word, "lexicon");
        assert_eq!(entry.created_at, "2024-05-01 10:22:00");
    }
}

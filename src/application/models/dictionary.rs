use serde::Deserialize;

/// One entry returned by the external dictionary API for a looked-up word.
#[derive(Debug, Clone, Deserialize)]
pub struct DictionaryEntry {
    pub word: String,
    pub phonetic: Option<String>,
    #[serde(default)]
    pub phonetics: Vec<Phonetic>,
    #[serde(default)]
    pub meanings: Vec<Meaning>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Phonetic {
    pub text: Option<String>,
    pub audio: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Meaning {
    #[serde(rename = "partOfSpeech")]
    pub part_of_speech: String,
    #[serde(default)]
    pub definitions: Vec<Definition>,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub antonyms: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Definition {
    pub definition: String,
    pub example: Option<String>,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

#[cfg(test)]
mod tests_dictionary_models {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_entry_deserialization() {
        let payload = r#"
        [{
            "word": "hello",
            "phonetic": "/həˈloʊ/",
            "phonetics": [{"text": "/həˈloʊ/", "audio": "https://example.com/hello.mp3"}],
            "meanings": [{
                "partOfSpeech": "interjection",
                "definitions": [{
                    "definition": "A greeting.",
                    "example": "Hello, everyone.",
                    "synonyms": ["hi"]
                }],
                "synonyms": ["greetings"],
                "antonyms": []
            }]
        }]
        "#;

        let entries: Vec<DictionaryEntry> = serde_json::from_str(payload).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].word, "hello");
        assert_eq!(entries[0].meanings[0].part_of_speech, "interjection");
        assert_eq!(
            entries[0].meanings[0].definitions[0].definition,
            "A greeting."
        );
    }

    #[test]
    fn test_missing_optional_fields() {
        let payload = r#"[{"word": "terse", "phonetic": null}]"#;
        let entries: Vec<DictionaryEntry> = serde_json::from_str(payload).unwrap();
        assert!(entries[0].phonetics.is_empty());
        assert!(entries[0].meanings.is_empty());
    }
}

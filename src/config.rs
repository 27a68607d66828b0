use serde::Deserialize;
use std::env;
use std::fmt;
use std::fmt::Debug;
use std::str::FromStr;
use tracing::error;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub rest_api: RestApiConfig,
    pub dictionary: DictionaryApiConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RestApiConfig {
    pub base_url: String,
    pub timeout: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DictionaryApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub tokens_path: String,
    pub user_path: String,
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"rest_api\":{},\"dictionary\":{},\"storage\":{}}}",
            self.rest_api, self.dictionary, self.storage
        )
    }
}

impl fmt::Display for RestApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"base_url\":\"{}\",\"timeout\":{}}}",
            self.base_url, self.timeout
        )
    }
}

impl fmt::Display for DictionaryApiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"base_url\":\"{}\"}}", self.base_url)
    }
}

impl fmt::Display for StorageConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"tokens_path\":\"{}\",\"user_path\":\"{}\"}}",
            self.tokens_path, self.user_path
        )
    }
}

pub fn get_env_or_default<T: FromStr>(env_var: &str, default: T) -> T
where
    <T as FromStr>::Err: Debug,
{
    match env::var(env_var) {
        Ok(val) => val.parse::<T>().unwrap_or_else(|_| {
            error!("Failed to parse {}: {}, using default", env_var, val);
            default
        }),
        Err(_) => default,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        Config {
            rest_api: RestApiConfig {
                base_url: get_env_or_default(
                    "WORDBOOK_API_BASE_URL",
                    String::from("http://127.0.0.1:3333"),
                ),
                timeout: get_env_or_default("WORDBOOK_API_TIMEOUT", 30),
            },
            dictionary: DictionaryApiConfig {
                base_url: get_env_or_default(
                    "WORDBOOK_DICTIONARY_BASE_URL",
                    String::from("https://api.dictionaryapi.dev/api/v2/entries/en"),
                ),
            },
            storage: StorageConfig {
                tokens_path: get_env_or_default(
                    "WORDBOOK_TOKENS_PATH",
                    String::from("wordbook_auth_tokens.json"),
                ),
                user_path: get_env_or_default(
                    "WORDBOOK_USER_PATH",
                    String::from("wordbook_user.json"),
                ),
            },
        }
    }
}

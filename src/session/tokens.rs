use serde::{Deserialize, Serialize};
use std::fmt;

/// The credential pair issued by the backend: a short-lived access token and
/// the refresh token used to obtain its replacement. Both are always issued
/// together; the pair is replaced atomically on refresh and deleted on
/// sign-out.
///
/// Field names match both the `POST /sessions/refresh-token` response and
/// the on-disk storage format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub token: String,
    pub refresh_token: String,
}

impl TokenPair {
    pub fn new(token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            refresh_token: refresh_token.into(),
        }
    }
}

impl fmt::Display for TokenPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"token\":\"[REDACTED]\",\"refresh_token\":\"[REDACTED]\"}}"
        )
    }
}

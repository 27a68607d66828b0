pub(crate) const AUTHORIZATION_HEADER_KEY: &str = "Authorization";
pub(crate) const BEARER_PREFIX: &str = "Bearer";

pub(crate) const TOKEN_EXPIRED_MESSAGE: &str = "token.expired";
pub(crate) const TOKEN_INVALID_MESSAGE: &str = "token.invalid";

pub(crate) const REFRESH_TOKEN_ENDPOINT: &str = "/sessions/refresh-token";

pub(crate) const FALLBACK_ERROR_MESSAGE: &str = "Unknown error";

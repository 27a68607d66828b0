use crate::constants::{
    AUTHORIZATION_HEADER_KEY, BEARER_PREFIX, FALLBACK_ERROR_MESSAGE, REFRESH_TOKEN_ENDPOINT,
    TOKEN_EXPIRED_MESSAGE, TOKEN_INVALID_MESSAGE,
};
use crate::error::ApiError;
use crate::session::interceptor::{InterceptorHandle, InterceptorSlot};
use crate::session::refresh::{RefreshCoordinator, RefreshTicket};
use crate::session::tokens::TokenPair;
use crate::storage::TokenStore;
use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    refresh_token: &'a str,
}

/// Request body kept in a replayable form: the refresh protocol may have to
/// send the same request again with a new token.
enum Payload {
    Json(serde_json::Value),
    FilePart {
        field: String,
        file_name: String,
        mime: String,
        bytes: Vec<u8>,
    },
}

/// HTTP client for the Wordbook backend that attaches the current bearer
/// credential to every request and recovers transparently from expired
/// access tokens.
///
/// A 401 whose body carries one of the expiry sentinels (`token.expired`,
/// `token.invalid`) starts the refresh protocol: the first such request
/// drives a single call to the refresh endpoint while every other request
/// hitting the same expiry is queued; once the refresh settles, all of them
/// are replayed with the new token or rejected with the refresh error. Any
/// other 401 forces a sign-out. The 401 handling only runs while an
/// interceptor is registered via [`AuthHttpClient::register_interceptor`].
pub struct AuthHttpClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
    bearer: RwLock<Option<String>>,
    refresh: RefreshCoordinator,
    interceptor: Arc<InterceptorSlot>,
}

impl AuthHttpClient {
    /// Creates a new client for the given base URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the backend API.
    /// * `timeout` - Request timeout in seconds, applied by the transport.
    /// * `store` - Durable storage for the credential pair.
    pub fn new(base_url: &str, timeout: u64, store: Arc<dyn TokenStore>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            store,
            bearer: RwLock::new(None),
            refresh: RefreshCoordinator::new(),
            interceptor: Arc::new(InterceptorSlot::new()),
        })
    }

    /// Sets the in-memory access token attached to subsequent requests.
    pub fn set_default_token(&self, token: &str) {
        *self.bearer.write().expect("bearer lock poisoned") = Some(token.to_string());
    }

    /// Clears the in-memory access token (sign-out).
    pub fn clear_default_token(&self) {
        *self.bearer.write().expect("bearer lock poisoned") = None;
    }

    /// Installs the 401 interception behavior with `sign_out` as the
    /// unrecoverable-failure callback. The returned handle removes it;
    /// unregistering twice is a no-op.
    pub fn register_interceptor(
        &self,
        sign_out: impl Fn() + Send + Sync + 'static,
    ) -> InterceptorHandle {
        Arc::clone(&self.interceptor).register(sign_out)
    }

    #[instrument(skip(self))]
    pub async fn get<T: DeserializeOwned + Debug>(&self, endpoint: &str) -> Result<T, ApiError> {
        self.request(Method::GET, endpoint, None).await
    }

    #[instrument(skip(self, body))]
    pub async fn post<T: DeserializeOwned + Debug, B: Serialize + Debug>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = Payload::Json(serde_json::to_value(body)?);
        self.request(Method::POST, endpoint, Some(payload)).await
    }

    #[instrument(skip(self, body))]
    pub async fn put<T: DeserializeOwned + Debug, B: Serialize + Debug>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let payload = Payload::Json(serde_json::to_value(body)?);
        self.request(Method::PUT, endpoint, Some(payload)).await
    }

    /// PATCH that uploads a single file as the multipart form field `field`.
    #[instrument(skip(self, bytes))]
    pub async fn patch_file<T: DeserializeOwned + Debug>(
        &self,
        endpoint: &str,
        field: &str,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<T, ApiError> {
        let payload = Payload::FilePart {
            field: field.to_string(),
            file_name: file_name.to_string(),
            mime: mime.to_string(),
            bytes,
        };
        self.request(Method::PATCH, endpoint, Some(payload)).await
    }

    async fn request<T: DeserializeOwned + Debug>(
        &self,
        method: Method,
        endpoint: &str,
        payload: Option<Payload>,
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, endpoint);

        loop {
            debug!("Sending {} request to {}", method, url);
            let response = self.send(&method, &url, payload.as_ref()).await?;
            let status = response.status();

            if status != StatusCode::UNAUTHORIZED {
                return Self::handle_response(response).await;
            }

            let body_text = response.text().await?;
            let message = extract_message(&body_text);
            let refreshable = matches!(
                message.as_deref(),
                Some(TOKEN_EXPIRED_MESSAGE) | Some(TOKEN_INVALID_MESSAGE)
            );

            if !self.interceptor.is_active() {
                debug!("No interceptor registered, surfacing 401 unchanged");
                return Err(ApiError::unauthorized(message));
            }

            if !refreshable {
                warn!("Unrecoverable 401 on {} {}", method, endpoint);
                self.interceptor.sign_out();
                return Err(ApiError::unauthorized(message));
            }

            let refresh_token = match self.store.get().await? {
                Some(pair) if !pair.refresh_token.is_empty() => pair.refresh_token,
                _ => {
                    warn!("Access token expired and no refresh token is stored");
                    self.interceptor.sign_out();
                    return Err(ApiError::unauthorized(message));
                }
            };

            match self.refresh.begin() {
                RefreshTicket::Driver => {
                    debug!("Access token expired, driving refresh");
                    let pair = match self.request_fresh_tokens(&refresh_token).await {
                        Ok(pair) => pair,
                        Err(e) => {
                            error!("Token refresh failed: {}", e);
                            self.refresh.complete_failure(&e.message());
                            self.interceptor.sign_out();
                            return Err(e);
                        }
                    };

                    if let Err(e) = self.store.save(&pair).await {
                        error!("Failed to persist refreshed tokens: {}", e);
                        self.refresh.complete_failure(&e.message());
                        self.interceptor.sign_out();
                        return Err(e);
                    }

                    self.set_default_token(&pair.token);
                    self.refresh.complete_success(&pair.token);
                    // Fall through: replay the driving request with the new token.
                }
                RefreshTicket::Waiter(receiver) => {
                    debug!("Refresh already in flight, queueing request");
                    match receiver.await {
                        Ok(Ok(_token)) => {
                            // Default token was updated by the driver; replay.
                        }
                        Ok(Err(e)) => return Err(e),
                        Err(_) => {
                            // Driver dropped without settling the episode.
                            return Err(ApiError::RefreshFailed {
                                message: FALLBACK_ERROR_MESSAGE.to_string(),
                            });
                        }
                    }
                }
            }
            // A 401 on the replay is treated as a fresh expiry episode.
        }
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        payload: Option<&Payload>,
    ) -> Result<Response, ApiError> {
        let token = self.bearer.read().expect("bearer lock poisoned").clone();

        let mut request = self.client.request(method.clone(), url);
        if let Some(token) = token {
            request = request.header(AUTHORIZATION_HEADER_KEY, format!("{BEARER_PREFIX} {token}"));
        }
        match payload {
            Some(Payload::Json(value)) => {
                request = request.json(value);
            }
            Some(Payload::FilePart {
                field,
                file_name,
                mime,
                bytes,
            }) => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(mime)?;
                request = request.multipart(Form::new().part(field.clone(), part));
            }
            None => {}
        }

        Ok(request.send().await?)
    }

    /// Exchanges the stored refresh token for a new credential pair. Sent
    /// without a bearer header: the access token is already rejected.
    #[instrument(skip(self, refresh_token))]
    async fn request_fresh_tokens(&self, refresh_token: &str) -> Result<TokenPair, ApiError> {
        let url = format!("{}{}", self.base_url, REFRESH_TOKEN_ENDPOINT);
        debug!("Requesting new token pair");

        let response = self
            .client
            .post(&url)
            .json(&RefreshRequest { refresh_token })
            .send()
            .await?;

        let status = response.status();
        let body_text = response.text().await?;

        if status.is_success() {
            let pair: TokenPair = serde_json::from_str(&body_text)?;
            Ok(pair)
        } else {
            error!("Refresh endpoint rejected the refresh token: {}", status);
            Err(ApiError::RefreshFailed {
                message: extract_message(&body_text)
                    .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
            })
        }
    }

    async fn handle_response<T: DeserializeOwned + Debug>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body_text = response.text().await?;

        debug!("Response status: {}", status);

        if status.is_success() {
            let body: T = serde_json::from_str(&body_text)?;
            Ok(body)
        } else {
            error!("API request failed. Status: {}, Body: {}", status, body_text);
            Err(ApiError::backend(status, extract_message(&body_text)))
        }
    }
}

fn extract_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
}

impl fmt::Debug for AuthHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthHttpClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl fmt::Display for AuthHttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{\"base_url\":\"{}\"}}", self.base_url)
    }
}

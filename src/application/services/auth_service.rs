use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};

use crate::{
    application::models::user::{
        AvatarResponse, SessionData, SignInRequest, SignUpRequest, StatusMessage,
        UpdateProfileRequest, User,
    },
    error::ApiError,
    session::tokens::TokenPair,
    storage::{TokenStore, UserStore},
    transport::http_client::AuthHttpClient,
};

/// Account lifecycle: registration, sign-in/out and profile updates.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Registers a new account.
    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError>;

    /// Authenticates, persists the user and credential pair, and installs
    /// the access token as the gateway default.
    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ApiError>;

    /// Restores a previously persisted session at startup. Returns the
    /// stored user when both profile and tokens are available.
    async fn load_stored_session(&self) -> Result<Option<User>, ApiError>;

    /// Clears the stored session and the gateway default credential.
    async fn sign_out(&self) -> Result<(), ApiError>;

    /// Updates name/password on the backend.
    async fn update_profile(&self, request: &UpdateProfileRequest)
        -> Result<StatusMessage, ApiError>;

    /// Uploads a new profile picture and returns its stored file name.
    async fn update_avatar(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<AvatarResponse, ApiError>;

    /// Persists an updated profile locally.
    async fn store_profile(&self, user: &User) -> Result<(), ApiError>;
}

pub struct AuthServiceImpl {
    client: Arc<AuthHttpClient>,
    tokens: Arc<dyn TokenStore>,
    users: Arc<dyn UserStore>,
}

impl AuthServiceImpl {
    pub fn new(
        client: Arc<AuthHttpClient>,
        tokens: Arc<dyn TokenStore>,
        users: Arc<dyn UserStore>,
    ) -> Self {
        Self {
            client,
            tokens,
            users,
        }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User, ApiError> {
        info!("Registering account for {}", email);

        let request = SignUpRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.client.post("/users", &request).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<User, ApiError> {
        info!("Signing in {}", email);

        let request = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let session: SessionData = self.client.post("/sessions", &request).await?;

        self.users.save(&session.user).await?;
        self.tokens
            .save(&TokenPair::new(
                session.token.clone(),
                session.refresh_token.clone(),
            ))
            .await?;
        self.client.set_default_token(&session.token);

        debug!("Session established: {}", session);
        Ok(session.user)
    }

    async fn load_stored_session(&self) -> Result<Option<User>, ApiError> {
        let user = self.users.get().await?;
        let tokens = self.tokens.get().await?;

        match (user, tokens) {
            (Some(user), Some(tokens)) => {
                debug!("Restoring stored session for user {}", user.id);
                self.client.set_default_token(&tokens.token);
                Ok(Some(user))
            }
            _ => Ok(None),
        }
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        info!("Signing out");
        self.users.remove().await?;
        self.tokens.remove().await?;
        self.client.clear_default_token();
        Ok(())
    }

    async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> Result<StatusMessage, ApiError> {
        self.client.put("/users", request).await
    }

    async fn update_avatar(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> Result<AvatarResponse, ApiError> {
        debug!("Uploading new avatar {}", file_name);
        self.client
            .patch_file("/users/avatar", "avatar", file_name, mime, bytes)
            .await
    }

    async fn store_profile(&self, user: &User) -> Result<(), ApiError> {
        self.users.save(user).await
    }
}

#[cfg(test)]
mod tests_auth_service {
    use super::*;
    use crate::storage::memory::{MemoryTokenStore, MemoryUserStore};
    use crate::utils::logger::setup_logger;
    use mockito::{Matcher, Server};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn create_service(
        server: &Server,
    ) -> (AuthServiceImpl, Arc<MemoryTokenStore>, Arc<MemoryUserStore>) {
        let tokens = Arc::new(MemoryTokenStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let client = Arc::new(
            AuthHttpClient::new(&server.url(), 30, Arc::clone(&tokens) as Arc<dyn TokenStore>)
                .unwrap(),
        );
        let service = AuthServiceImpl::new(
            client,
            Arc::clone(&tokens) as Arc<dyn TokenStore>,
            Arc::clone(&users) as Arc<dyn UserStore>,
        );
        (service, tokens, users)
    }

    #[tokio::test]
    async fn test_sign_in_persists_session() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("POST", "/sessions")
            .match_body(Matcher::Json(
                json!({"email": "ada@example.com", "password": "hunter2"}),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"
                {
                    "user": {"id": 1, "name": "Ada", "email": "ada@example.com", "avatar": null},
                    "token": "T1",
                    "refresh_token": "R1"
                }
                "#,
            )
            .create_async()
            .await;

        let (service, tokens, users) = create_service(&server);
        let user = service.sign_in("ada@example.com", "hunter2").await.unwrap();

        assert_eq!(user.name, "Ada");
        let stored = tokens.get().await.unwrap().unwrap();
        assert_eq!(stored.token, "T1");
        assert_eq!(stored.refresh_token, "R1");
        assert_eq!(users.get().await.unwrap().unwrap().email, "ada@example.com");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sign_in_failure_propagates_backend_message() {
        setup_logger();
        let mut server = Server::new_async().await;

        let _mock = server
            .mock("POST", "/sessions")
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"E-mail and/or password incorrect."}"#)
            .create_async()
            .await;

        let (service, tokens, _users) = create_service(&server);
        let err = service
            .sign_in("ada@example.com", "wrong")
            .await
            .unwrap_err();

        assert_eq!(err.message(), "E-mail and/or password incorrect.");
        assert!(tokens.get().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_stored_session_requires_both_user_and_tokens() {
        setup_logger();
        let server = Server::new_async().await;
        let (service, tokens, users) = create_service(&server);

        assert!(service.load_stored_session().await.unwrap().is_none());

        users
            .save(&User {
                id: 1,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                avatar: None,
            })
            .await
            .unwrap();
        assert!(service.load_stored_session().await.unwrap().is_none());

        tokens.save(&TokenPair::new("T1", "R1")).await.unwrap();
        let restored = service.load_stored_session().await.unwrap().unwrap();
        assert_eq!(restored.id, 1);
    }

    #[tokio::test]
    async fn test_update_avatar_uploads_multipart_file() {
        setup_logger();
        let mut server = Server::new_async().await;

        let mock = server
            .mock("PATCH", "/users/avatar")
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data.*".to_string()),
            )
            .match_body(Matcher::Regex(
                r#"name="avatar"; filename="ada.png""#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"avatar":"1-ada.png"}"#)
            .create_async()
            .await;

        let (service, _tokens, _users) = create_service(&server);
        let response = service
            .update_avatar("ada.png", "image/png", b"png-bytes".to_vec())
            .await
            .unwrap();

        assert_eq!(response.avatar, "1-ada.png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_sign_out_clears_stores() {
        setup_logger();
        let server = Server::new_async().await;
        let (service, tokens, users) = create_service(&server);

        tokens.save(&TokenPair::new("T1", "R1")).await.unwrap();
        users
            .save(&User {
                id: 1,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                avatar: None,
            })
            .await
            .unwrap();

        service.sign_out().await.unwrap();

        assert!(tokens.get().await.unwrap().is_none());
        assert!(users.get().await.unwrap().is_none());
    }
}

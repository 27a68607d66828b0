use serde::{Deserialize, Serialize};
use std::fmt;

/// A registered user of the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
}

/// Payload returned by `POST /sessions` on a successful sign-in.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionData {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SignUpRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UpdateProfileRequest {
    pub name: String,
    pub password: String,
    pub old_password: String,
}

/// Payload returned by `PATCH /users/avatar`: the file name under which
/// the uploaded picture was stored.
#[derive(Debug, Clone, Deserialize)]
pub struct AvatarResponse {
    pub avatar: String,
}

/// Generic `{ "message": ... }` acknowledgement returned by write endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusMessage {
    pub message: String,
}

impl fmt::Display for SessionData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{\"user\":{{\"id\":{},\"email\":\"{}\"}},\"token\":\"[REDACTED]\",\"refresh_token\":\"[REDACTED]\"}}",
            self.user.id, self.user.email
        )
    }
}

#[cfg(test)]
mod tests_user_models {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_session_data_deserialization() {
        let payload = r#"
        {
            "user": {
                "id": 7,
                "name": "Ada",
                "email": "ada@example.com",
                "avatar": null
            },
            "token": "access-token",
            "refresh_token": "refresh-token"
        }
        "#;

        let session: SessionData = serde_json::from_str(payload).unwrap();
        assert_eq!(session.user.id, 7);
        assert_eq!(session.user.name, "Ada");
        assert!(session.user.avatar.is_none());
        assert_eq!(session.token, "access-token");
        assert_eq!(session.refresh_token, "refresh-token");
    }

    #[test]
    fn test_session_data_display_redacts_tokens() {
        let session = SessionData {
            user: User {
                id: 1,
                name: "Ada".to_string(),
                email: "ada@example.com".to_string(),
                avatar: None,
            },
            token: "secret".to_string(),
            refresh_token: "also-secret".to_string(),
        };

        let expected = json!({
            "user": {"id": 1, "email": "ada@example.com"},
            "token": "[REDACTED]",
            "refresh_token": "[REDACTED]"
        });

        assert_json_eq!(
            serde_json::from_str::<serde_json::Value>(&session.to_string()).unwrap(),
            expected
        );
    }
}

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

// -- Token Claims --

/// Claims carried by an access token. Issued by the login handler and
/// checked by the bearer middleware in account-api.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub fullname: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub message: String,
    pub data: RegisterData,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RegisterData {
    pub user: User,
}

impl RegisterResponse {
    pub fn success(user: User) -> Self {
        Self {
            message: "success".to_string(),
            data: RegisterData { user },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

// -- Profile --

#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub profile: User,
}

// -- Errors --

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_rejects_unknown_fields() {
        let raw = r#"{"fullname":"A","email":"a@b.c","password":"x","admin":true}"#;
        assert!(serde_json::from_str::<RegisterRequest>(raw).is_err());
    }

    #[test]
    fn register_response_wraps_user_under_data() {
        let user = User {
            id: Uuid::nil(),
            fullname: "John Doe".into(),
            email: "john.doe@example.com".into(),
            created_at: chrono::DateTime::default(),
        };
        let json = serde_json::to_value(RegisterResponse::success(user)).unwrap();

        assert_eq!(json["message"], "success");
        assert_eq!(json["data"]["user"]["email"], "john.doe@example.com");
        assert!(json["data"]["user"].get("password").is_none());
    }
}

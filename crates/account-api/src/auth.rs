use std::sync::Arc;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{
    Json,
    extract::{FromRequest, State},
    http::StatusCode,
    response::IntoResponse,
};
use rand_core::OsRng;
use tracing::{debug, info};
use uuid::Uuid;

use account_db::Database;
use account_db::models::UserRow;
use account_types::api::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};

use crate::error::ApiError;
use crate::token::TokenKeys;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub tokens: TokenKeys,
    /// Checked against when a login names an unknown email, so a miss pays
    /// for one Argon2 verification just like a hit.
    dummy_hash: String,
}

impl AppStateInner {
    pub fn new(db: Database, tokens: TokenKeys) -> Result<Self, ApiError> {
        // Nobody knows this password, and a hit on it is rejected anyway.
        let unguessable = SaltString::generate(&mut OsRng);
        let dummy_hash = hash_password(unguessable.as_str())?;

        Ok(Self {
            db,
            tokens,
            dummy_hash,
        })
    }
}

/// `Json` with rejections rendered as `{"error": ...}` 400s.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

pub async fn register(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fullname = req.fullname.trim().to_string();
    let email = normalize_email(&req.email);
    let password = req.password;
    validate_registration(&fullname, &email, &password)?;

    // Hashing and the insert are both blocking
    let row = tokio::task::spawn_blocking(move || -> Result<UserRow, ApiError> {
        let password_hash = hash_password(&password)?;
        let user_id = Uuid::new_v4();

        state
            .db
            .create_user(&user_id.to_string(), &fullname, &email, &password_hash)
            .map_err(ApiError::from)
    })
    .await??;

    let user = row.to_user();
    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(RegisterResponse::success(user))))
}

pub async fn login(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let email = normalize_email(&req.email);
    let password = req.password;

    let lookup_state = state.clone();
    let user = tokio::task::spawn_blocking(move || -> Result<UserRow, ApiError> {
        let user = lookup_state.db.get_user_by_email(&email)?;
        check_credentials(user, &password, &lookup_state.dummy_hash, verify_password)
    })
    .await??;

    let user_id: Uuid = user.id.parse().map_err(ApiError::internal)?;
    let access_token = state
        .tokens
        .issue(user_id, &user.email)
        .map_err(ApiError::internal)?;

    info!("User {} logged in", user_id);

    Ok(Json(LoginResponse {
        access_token,
        token_type: "Bearer".to_string(),
        expires_in: state.tokens.ttl().num_seconds(),
    }))
}

/// Runs `verify` exactly once whether or not the email matched a user, so
/// the two rejections take the same time.
fn check_credentials(
    user: Option<UserRow>,
    password: &str,
    dummy_hash: &str,
    verify: impl Fn(&str, &str) -> Result<bool, ApiError>,
) -> Result<UserRow, ApiError> {
    let stored = user.as_ref().map_or(dummy_hash, |u| u.password.as_str());
    let matches = verify(password, stored)?;

    match user {
        Some(user) if matches => Ok(user),
        Some(user) => {
            debug!("Login rejected: bad password for {}", user.id);
            Err(ApiError::InvalidCredentials)
        }
        None => {
            debug!("Login rejected: unknown email");
            Err(ApiError::InvalidCredentials)
        }
    }
}

/// Emails are matched case-insensitively.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn validate_registration(fullname: &str, email: &str, password: &str) -> Result<(), ApiError> {
    if fullname.is_empty() {
        return Err(ApiError::BadRequest("fullname is required".into()));
    }
    if email.is_empty() || !email.contains('@') {
        return Err(ApiError::BadRequest("A valid email is required".into()));
    }
    if password.is_empty() {
        return Err(ApiError::BadRequest("password is required".into()));
    }
    Ok(())
}

/// Argon2id with a random salt, encoded as a PHC string.
fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(ApiError::internal)
}

fn verify_password(password: &str, stored: &str) -> Result<bool, ApiError> {
    let parsed = PasswordHash::new(stored).map_err(ApiError::internal)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

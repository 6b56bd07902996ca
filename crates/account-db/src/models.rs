use account_types::models::User;
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

/// Database row types: these map directly to SQLite rows.
/// Distinct from account-types models to keep the DB layer independent.
#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub fullname: String,
    pub email: String,
    /// Argon2 PHC string.
    pub password: String,
    pub created_at: String,
}

impl UserRow {
    /// Public view of the row, without the password hash.
    pub fn to_user(&self) -> User {
        User {
            id: self.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt user id '{}': {}", self.id, e);
                Uuid::default()
            }),
            fullname: self.fullname.clone(),
            email: self.email.clone(),
            created_at: parse_timestamp(&self.created_at).unwrap_or_else(|| {
                warn!("Corrupt created_at '{}' on user '{}'", self.created_at, self.id);
                DateTime::default()
            }),
        }
    }
}

/// SQLite's datetime('now') yields "YYYY-MM-DD HH:MM:SS" with no zone; it is UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|ndt| ndt.and_utc())
        })
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Public view of a user record. The stored password hash never leaves
/// account-db, so it has no field here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub fullname: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

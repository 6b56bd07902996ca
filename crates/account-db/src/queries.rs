use rusqlite::{Connection, ErrorCode, OptionalExtension};

use crate::models::UserRow;
use crate::{Database, DbError, Result};

const USER_COLUMNS: &str = "id, fullname, email, password, created_at";

impl Database {
    // -- Users --

    /// Insert a user and return the stored row.
    ///
    /// Email uniqueness is left to the UNIQUE index so that two concurrent
    /// registrations cannot both pass a lookup and then both insert.
    pub fn create_user(
        &self,
        id: &str,
        fullname: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<UserRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, fullname, email, password) VALUES (?1, ?2, ?3, ?4)",
                (id, fullname, email, password_hash),
            )
            .map_err(map_insert_error)?;

            query_user_by_id(conn, id)?.ok_or_else(|| DbError::MissingAfterInsert(id.to_string()))
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn count_users(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }
}

fn map_insert_error(err: rusqlite::Error) -> DbError {
    match &err {
        rusqlite::Error::SqliteFailure(e, Some(msg))
            if e.code == ErrorCode::ConstraintViolation && msg.contains("users.email") =>
        {
            DbError::EmailTaken
        }
        _ => DbError::Sqlite(err),
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    query_user(conn, "email", email)
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    query_user(conn, "id", id)
}

fn query_user(conn: &Connection, column: &'static str, value: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"
    ))?;

    let row = stmt
        .query_row([value], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                fullname: row.get(1)?,
                email: row.get(2)?,
                password: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    #[test]
    fn create_then_lookup_by_email_and_id() {
        let db = db();
        let row = db
            .create_user("id-1", "John Doe", "john.doe@example.com", "hash")
            .unwrap();
        assert_eq!(row.fullname, "John Doe");
        assert!(!row.created_at.is_empty());

        let by_email = db.get_user_by_email("john.doe@example.com").unwrap().unwrap();
        assert_eq!(by_email.id, "id-1");

        let by_id = db.get_user_by_id("id-1").unwrap().unwrap();
        assert_eq!(by_id.email, "john.doe@example.com");
    }

    #[test]
    fn missing_user_is_none() {
        let db = db();
        assert!(db.get_user_by_email("nobody@example.com").unwrap().is_none());
        assert!(db.get_user_by_id("nope").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_rejected_without_mutation() {
        let db = db();
        db.create_user("id-1", "John Doe", "john.doe@example.com", "hash-1")
            .unwrap();

        let err = db
            .create_user("id-2", "Jane Doe", "john.doe@example.com", "hash-2")
            .unwrap_err();
        assert!(matches!(err, DbError::EmailTaken));

        assert_eq!(db.count_users().unwrap(), 1);
        let stored = db.get_user_by_email("john.doe@example.com").unwrap().unwrap();
        assert_eq!(stored.fullname, "John Doe");
        assert_eq!(stored.password, "hash-1");
    }

    #[test]
    fn duplicate_id_is_not_reported_as_email_taken() {
        let db = db();
        db.create_user("id-1", "John Doe", "john@example.com", "h").unwrap();

        let err = db
            .create_user("id-1", "Jane Doe", "jane@example.com", "h")
            .unwrap_err();
        assert!(matches!(err, DbError::Sqlite(_)));
    }

    #[test]
    fn missing_after_insert_names_the_user() {
        let err = DbError::MissingAfterInsert("id-9".into());
        assert_eq!(err.to_string(), "user id-9 missing right after insert");
        assert!(!matches!(err, DbError::Sqlite(_)));
    }
}

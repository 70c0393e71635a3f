//! User repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `users` storage.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Write paths call `UserDraft::validate()` before SQL mutations.
//! - Listing is deterministic: `name ASC, id ASC`.

use crate::model::id::RecordId;
use crate::model::user::{User, UserDraft};
use crate::model::EntityKind;
use crate::repo::{ensure_connection_ready, parse_id_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const USER_SELECT_SQL: &str = "SELECT id, name, email, created_at, updated_at FROM users";

const USER_COLUMNS: &[&str] = &["id", "name", "email", "created_at", "updated_at"];

/// Repository interface for user CRUD operations.
pub trait UserRepository {
    /// Persists a validated draft and returns the stored record.
    fn create_user(&self, draft: &UserDraft) -> RepoResult<User>;
    /// Gets one user by id.
    fn get_user(&self, id: &RecordId) -> RepoResult<Option<User>>;
    /// Lists all users ordered by name.
    fn list_users(&self) -> RepoResult<Vec<User>>;
    /// Overwrites the mutable fields of an existing user.
    fn update_user(&self, id: &RecordId, draft: &UserDraft) -> RepoResult<User>;
    /// Removes one user and returns the removed record.
    fn delete_user(&self, id: &RecordId) -> RepoResult<User>;
    /// Counts stored users.
    fn count_users(&self) -> RepoResult<u64>;
    /// Removes every user and returns the removed count.
    fn delete_all_users(&self) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "users", USER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn create_user(&self, draft: &UserDraft) -> RepoResult<User> {
        draft.validate()?;

        let id = RecordId::generate();
        self.conn.execute(
            "INSERT INTO users (id, name, email, created_at, updated_at)
             VALUES (?1, ?2, ?3, strftime('%s', 'now') * 1000, strftime('%s', 'now') * 1000);",
            params![id.as_str(), draft.name, draft.email],
        )?;

        self.get_user(&id)?
            .ok_or_else(|| RepoError::InvalidData("created user row is not readable".to_string()))
    }

    fn get_user(&self, id: &RecordId) -> RepoResult<Option<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_user_row(row)?));
        }

        Ok(None)
    }

    fn list_users(&self) -> RepoResult<Vec<User>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{USER_SELECT_SQL} ORDER BY name ASC, id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut users = Vec::new();
        while let Some(row) = rows.next()? {
            users.push(parse_user_row(row)?);
        }

        Ok(users)
    }

    fn update_user(&self, id: &RecordId, draft: &UserDraft) -> RepoResult<User> {
        draft.validate()?;

        let changed = self.conn.execute(
            "UPDATE users
             SET
                name = ?1,
                email = ?2,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?3;",
            params![draft.name, draft.email, id.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id: id.clone(),
            });
        }

        self.get_user(id)?
            .ok_or_else(|| RepoError::InvalidData("updated user row is not readable".to_string()))
    }

    fn delete_user(&self, id: &RecordId) -> RepoResult<User> {
        let Some(user) = self.get_user(id)? else {
            return Err(RepoError::NotFound {
                entity: EntityKind::User,
                id: id.clone(),
            });
        };

        self.conn
            .execute("DELETE FROM users WHERE id = ?1;", [id.as_str()])?;

        Ok(user)
    }

    fn count_users(&self) -> RepoResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn delete_all_users(&self) -> RepoResult<u64> {
        let removed = self.conn.execute("DELETE FROM users;", [])?;
        Ok(removed as u64)
    }
}

fn parse_user_row(row: &Row<'_>) -> RepoResult<User> {
    Ok(User {
        id: parse_id_column(row, "id")?,
        name: row.get("name")?,
        email: row.get("email")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

//! Comment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `comments` storage.
//! - Expose the id projections used for dependents checks.
//!
//! # Invariants
//! - Write paths call `CommentDraft::validate()` and re-check reference
//!   id shapes before SQL mutations.
//! - Listing is deterministic: `text ASC, id ASC`.

use crate::model::comment::{Comment, CommentDraft};
use crate::model::id::RecordId;
use crate::model::EntityKind;
use crate::repo::{ensure_connection_ready, parse_id_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const COMMENT_SELECT_SQL: &str =
    "SELECT id, post_id, user_id, text, created_at, updated_at FROM comments";

const COMMENT_COLUMNS: &[&str] = &[
    "id",
    "post_id",
    "user_id",
    "text",
    "created_at",
    "updated_at",
];

/// Repository interface for comment CRUD operations.
pub trait CommentRepository {
    /// Persists a validated draft and returns the stored record.
    fn create_comment(&self, draft: &CommentDraft) -> RepoResult<Comment>;
    /// Gets one comment by id.
    fn get_comment(&self, id: &RecordId) -> RepoResult<Option<Comment>>;
    /// Lists all comments ordered by text.
    fn list_comments(&self) -> RepoResult<Vec<Comment>>;
    /// Overwrites the fields of an existing comment.
    fn update_comment(&self, id: &RecordId, draft: &CommentDraft) -> RepoResult<Comment>;
    /// Removes one comment and returns the removed record.
    fn delete_comment(&self, id: &RecordId) -> RepoResult<Comment>;
    /// Ids of comments under the given post, for dependents checks.
    fn comment_ids_by_post(&self, post_id: &RecordId) -> RepoResult<Vec<RecordId>>;
    /// Ids of comments written by the given user, for dependents checks.
    fn comment_ids_by_user(&self, user_id: &RecordId) -> RepoResult<Vec<RecordId>>;
    /// Counts stored comments.
    fn count_comments(&self) -> RepoResult<u64>;
    /// Removes every comment and returns the removed count.
    fn delete_all_comments(&self) -> RepoResult<u64>;
}

/// SQLite-backed comment repository.
pub struct SqliteCommentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCommentRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "comments", COMMENT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl CommentRepository for SqliteCommentRepository<'_> {
    fn create_comment(&self, draft: &CommentDraft) -> RepoResult<Comment> {
        draft.validate()?;
        let post_id = RecordId::parse(&draft.post_id)?;
        let user_id = RecordId::parse(&draft.user_id)?;

        let id = RecordId::generate();
        self.conn.execute(
            "INSERT INTO comments (id, post_id, user_id, text, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, strftime('%s', 'now') * 1000, strftime('%s', 'now') * 1000);",
            params![id.as_str(), post_id.as_str(), user_id.as_str(), draft.text],
        )?;

        self.get_comment(&id)?.ok_or_else(|| {
            RepoError::InvalidData("created comment row is not readable".to_string())
        })
    }

    fn get_comment(&self, id: &RecordId) -> RepoResult<Option<Comment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMMENT_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_comment_row(row)?));
        }

        Ok(None)
    }

    fn list_comments(&self) -> RepoResult<Vec<Comment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COMMENT_SELECT_SQL} ORDER BY text ASC, id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut comments = Vec::new();
        while let Some(row) = rows.next()? {
            comments.push(parse_comment_row(row)?);
        }

        Ok(comments)
    }

    fn update_comment(&self, id: &RecordId, draft: &CommentDraft) -> RepoResult<Comment> {
        draft.validate()?;
        let post_id = RecordId::parse(&draft.post_id)?;
        let user_id = RecordId::parse(&draft.user_id)?;

        let changed = self.conn.execute(
            "UPDATE comments
             SET
                post_id = ?1,
                user_id = ?2,
                text = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![post_id.as_str(), user_id.as_str(), draft.text, id.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Comment,
                id: id.clone(),
            });
        }

        self.get_comment(id)?.ok_or_else(|| {
            RepoError::InvalidData("updated comment row is not readable".to_string())
        })
    }

    fn delete_comment(&self, id: &RecordId) -> RepoResult<Comment> {
        let Some(comment) = self.get_comment(id)? else {
            return Err(RepoError::NotFound {
                entity: EntityKind::Comment,
                id: id.clone(),
            });
        };

        self.conn
            .execute("DELETE FROM comments WHERE id = ?1;", [id.as_str()])?;

        Ok(comment)
    }

    fn comment_ids_by_post(&self, post_id: &RecordId) -> RepoResult<Vec<RecordId>> {
        id_projection(
            self.conn,
            "SELECT id FROM comments WHERE post_id = ?1 ORDER BY id ASC;",
            post_id,
        )
    }

    fn comment_ids_by_user(&self, user_id: &RecordId) -> RepoResult<Vec<RecordId>> {
        id_projection(
            self.conn,
            "SELECT id FROM comments WHERE user_id = ?1 ORDER BY id ASC;",
            user_id,
        )
    }

    fn count_comments(&self) -> RepoResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM comments;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn delete_all_comments(&self) -> RepoResult<u64> {
        let removed = self.conn.execute("DELETE FROM comments;", [])?;
        Ok(removed as u64)
    }
}

fn id_projection(conn: &Connection, sql: &str, key: &RecordId) -> RepoResult<Vec<RecordId>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query([key.as_str()])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        ids.push(parse_id_column(row, "id")?);
    }
    Ok(ids)
}

fn parse_comment_row(row: &Row<'_>) -> RepoResult<Comment> {
    Ok(Comment {
        id: parse_id_column(row, "id")?,
        post_id: parse_id_column(row, "post_id")?,
        user_id: parse_id_column(row, "user_id")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

//! Post repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable CRUD APIs over `posts` storage.
//! - Expose the id projection used for dependents checks.
//!
//! # Invariants
//! - Write paths call `PostDraft::validate()` and re-check the reference
//!   id shape before SQL mutations.
//! - Listing is deterministic: `title ASC, id ASC`.

use crate::model::id::RecordId;
use crate::model::post::{Post, PostDraft};
use crate::model::EntityKind;
use crate::repo::{ensure_connection_ready, parse_id_column, RepoError, RepoResult};
use rusqlite::{params, Connection, Row};

const POST_SELECT_SQL: &str =
    "SELECT id, user_id, title, text, created_at, updated_at FROM posts";

const POST_COLUMNS: &[&str] = &["id", "user_id", "title", "text", "created_at", "updated_at"];

/// Repository interface for post CRUD operations.
pub trait PostRepository {
    /// Persists a validated draft and returns the stored record.
    fn create_post(&self, draft: &PostDraft) -> RepoResult<Post>;
    /// Gets one post by id.
    fn get_post(&self, id: &RecordId) -> RepoResult<Option<Post>>;
    /// Lists all posts ordered by title.
    fn list_posts(&self) -> RepoResult<Vec<Post>>;
    /// Overwrites the fields of an existing post.
    fn update_post(&self, id: &RecordId, draft: &PostDraft) -> RepoResult<Post>;
    /// Removes one post and returns the removed record.
    fn delete_post(&self, id: &RecordId) -> RepoResult<Post>;
    /// Ids of posts owned by the given user, for dependents checks.
    fn post_ids_by_user(&self, user_id: &RecordId) -> RepoResult<Vec<RecordId>>;
    /// Counts stored posts.
    fn count_posts(&self) -> RepoResult<u64>;
    /// Removes every post and returns the removed count.
    fn delete_all_posts(&self) -> RepoResult<u64>;
}

/// SQLite-backed post repository.
pub struct SqlitePostRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePostRepository<'conn> {
    /// Constructs a repository from a migrated, ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "posts", POST_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl PostRepository for SqlitePostRepository<'_> {
    fn create_post(&self, draft: &PostDraft) -> RepoResult<Post> {
        draft.validate()?;
        let user_id = RecordId::parse(&draft.user_id)?;

        let id = RecordId::generate();
        self.conn.execute(
            "INSERT INTO posts (id, user_id, title, text, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, strftime('%s', 'now') * 1000, strftime('%s', 'now') * 1000);",
            params![id.as_str(), user_id.as_str(), draft.title, draft.text],
        )?;

        self.get_post(&id)?
            .ok_or_else(|| RepoError::InvalidData("created post row is not readable".to_string()))
    }

    fn get_post(&self, id: &RecordId) -> RepoResult<Option<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_post_row(row)?));
        }

        Ok(None)
    }

    fn list_posts(&self) -> RepoResult<Vec<Post>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{POST_SELECT_SQL} ORDER BY title ASC, id ASC;"))?;

        let mut rows = stmt.query([])?;
        let mut posts = Vec::new();
        while let Some(row) = rows.next()? {
            posts.push(parse_post_row(row)?);
        }

        Ok(posts)
    }

    fn update_post(&self, id: &RecordId, draft: &PostDraft) -> RepoResult<Post> {
        draft.validate()?;
        let user_id = RecordId::parse(&draft.user_id)?;

        let changed = self.conn.execute(
            "UPDATE posts
             SET
                user_id = ?1,
                title = ?2,
                text = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE id = ?4;",
            params![user_id.as_str(), draft.title, draft.text, id.as_str()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Post,
                id: id.clone(),
            });
        }

        self.get_post(id)?
            .ok_or_else(|| RepoError::InvalidData("updated post row is not readable".to_string()))
    }

    fn delete_post(&self, id: &RecordId) -> RepoResult<Post> {
        let Some(post) = self.get_post(id)? else {
            return Err(RepoError::NotFound {
                entity: EntityKind::Post,
                id: id.clone(),
            });
        };

        self.conn
            .execute("DELETE FROM posts WHERE id = ?1;", [id.as_str()])?;

        Ok(post)
    }

    fn post_ids_by_user(&self, user_id: &RecordId) -> RepoResult<Vec<RecordId>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id FROM posts WHERE user_id = ?1 ORDER BY id ASC;")?;

        let mut rows = stmt.query([user_id.as_str()])?;
        let mut ids = Vec::new();
        while let Some(row) = rows.next()? {
            ids.push(parse_id_column(row, "id")?);
        }

        Ok(ids)
    }

    fn count_posts(&self) -> RepoResult<u64> {
        let count: u64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM posts;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn delete_all_posts(&self) -> RepoResult<u64> {
        let removed = self.conn.execute("DELETE FROM posts;", [])?;
        Ok(removed as u64)
    }
}

fn parse_post_row(row: &Row<'_>) -> RepoResult<Post> {
    Ok(Post {
        id: parse_id_column(row, "id")?,
        user_id: parse_id_column(row, "user_id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

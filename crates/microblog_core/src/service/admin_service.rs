//! Administrative composite operations.
//!
//! # Responsibility
//! - Report per-entity record counts.
//! - Wipe every record of every type, bypassing the integrity guard.
//!
//! # Invariants
//! - Per-entity store calls are independent: a failure in one never
//!   suppresses the outcomes of the others.
//! - The wipe removes comments, then posts, then users, so foreign keys
//!   hold at every step.

use crate::repo::{CommentRepository, PostRepository, RepoResult, UserRepository};
use log::info;
use serde::Serialize;

/// Per-entity record counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityCounts {
    pub users: u64,
    pub posts: u64,
    pub comments: u64,
}

/// One outcome per entity type; every call is attempted.
#[derive(Debug)]
pub struct BulkReport {
    pub users: RepoResult<u64>,
    pub posts: RepoResult<u64>,
    pub comments: RepoResult<u64>,
}

impl BulkReport {
    /// Whether all three per-entity calls succeeded.
    pub fn all_ok(&self) -> bool {
        self.users.is_ok() && self.posts.is_ok() && self.comments.is_ok()
    }

    /// Collapses the report into counts when every call succeeded.
    pub fn counts(&self) -> Option<EntityCounts> {
        match (&self.users, &self.posts, &self.comments) {
            (Ok(users), Ok(posts), Ok(comments)) => Some(EntityCounts {
                users: *users,
                posts: *posts,
                comments: *comments,
            }),
            _ => None,
        }
    }
}

/// Orchestrator for the admin count/wipe endpoints.
pub struct AdminService<U, P, C> {
    users: U,
    posts: P,
    comments: C,
}

impl<U, P, C> AdminService<U, P, C>
where
    U: UserRepository,
    P: PostRepository,
    C: CommentRepository,
{
    pub fn new(users: U, posts: P, comments: C) -> Self {
        Self {
            users,
            posts,
            comments,
        }
    }

    /// Counts records of every type, reporting each outcome.
    pub fn count_all(&self) -> BulkReport {
        BulkReport {
            users: self.users.count_users(),
            posts: self.posts.count_posts(),
            comments: self.comments.count_comments(),
        }
    }

    /// Unconditionally removes every record of every type.
    ///
    /// This is the administrative override: no dependents check runs.
    pub fn wipe_all(&self) -> BulkReport {
        let comments = self.comments.delete_all_comments();
        let posts = self.posts.delete_all_posts();
        let users = self.users.delete_all_users();

        info!(
            "event=admin_wipe module=service status={} users={} posts={} comments={}",
            if users.is_ok() && posts.is_ok() && comments.is_ok() {
                "ok"
            } else {
                "partial"
            },
            users.as_ref().map_or(0, |count| *count),
            posts.as_ref().map_or(0, |count| *count),
            comments.as_ref().map_or(0, |count| *count),
        );

        BulkReport {
            users,
            posts,
            comments,
        }
    }
}

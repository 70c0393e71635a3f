//! Referential integrity guard.
//!
//! # Responsibility
//! - Compute the dependent children of a user or post.
//! - Word the refusal message for blocked deletions.
//!
//! # Invariants
//! - Dependents are read from the same connection the delete will use,
//!   but check-then-delete is not atomic across records: a child created
//!   between the check and the delete is an accepted race.
//! - Comments have no dependents and are never blocked.

use crate::model::id::RecordId;
use crate::model::EntityKind;
use crate::repo::{CommentRepository, PostRepository, RepoResult};
use serde::Serialize;

/// Child record ids that reference a parent, partitioned by type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dependents {
    pub posts_id: Vec<RecordId>,
    pub comments_id: Vec<RecordId>,
}

impl Dependents {
    /// Whether deletion of the parent may proceed.
    pub fn is_empty(&self) -> bool {
        self.posts_id.is_empty() && self.comments_id.is_empty()
    }

    /// Refusal message naming only the dependent types actually present.
    pub fn blocking_message(&self, parent: EntityKind) -> String {
        let parent = parent.as_str();
        let kinds = match (!self.posts_id.is_empty(), !self.comments_id.is_empty()) {
            (true, true) => "posts and comments",
            (true, false) => "posts",
            _ => "comments",
        };
        format!("All {kinds} associated with {parent} must be deleted prior to deleting {parent}.")
    }
}

/// Dependents of a user: their posts plus their comments.
pub fn user_dependents(
    posts: &impl PostRepository,
    comments: &impl CommentRepository,
    id: &RecordId,
) -> RepoResult<Dependents> {
    Ok(Dependents {
        posts_id: posts.post_ids_by_user(id)?,
        comments_id: comments.comment_ids_by_user(id)?,
    })
}

/// Dependents of a post: the comments under it.
pub fn post_dependents(
    comments: &impl CommentRepository,
    id: &RecordId,
) -> RepoResult<Dependents> {
    Ok(Dependents {
        posts_id: Vec::new(),
        comments_id: comments.comment_ids_by_post(id)?,
    })
}

#[cfg(test)]
mod tests {
    use super::Dependents;
    use crate::model::id::RecordId;
    use crate::model::EntityKind;

    fn id(n: u8) -> RecordId {
        RecordId::parse(&format!("{n:024x}")).unwrap()
    }

    #[test]
    fn empty_dependents_allow_deletion() {
        assert!(Dependents::default().is_empty());
    }

    #[test]
    fn message_names_only_present_dependent_types() {
        let both = Dependents {
            posts_id: vec![id(1)],
            comments_id: vec![id(2)],
        };
        assert_eq!(
            both.blocking_message(EntityKind::User),
            "All posts and comments associated with user must be deleted prior to deleting user."
        );

        let posts_only = Dependents {
            posts_id: vec![id(1)],
            comments_id: Vec::new(),
        };
        assert_eq!(
            posts_only.blocking_message(EntityKind::User),
            "All posts associated with user must be deleted prior to deleting user."
        );

        let comments_only = Dependents {
            posts_id: Vec::new(),
            comments_id: vec![id(2)],
        };
        assert_eq!(
            comments_only.blocking_message(EntityKind::Post),
            "All comments associated with post must be deleted prior to deleting post."
        );
    }
}

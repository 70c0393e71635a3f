//! Comment use-case service.
//!
//! # Responsibility
//! - Provide list/detail/create/update/delete entry points for comments.
//! - Enforce the owning post/user references on create and their
//!   immutability on update.
//!
//! # Invariants
//! - Comments have no dependents; deletion always proceeds once found.

use crate::model::comment::{Comment, CommentDraft, COMMENT_CREATE_RULES, COMMENT_PATCH_RULES};
use crate::model::id::RecordId;
use crate::model::EntityKind;
use crate::repo::{CommentRepository, PostRepository, UserRepository};
use crate::service::{MutationOutcome, RemovalOutcome, ServiceError, ServiceResult};
use crate::validate::{run_chains, PipelineOutput, RawFields};
use log::info;

/// Orchestrator for comment mutations.
pub struct CommentService<C, P, U> {
    comments: C,
    posts: P,
    users: U,
}

impl<C, P, U> CommentService<C, P, U>
where
    C: CommentRepository,
    P: PostRepository,
    U: UserRepository,
{
    pub fn new(comments: C, posts: P, users: U) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    /// All comments, ordered by text.
    pub fn list(&self) -> ServiceResult<Vec<Comment>> {
        Ok(self.comments.list_comments()?)
    }

    /// One comment; comments carry no dependent arrays.
    pub fn detail(&self, id: &str) -> ServiceResult<Comment> {
        let id = RecordId::parse(id)?;
        let Some(comment) = self.comments.get_comment(&id)? else {
            return Err(ServiceError::NotFound {
                entity: EntityKind::Comment,
                id,
            });
        };

        Ok(comment)
    }

    /// Validates, sanitizes and persists a new comment.
    ///
    /// Both referenced records must exist; misses are reported as field
    /// errors alongside any rule failures.
    pub fn create(
        &self,
        input: &RawFields,
    ) -> ServiceResult<MutationOutcome<Comment, CommentDraft>> {
        let mut output = run_chains(COMMENT_CREATE_RULES, input);

        self.check_post_reference(&mut output)?;
        self.check_user_reference(&mut output)?;

        let attempted = CommentDraft {
            post_id: output.value_or_empty("postId"),
            user_id: output.value_or_empty("userId"),
            text: output.value_or_empty("text"),
        };

        if !output.is_clean() {
            info!(
                "event=comment_create module=service status=rejected errors={}",
                output.errors().len()
            );
            return Ok(MutationOutcome::Rejected {
                attempted,
                errors: output.into_errors(),
            });
        }

        let comment = self.comments.create_comment(&attempted)?;
        info!(
            "event=comment_create module=service status=ok id={}",
            comment.id
        );
        Ok(MutationOutcome::Applied(comment))
    }

    /// Merges a patch over the stored comment and persists the result.
    ///
    /// `postId` and `userId` are always forced to the stored values
    /// regardless of patch content.
    pub fn update(
        &self,
        id: &str,
        input: &RawFields,
    ) -> ServiceResult<MutationOutcome<Comment, CommentDraft>> {
        let id = RecordId::parse(id)?;
        let Some(existing) = self.comments.get_comment(&id)? else {
            return Err(ServiceError::NotFound {
                entity: EntityKind::Comment,
                id,
            });
        };

        let output = run_chains(COMMENT_PATCH_RULES, input);
        let attempted = CommentDraft {
            post_id: existing.post_id.as_str().to_string(),
            user_id: existing.user_id.as_str().to_string(),
            text: output.value("text").map_or(existing.text, str::to_string),
        };

        if !output.is_clean() {
            info!(
                "event=comment_update module=service status=rejected id={id} errors={}",
                output.errors().len()
            );
            return Ok(MutationOutcome::Rejected {
                attempted,
                errors: output.into_errors(),
            });
        }

        let comment = self.comments.update_comment(&id, &attempted)?;
        info!("event=comment_update module=service status=ok id={id}");
        Ok(MutationOutcome::Applied(comment))
    }

    /// Deletes a comment; comments are always deletable once found.
    pub fn delete(&self, id: &str) -> ServiceResult<RemovalOutcome<Comment>> {
        let id = RecordId::parse(id)?;
        let removed = self.comments.delete_comment(&id)?;
        info!("event=comment_delete module=service status=ok id={id}");
        Ok(RemovalOutcome::Removed(removed))
    }

    fn check_post_reference(&self, output: &mut PipelineOutput) -> ServiceResult<()> {
        if output.errors().iter().any(|error| error.field == "postId") {
            return Ok(());
        }
        if let Some(value) = output.value("postId") {
            if let Ok(post_id) = RecordId::parse(value) {
                if self.posts.get_post(&post_id)?.is_none() {
                    output.push_error("postId", "postId does not reference an existing post.");
                }
            }
        }
        Ok(())
    }

    fn check_user_reference(&self, output: &mut PipelineOutput) -> ServiceResult<()> {
        if output.errors().iter().any(|error| error.field == "userId") {
            return Ok(());
        }
        if let Some(value) = output.value("userId") {
            if let Ok(user_id) = RecordId::parse(value) {
                if self.users.get_user(&user_id)?.is_none() {
                    output.push_error("userId", "userId does not reference an existing user.");
                }
            }
        }
        Ok(())
    }
}

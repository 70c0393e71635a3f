//! Post use-case service.
//!
//! # Responsibility
//! - Provide list/detail/create/update/delete entry points for posts.
//! - Enforce the owning-user reference on create and its immutability on
//!   update.
//! - Enforce cascade-delete protection against dependent comments.

use crate::guard;
use crate::model::id::RecordId;
use crate::model::post::{Post, PostDraft, POST_CREATE_RULES, POST_PATCH_RULES};
use crate::model::EntityKind;
use crate::repo::{CommentRepository, PostRepository, UserRepository};
use crate::service::{MutationOutcome, RemovalOutcome, ServiceError, ServiceResult};
use crate::validate::{run_chains, RawFields};
use log::{info, warn};
use serde::Serialize;

/// Detail read model: the post plus the ids of its comments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments_id: Vec<RecordId>,
}

/// Orchestrator for post mutations.
pub struct PostService<P, U, C> {
    posts: P,
    users: U,
    comments: C,
}

impl<P, U, C> PostService<P, U, C>
where
    P: PostRepository,
    U: UserRepository,
    C: CommentRepository,
{
    pub fn new(posts: P, users: U, comments: C) -> Self {
        Self {
            posts,
            users,
            comments,
        }
    }

    /// All posts, ordered by title.
    pub fn list(&self) -> ServiceResult<Vec<Post>> {
        Ok(self.posts.list_posts()?)
    }

    /// One post with the ids of its comments folded in.
    pub fn detail(&self, id: &str) -> ServiceResult<PostDetail> {
        let id = RecordId::parse(id)?;
        let Some(post) = self.posts.get_post(&id)? else {
            return Err(ServiceError::NotFound {
                entity: EntityKind::Post,
                id,
            });
        };

        Ok(PostDetail {
            post,
            comments_id: self.comments.comment_ids_by_post(&id)?,
        })
    }

    /// Validates, sanitizes and persists a new post.
    ///
    /// The owning user must exist; a miss is reported as a `userId` field
    /// error alongside any rule failures.
    pub fn create(&self, input: &RawFields) -> ServiceResult<MutationOutcome<Post, PostDraft>> {
        let mut output = run_chains(POST_CREATE_RULES, input);

        if output.errors().iter().all(|error| error.field != "userId") {
            if let Some(value) = output.value("userId") {
                if let Ok(user_id) = RecordId::parse(value) {
                    if self.users.get_user(&user_id)?.is_none() {
                        output.push_error("userId", "userId does not reference an existing user.");
                    }
                }
            }
        }

        let attempted = PostDraft {
            user_id: output.value_or_empty("userId"),
            title: output.value_or_empty("title"),
            text: output.value_or_empty("text"),
        };

        if !output.is_clean() {
            info!(
                "event=post_create module=service status=rejected errors={}",
                output.errors().len()
            );
            return Ok(MutationOutcome::Rejected {
                attempted,
                errors: output.into_errors(),
            });
        }

        let post = self.posts.create_post(&attempted)?;
        info!("event=post_create module=service status=ok id={}", post.id);
        Ok(MutationOutcome::Applied(post))
    }

    /// Merges a patch over the stored post and persists the result.
    ///
    /// `userId` is always forced to the stored value regardless of patch
    /// content; a post cannot be reassigned to another user.
    pub fn update(
        &self,
        id: &str,
        input: &RawFields,
    ) -> ServiceResult<MutationOutcome<Post, PostDraft>> {
        let id = RecordId::parse(id)?;
        let Some(existing) = self.posts.get_post(&id)? else {
            return Err(ServiceError::NotFound {
                entity: EntityKind::Post,
                id,
            });
        };

        let output = run_chains(POST_PATCH_RULES, input);
        let attempted = PostDraft {
            user_id: existing.user_id.as_str().to_string(),
            title: output
                .value("title")
                .map_or(existing.title, str::to_string),
            text: output.value("text").map_or(existing.text, str::to_string),
        };

        if !output.is_clean() {
            info!(
                "event=post_update module=service status=rejected id={id} errors={}",
                output.errors().len()
            );
            return Ok(MutationOutcome::Rejected {
                attempted,
                errors: output.into_errors(),
            });
        }

        let post = self.posts.update_post(&id, &attempted)?;
        info!("event=post_update module=service status=ok id={id}");
        Ok(MutationOutcome::Applied(post))
    }

    /// Deletes a post unless dependent comments remain.
    pub fn delete(&self, id: &str) -> ServiceResult<RemovalOutcome<Post>> {
        let id = RecordId::parse(id)?;
        let Some(post) = self.posts.get_post(&id)? else {
            return Err(ServiceError::NotFound {
                entity: EntityKind::Post,
                id,
            });
        };

        let dependents = guard::post_dependents(&self.comments, &id)?;
        if !dependents.is_empty() {
            warn!(
                "event=post_delete module=service status=blocked id={id} comments={}",
                dependents.comments_id.len()
            );
            let message = dependents.blocking_message(EntityKind::Post);
            return Ok(RemovalOutcome::Blocked {
                record: post,
                dependents,
                message,
            });
        }

        let removed = self.posts.delete_post(&id)?;
        info!("event=post_delete module=service status=ok id={id}");
        Ok(RemovalOutcome::Removed(removed))
    }
}

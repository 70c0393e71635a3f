//! User use-case service.
//!
//! # Responsibility
//! - Provide list/detail/create/update/delete entry points for users.
//! - Enforce cascade-delete protection against dependent posts/comments.
//!
//! # Invariants
//! - Every operation re-reads from the store; nothing is cached.
//! - Update merges with fallback: absent or empty patch fields keep the
//!   stored values.

use crate::guard;
use crate::model::id::RecordId;
use crate::model::user::{User, UserDraft, USER_CREATE_RULES, USER_PATCH_RULES};
use crate::model::EntityKind;
use crate::repo::{CommentRepository, PostRepository, UserRepository};
use crate::service::{MutationOutcome, RemovalOutcome, ServiceError, ServiceResult};
use crate::validate::{run_chains, RawFields};
use log::{info, warn};
use serde::Serialize;

/// Detail read model: the user plus the ids of its dependents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    pub user: User,
    pub posts_id: Vec<RecordId>,
    pub comments_id: Vec<RecordId>,
}

/// Orchestrator for user mutations.
pub struct UserService<U, P, C> {
    users: U,
    posts: P,
    comments: C,
}

impl<U, P, C> UserService<U, P, C>
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

    /// All users, ordered by name.
    pub fn list(&self) -> ServiceResult<Vec<User>> {
        Ok(self.users.list_users()?)
    }

    /// One user with the ids of its posts and comments folded in.
    pub fn detail(&self, id: &str) -> ServiceResult<UserDetail> {
        let id = RecordId::parse(id)?;
        let Some(user) = self.users.get_user(&id)? else {
            return Err(ServiceError::NotFound {
                entity: EntityKind::User,
                id,
            });
        };

        Ok(UserDetail {
            user,
            posts_id: self.posts.post_ids_by_user(&id)?,
            comments_id: self.comments.comment_ids_by_user(&id)?,
        })
    }

    /// Validates, sanitizes and persists a new user.
    pub fn create(&self, input: &RawFields) -> ServiceResult<MutationOutcome<User, UserDraft>> {
        let output = run_chains(USER_CREATE_RULES, input);
        let attempted = UserDraft {
            name: output.value_or_empty("name"),
            email: output.value_or_empty("email"),
        };

        if !output.is_clean() {
            info!(
                "event=user_create module=service status=rejected errors={}",
                output.errors().len()
            );
            return Ok(MutationOutcome::Rejected {
                attempted,
                errors: output.into_errors(),
            });
        }

        let user = self.users.create_user(&attempted)?;
        info!("event=user_create module=service status=ok id={}", user.id);
        Ok(MutationOutcome::Applied(user))
    }

    /// Merges a patch over the stored user and persists the result.
    pub fn update(
        &self,
        id: &str,
        input: &RawFields,
    ) -> ServiceResult<MutationOutcome<User, UserDraft>> {
        let id = RecordId::parse(id)?;
        let Some(existing) = self.users.get_user(&id)? else {
            return Err(ServiceError::NotFound {
                entity: EntityKind::User,
                id,
            });
        };

        let output = run_chains(USER_PATCH_RULES, input);
        let attempted = UserDraft {
            name: output
                .value("name")
                .map_or(existing.name, str::to_string),
            email: output
                .value("email")
                .map_or(existing.email, str::to_string),
        };

        if !output.is_clean() {
            info!(
                "event=user_update module=service status=rejected id={id} errors={}",
                output.errors().len()
            );
            return Ok(MutationOutcome::Rejected {
                attempted,
                errors: output.into_errors(),
            });
        }

        let user = self.users.update_user(&id, &attempted)?;
        info!("event=user_update module=service status=ok id={id}");
        Ok(MutationOutcome::Applied(user))
    }

    /// Deletes a user unless dependent posts or comments remain.
    pub fn delete(&self, id: &str) -> ServiceResult<RemovalOutcome<User>> {
        let id = RecordId::parse(id)?;
        let Some(user) = self.users.get_user(&id)? else {
            return Err(ServiceError::NotFound {
                entity: EntityKind::User,
                id,
            });
        };

        let dependents = guard::user_dependents(&self.posts, &self.comments, &id)?;
        if !dependents.is_empty() {
            warn!(
                "event=user_delete module=service status=blocked id={id} posts={} comments={}",
                dependents.posts_id.len(),
                dependents.comments_id.len()
            );
            let message = dependents.blocking_message(EntityKind::User);
            return Ok(RemovalOutcome::Blocked {
                record: user,
                dependents,
                message,
            });
        }

        let removed = self.users.delete_user(&id)?;
        info!("event=user_delete module=service status=ok id={id}");
        Ok(RemovalOutcome::Removed(removed))
    }
}

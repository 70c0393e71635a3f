//! Integrity-checked mutation engine for users, posts and comments.
//! This crate is the single source of truth for validation, sanitization
//! and referential-integrity rules; transport layers stay thin.

pub mod db;
pub mod guard;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validate;

pub use guard::Dependents;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::comment::{Comment, CommentDraft};
pub use model::id::{InvalidRecordId, RecordId, RECORD_ID_LEN};
pub use model::post::{Post, PostDraft};
pub use model::user::{User, UserDraft};
pub use model::{EntityKind, ModelValidationError};
pub use repo::{
    CommentRepository, PostRepository, RepoError, RepoResult, SqliteCommentRepository,
    SqlitePostRepository, SqliteUserRepository, UserRepository,
};
pub use service::{
    AdminService, BulkReport, CommentService, EntityCounts, MutationOutcome, PostDetail,
    PostService, RemovalOutcome, ServiceError, ServiceResult, UserDetail, UserService,
};
pub use validate::{FieldError, RawFields};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}

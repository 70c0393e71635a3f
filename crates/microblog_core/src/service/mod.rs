//! Mutation engine services.
//!
//! # Responsibility
//! - Compose pipeline, repositories and integrity guard into the
//!   create/update/delete contracts exposed to callers.
//! - Keep transport layers decoupled from storage details.
//!
//! # Invariants
//! - Raw ids are parsed before any store access; malformed ids never
//!   reach a repository.
//! - Validation failures and blocked deletions are typed outcomes, not
//!   faults; only store failures surface as errors callers cannot branch
//!   on semantically.

use crate::guard::Dependents;
use crate::model::id::{InvalidRecordId, RecordId};
use crate::model::EntityKind;
use crate::repo::RepoError;
use crate::validate::FieldError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod admin_service;
pub mod comment_service;
pub mod post_service;
pub mod user_service;

pub use admin_service::{AdminService, BulkReport, EntityCounts};
pub use comment_service::CommentService;
pub use post_service::{PostDetail, PostService};
pub use user_service::{UserDetail, UserService};

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for orchestrated operations.
#[derive(Debug)]
pub enum ServiceError {
    /// The raw id fails the syntactic check; nothing was looked up.
    InvalidId(String),
    /// Well-formed id absent from the store.
    NotFound { entity: EntityKind, id: RecordId },
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidId(raw) => write!(f, "invalid record id: `{raw}`"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            RepoError::MalformedId(raw) => Self::InvalidId(raw),
            other => Self::Repo(other),
        }
    }
}

impl From<InvalidRecordId> for ServiceError {
    fn from(value: InvalidRecordId) -> Self {
        Self::InvalidId(value.0)
    }
}

/// Outcome of a create or update call.
///
/// `Rejected` carries the best-effort sanitized draft so callers can echo
/// the attempted entity back; nothing was persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome<E, D> {
    Applied(E),
    Rejected {
        attempted: D,
        errors: Vec<FieldError>,
    },
}

impl<E, D> MutationOutcome<E, D> {
    /// The persisted record, when the mutation was applied.
    pub fn applied(self) -> Option<E> {
        match self {
            Self::Applied(record) => Some(record),
            Self::Rejected { .. } => None,
        }
    }

    /// The attempted draft and errors, when the mutation was rejected.
    pub fn rejected(self) -> Option<(D, Vec<FieldError>)> {
        match self {
            Self::Applied(_) => None,
            Self::Rejected { attempted, errors } => Some((attempted, errors)),
        }
    }
}

/// Outcome of a delete call.
///
/// `Blocked` carries the surviving record, its dependents partitioned by
/// type, and an explanatory message; nothing was deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemovalOutcome<E> {
    Removed(E),
    Blocked {
        record: E,
        dependents: Dependents,
        message: String,
    },
}

impl<E> RemovalOutcome<E> {
    /// The removed record, when deletion went through.
    pub fn removed(self) -> Option<E> {
        match self {
            Self::Removed(record) => Some(record),
            Self::Blocked { .. } => None,
        }
    }

    /// The refusal payload, when deletion was blocked.
    pub fn blocked(self) -> Option<(E, Dependents, String)> {
        match self {
            Self::Removed(_) => None,
            Self::Blocked {
                record,
                dependents,
                message,
            } => Some((record, dependents, message)),
        }
    }
}

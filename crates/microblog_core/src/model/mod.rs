//! Domain models for the blog store.
//!
//! # Responsibility
//! - Define the canonical read models persisted per entity.
//! - Define the draft (write) models produced by sanitization.
//! - Enforce schema-level constraints before any write reaches SQL.
//!
//! # Invariants
//! - Every record is identified by a stable 24-character hex `RecordId`.
//! - Reference fields (`Post::user_id`, `Comment::post_id`,
//!   `Comment::user_id`) never change after creation.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod comment;
pub mod id;
pub mod post;
pub mod user;

use serde::{Deserialize, Serialize};

/// The three entity types managed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Post,
    Comment,
}

impl EntityKind {
    /// Lowercase singular noun used in messages and log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Post => "post",
            Self::Comment => "comment",
        }
    }
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Schema-level constraint violation raised by `validate()` on a model.
///
/// These mirror the field rule chains and act as the last check before a
/// repository write; the pipeline normally rejects the same input earlier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// A required field is empty.
    EmptyField {
        entity: EntityKind,
        field: &'static str,
    },
    /// A field is shorter than its minimum length in characters.
    FieldTooShort {
        entity: EntityKind,
        field: &'static str,
        min: usize,
    },
    /// The email value does not match the address pattern.
    MalformedEmail { email: String },
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField { entity, field } => {
                write!(f, "{entity} field `{field}` must not be empty")
            }
            Self::FieldTooShort { entity, field, min } => {
                write!(
                    f,
                    "{entity} field `{field}` must be at least {min} characters long"
                )
            }
            Self::MalformedEmail { email } => write!(f, "malformed email address: `{email}`"),
        }
    }
}

impl Error for ModelValidationError {}

//! Post domain model.
//!
//! # Responsibility
//! - Define the persisted post shape and its sanitized draft.
//! - Declare the field rule chains applied by the pipeline.
//!
//! # Invariants
//! - `user_id` references an existing user and never changes after
//!   creation; patch chains therefore carry no `userId` entry.

use crate::model::id::{RecordId, RECORD_ID_LEN};
use crate::model::{EntityKind, ModelValidationError};
use crate::validate::{FieldChain, PatternKind, Rule};
use serde::{Deserialize, Serialize};

/// Persisted post record. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: RecordId,
    pub user_id: RecordId,
    pub title: String,
    pub text: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Sanitized post fields ready for persistence.
///
/// `user_id` stays a raw string here; the repository re-checks it as a
/// well-formed id before any SQL touches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostDraft {
    pub user_id: String,
    pub title: String,
    pub text: String,
}

impl PostDraft {
    /// Schema-level constraint check mirroring the rule chains.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.title.is_empty() {
            return Err(ModelValidationError::EmptyField {
                entity: EntityKind::Post,
                field: "title",
            });
        }
        if self.text.is_empty() {
            return Err(ModelValidationError::EmptyField {
                entity: EntityKind::Post,
                field: "text",
            });
        }
        Ok(())
    }
}

/// Chains applied when creating a post.
pub const POST_CREATE_RULES: &[FieldChain] = &[
    FieldChain {
        field: "userId",
        optional: false,
        rules: &[
            Rule::Required,
            Rule::ExactLength(RECORD_ID_LEN),
            Rule::Pattern(PatternKind::RecordIdHex),
        ],
    },
    FieldChain {
        field: "title",
        optional: false,
        rules: &[Rule::Required],
    },
    FieldChain {
        field: "text",
        optional: false,
        rules: &[Rule::Required],
    },
];

/// Chains applied when patching a post; `userId` is immutable and absent.
pub const POST_PATCH_RULES: &[FieldChain] = &[
    FieldChain {
        field: "title",
        optional: true,
        rules: &[],
    },
    FieldChain {
        field: "text",
        optional: true,
        rules: &[],
    },
];

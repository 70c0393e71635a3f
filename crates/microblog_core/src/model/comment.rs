//! Comment domain model.
//!
//! # Responsibility
//! - Define the persisted comment shape and its sanitized draft.
//! - Declare the field rule chains applied by the pipeline.
//!
//! # Invariants
//! - `post_id` and `user_id` reference existing records and never change
//!   after creation; patch chains carry only `text`.

use crate::model::id::{RecordId, RECORD_ID_LEN};
use crate::model::{EntityKind, ModelValidationError};
use crate::validate::{FieldChain, PatternKind, Rule};
use serde::{Deserialize, Serialize};

/// Minimum accepted comment length in characters.
pub const COMMENT_TEXT_MIN_LEN: usize = 3;

/// Persisted comment record. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: RecordId,
    pub post_id: RecordId,
    pub user_id: RecordId,
    pub text: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Sanitized comment fields ready for persistence.
///
/// Reference fields stay raw strings here; the repository re-checks them
/// as well-formed ids before any SQL touches them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentDraft {
    pub post_id: String,
    pub user_id: String,
    pub text: String,
}

impl CommentDraft {
    /// Schema-level constraint check mirroring the rule chains.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.text.is_empty() {
            return Err(ModelValidationError::EmptyField {
                entity: EntityKind::Comment,
                field: "text",
            });
        }
        Ok(())
    }
}

const REFERENCE_RULES: &[Rule] = &[
    Rule::Required,
    Rule::ExactLength(RECORD_ID_LEN),
    Rule::Pattern(PatternKind::RecordIdHex),
];

/// Chains applied when creating a comment.
pub const COMMENT_CREATE_RULES: &[FieldChain] = &[
    FieldChain {
        field: "postId",
        optional: false,
        rules: REFERENCE_RULES,
    },
    FieldChain {
        field: "userId",
        optional: false,
        rules: REFERENCE_RULES,
    },
    FieldChain {
        field: "text",
        optional: false,
        rules: &[Rule::Required, Rule::MinLength(COMMENT_TEXT_MIN_LEN)],
    },
];

/// Chains applied when patching a comment; references are immutable.
pub const COMMENT_PATCH_RULES: &[FieldChain] = &[FieldChain {
    field: "text",
    optional: true,
    rules: &[Rule::MinLength(COMMENT_TEXT_MIN_LEN)],
}];

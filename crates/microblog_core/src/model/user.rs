//! User domain model.
//!
//! # Responsibility
//! - Define the persisted user shape and its sanitized draft.
//! - Declare the field rule chains applied by the pipeline.
//!
//! # Invariants
//! - `name` is at least three characters; `email` matches the address
//!   pattern. Both are re-checked by `UserDraft::validate` before writes.

use crate::model::id::RecordId;
use crate::model::{EntityKind, ModelValidationError};
use crate::validate::{FieldChain, PatternKind, Rule};
use serde::{Deserialize, Serialize};

/// Minimum accepted display-name length in characters.
pub const USER_NAME_MIN_LEN: usize = 3;

/// Persisted user record. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: RecordId,
    pub name: String,
    pub email: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Sanitized user fields ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub name: String,
    pub email: String,
}

impl UserDraft {
    /// Schema-level constraint check mirroring the rule chains.
    pub fn validate(&self) -> Result<(), ModelValidationError> {
        if self.name.is_empty() {
            return Err(ModelValidationError::EmptyField {
                entity: EntityKind::User,
                field: "name",
            });
        }
        if self.name.chars().count() < USER_NAME_MIN_LEN {
            return Err(ModelValidationError::FieldTooShort {
                entity: EntityKind::User,
                field: "name",
                min: USER_NAME_MIN_LEN,
            });
        }
        if !PatternKind::Email.matches(&self.email) {
            return Err(ModelValidationError::MalformedEmail {
                email: self.email.clone(),
            });
        }
        Ok(())
    }
}

/// Chains applied when creating a user.
pub const USER_CREATE_RULES: &[FieldChain] = &[
    FieldChain {
        field: "name",
        optional: false,
        rules: &[Rule::Required, Rule::MinLength(USER_NAME_MIN_LEN)],
    },
    FieldChain {
        field: "email",
        optional: false,
        rules: &[Rule::Required, Rule::Pattern(PatternKind::Email)],
    },
];

/// Chains applied when patching a user; absent fields keep stored values.
pub const USER_PATCH_RULES: &[FieldChain] = &[
    FieldChain {
        field: "name",
        optional: true,
        rules: &[Rule::MinLength(USER_NAME_MIN_LEN)],
    },
    FieldChain {
        field: "email",
        optional: true,
        rules: &[Rule::Pattern(PatternKind::Email)],
    },
];

#[cfg(test)]
mod tests {
    use super::UserDraft;
    use crate::model::ModelValidationError;

    #[test]
    fn draft_validation_enforces_name_and_email() {
        let valid = UserDraft {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        assert!(valid.validate().is_ok());

        let short = UserDraft {
            name: "Jo".to_string(),
            email: "jo@example.com".to_string(),
        };
        assert!(matches!(
            short.validate(),
            Err(ModelValidationError::FieldTooShort { min: 3, .. })
        ));

        let bad_email = UserDraft {
            name: "Ada".to_string(),
            email: "not-an-email".to_string(),
        };
        assert!(matches!(
            bad_email.validate(),
            Err(ModelValidationError::MalformedEmail { .. })
        ));
    }
}

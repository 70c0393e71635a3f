//! Field validation and sanitization pipeline.
//!
//! # Responsibility
//! - Interpret per-field rule chains over raw caller input.
//! - Produce sanitized values and an ordered field error list.
//!
//! # Invariants
//! - The pipeline is purely functional: no store access, no failures.
//! - Rules are evaluated against the trimmed, pre-escape value; sanitized
//!   output is the trimmed value after escaping.
//! - An absent or empty value on an optional chain yields neither a value
//!   nor an error; the caller falls back to the stored value on update.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

pub mod sanitize;

pub use sanitize::escape;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([\.-]?\w+)*@\w+([\.-]?\w+)*(\.\w{2,3})+$").expect("valid email regex")
});
static RECORD_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9a-fA-F]{24}$").expect("valid record id regex"));

/// Raw caller input: field name mapped to the submitted value.
pub type RawFields = BTreeMap<String, String>;

/// One failed field rule, in submission order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Named shapes checkable by `Rule::Pattern`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// Standard address shape, matching the store-level email constraint.
    Email,
    /// Canonical 24-character hex record id.
    RecordIdHex,
}

impl PatternKind {
    pub fn matches(self, value: &str) -> bool {
        match self {
            Self::Email => EMAIL_RE.is_match(value),
            Self::RecordIdHex => RECORD_ID_RE.is_match(value),
        }
    }
}

/// Composable field predicate. Lengths count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    ExactLength(usize),
    Pattern(PatternKind),
}

impl Rule {
    fn passes(self, value: &str) -> bool {
        match self {
            Self::Required => !value.is_empty(),
            Self::MinLength(min) => value.chars().count() >= min,
            Self::MaxLength(max) => value.chars().count() <= max,
            Self::ExactLength(len) => value.chars().count() == len,
            Self::Pattern(kind) => kind.matches(value),
        }
    }

    fn message(self, field: &str) -> String {
        match self {
            Self::Required => format!("{field} must not be empty."),
            Self::MinLength(min) => {
                format!("{field} must be at least {min} characters long.")
            }
            Self::MaxLength(max) => {
                format!("{field} must be at most {max} characters long.")
            }
            Self::ExactLength(len) => {
                format!("{field} must be exactly {len} characters long.")
            }
            Self::Pattern(PatternKind::Email) => {
                format!("{field} must be a valid email address.")
            }
            Self::Pattern(PatternKind::RecordIdHex) => {
                format!("{field} must be a well-formed record id.")
            }
        }
    }
}

/// Rule chain for one input field.
#[derive(Debug, Clone, Copy)]
pub struct FieldChain {
    pub field: &'static str,
    /// Optional chains short-circuit on absent/empty input.
    pub optional: bool,
    pub rules: &'static [Rule],
}

/// Result of one pipeline run: sanitized values plus ordered errors.
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    values: BTreeMap<&'static str, String>,
    errors: Vec<FieldError>,
}

impl PipelineOutput {
    /// Sanitized value for `field`, when the input carried one.
    pub fn value(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Sanitized value for `field`, or the empty string.
    pub fn value_or_empty(&self, field: &str) -> String {
        self.value(field).unwrap_or_default().to_string()
    }

    /// Whether every evaluated chain passed.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    /// Appends an error produced outside the rule chains, e.g. a failed
    /// reference-existence check.
    pub fn push_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }
}

/// Runs every chain over the raw input.
///
/// Present fields always produce a sanitized value, even when a rule
/// failed, so callers can assemble the best-effort unsaved entity.
pub fn run_chains(chains: &[FieldChain], input: &RawFields) -> PipelineOutput {
    let mut output = PipelineOutput::default();

    for chain in chains {
        let trimmed = input.get(chain.field).map_or("", |raw| raw.trim());

        if trimmed.is_empty() {
            if chain.optional {
                continue;
            }
            if let Some(rule) = chain.rules.iter().find(|rule| !rule.passes(trimmed)) {
                output.errors.push(FieldError {
                    field: chain.field.to_string(),
                    message: rule.message(chain.field),
                });
            }
            continue;
        }

        if let Some(rule) = chain.rules.iter().find(|rule| !rule.passes(trimmed)) {
            output.errors.push(FieldError {
                field: chain.field.to_string(),
                message: rule.message(chain.field),
            });
        }
        output.values.insert(chain.field, escape(trimmed));
    }

    output
}

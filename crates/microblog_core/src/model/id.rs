//! Stable record identifier shared by all entities.
//!
//! # Responsibility
//! - Define the canonical 24-character hex id and its syntactic check.
//! - Generate fresh identifiers for newly created records.
//!
//! # Invariants
//! - A constructed `RecordId` is always syntactically well-formed.
//! - Well-formedness is checkable without a store lookup.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter, Write};
use uuid::Uuid;

/// Canonical identifier: 24 hexadecimal characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

/// Number of characters in a canonical record id.
pub const RECORD_ID_LEN: usize = 24;

impl RecordId {
    /// Generates a fresh identifier from 12 random bytes.
    pub fn generate() -> Self {
        let bytes = Uuid::new_v4().into_bytes();
        let mut hex = String::with_capacity(RECORD_ID_LEN);
        for byte in &bytes[..RECORD_ID_LEN / 2] {
            // write! to a String cannot fail.
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }

    /// Parses a raw id, rejecting anything that is not 24 hex characters.
    pub fn parse(value: &str) -> Result<Self, InvalidRecordId> {
        if Self::is_well_formed(value) {
            Ok(Self(value.to_string()))
        } else {
            Err(InvalidRecordId(value.to_string()))
        }
    }

    /// Returns whether `value` has the canonical id shape.
    pub fn is_well_formed(value: &str) -> bool {
        value.len() == RECORD_ID_LEN && value.bytes().all(|b| b.is_ascii_hexdigit())
    }

    /// Borrows the canonical string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for RecordId {
    type Error = InvalidRecordId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(value: RecordId) -> Self {
        value.0
    }
}

/// Raised when a raw id fails the syntactic check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidRecordId(pub String);

impl Display for InvalidRecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid record id: `{}`", self.0)
    }
}

impl Error for InvalidRecordId {}

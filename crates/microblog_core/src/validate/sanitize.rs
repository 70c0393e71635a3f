//! Markup escaping for sanitized field values.
//!
//! # Responsibility
//! - Replace markup-significant characters with HTML entities before
//!   values are persisted or echoed back to callers.
//!
//! # Invariants
//! - The replacement table matches the reference sanitizer, so values
//!   that contain no markup-significant characters pass through intact.

/// Escapes markup-significant characters.
///
/// Values that already satisfy the record-id or email patterns contain
/// none of the replaced characters, so escaping them is a no-op.
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            '/' => escaped.push_str("&#x2F;"),
            '\\' => escaped.push_str("&#x5C;"),
            '`' => escaped.push_str("&#96;"),
            other => escaped.push(other),
        }
    }
    escaped
}

//! Input validation helpers
//!
//! Centralized text length constants and validation functions for
//! reservation payloads.

use crate::reservations::{ReservationError, ValidationKind};

// ── Text length limits ──────────────────────────────────────────────

/// Customer names
pub const MAX_NAME_LEN: usize = 200;

/// Free-text notes (allergies, occasion, seating wishes)
pub const MAX_NOTE_LEN: usize = 500;

/// Short identifiers: phone numbers
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(
    value: &str,
    field: &str,
    max_len: usize,
) -> Result<(), ReservationError> {
    if value.trim().is_empty() {
        return Err(ReservationError::validation(
            ValidationKind::Field,
            format!("{field} must not be empty"),
        ));
    }
    validate_len(value, field, max_len)
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), ReservationError> {
    match value {
        Some(v) => validate_len(v, field, max_len),
        None => Ok(()),
    }
}

/// Validate an optional email: length limit plus a single `@` with text on
/// both sides. Deliverability is not our concern.
pub fn validate_email(value: &Option<String>) -> Result<(), ReservationError> {
    let Some(email) = value else {
        return Ok(());
    };
    validate_len(email, "email", MAX_EMAIL_LEN)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(())
        }
        _ => Err(ReservationError::validation(
            ValidationKind::Field,
            format!("email '{email}' is not a valid address"),
        )),
    }
}

fn validate_len(value: &str, field: &str, max_len: usize) -> Result<(), ReservationError> {
    let len = value.chars().count();
    if len > max_len {
        return Err(ReservationError::validation(
            ValidationKind::Field,
            format!("{field} is too long ({len} chars, max {max_len})"),
        ));
    }
    Ok(())
}

//! Field constraints the operator-facing forms enforce before a statement is sent.
//!
//! Referential rules (a team's city must exist, a city still used by a team
//! cannot be removed) are not checked here; the database rejects those.

use crate::error::CoreError;
use chrono::NaiveDate;

/// Longest name or description accepted for any entity.
pub const MAX_NAME_LEN: usize = 60;

/// Earliest birth date or game date accepted.
pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN)
}

/// A name must be non-blank once trimmed and at most [`MAX_NAME_LEN`] characters.
pub fn check_name(field: &'static str, value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput(field, "must not be empty".to_string()));
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(CoreError::InvalidInput(
            field,
            format!("is {len} characters long, the limit is {MAX_NAME_LEN}"),
        ));
    }
    Ok(())
}

pub fn check_non_negative(field: &'static str, value: i32) -> Result<(), CoreError> {
    if value < 0 {
        return Err(CoreError::InvalidInput(
            field,
            format!("must be zero or greater, got {value}"),
        ));
    }
    Ok(())
}

/// Dates must fall within `1900-01-01..=today`.
pub fn check_date(field: &'static str, value: NaiveDate, today: NaiveDate) -> Result<(), CoreError> {
    let earliest = earliest_date();
    if value < earliest || value > today {
        return Err(CoreError::InvalidInput(
            field,
            format!("{value} is outside {earliest}..={today}"),
        ));
    }
    Ok(())
}

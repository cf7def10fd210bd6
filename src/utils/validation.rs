use crate::utils::error::{Result, ShelterError};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

static DATE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date pattern is valid"));

pub const MIN_NAME_LEN: usize = 2;
pub const MAX_NAME_LEN: usize = 20;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

/// Accepts exactly `YYYY-MM-DD` naming a real calendar day.
pub fn validate_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    if !DATE_PATTERN.is_match(value) {
        return Err(ShelterError::validation(
            field_name,
            value,
            "Invalid date format! Use YYYY-MM-DD",
        ));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|e| {
        ShelterError::validation(field_name, value, format!("Not a calendar date: {}", e))
    })
}

pub fn validate_name(field_name: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    validate_non_empty_string(field_name, trimmed)?;

    let len = trimmed.chars().count();
    if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len) {
        return Err(ShelterError::validation(
            field_name,
            value,
            format!(
                "Must be {}-{} characters, got {}",
                MIN_NAME_LEN, MAX_NAME_LEN, len
            ),
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ShelterError::validation(
            field_name,
            path,
            "Path cannot be empty",
        ));
    }

    if path.contains('\0') {
        return Err(ShelterError::validation(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(ShelterError::validation(
            field_name,
            &value.to_string(),
            format!("Value must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| ShelterError::MissingFieldError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ShelterError::validation(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_date() {
        assert!(validate_date("date", "2025-03-10").is_ok());
        assert!(validate_date("date", "2025-3-10").is_err());
        assert!(validate_date("date", "10/03/2025").is_err());
        assert!(validate_date("date", "2025-03-10 ").is_err());
        assert!(validate_date("date", "").is_err());
    }

    #[test]
    fn test_validate_date_rejects_impossible_days() {
        assert!(validate_date("date", "2025-02-30").is_err());
        assert!(validate_date("date", "2025-13-01").is_err());
        assert!(validate_date("date", "2024-02-29").is_ok());
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("name", "  Luca ").unwrap(), "Luca");
        assert!(validate_name("name", "L").is_err());
        assert!(validate_name("name", "   ").is_err());
        assert!(validate_name("name", "Abcdefghijklmnopqrstu").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let missing: Option<i32> = None;
        assert_eq!(*validate_required_field("x", &present).unwrap(), 3);
        assert!(matches!(
            validate_required_field("x", &missing),
            Err(ShelterError::MissingFieldError { .. })
        ));
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("booking.slot_capacity", 10, 1).is_ok());
        assert!(validate_positive_number("booking.slot_capacity", 0, 1).is_err());
    }
}

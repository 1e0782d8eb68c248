use crate::utils::error::{CalcError, Result};
use chrono::NaiveDate;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static DATE_BR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})/(\d{2})/(\d{4})$").expect("valid date regex"));

/// Earliest year accepted by [`validate_date_br`].
pub const MIN_YEAR: i32 = 1900;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_file_extension(field_name: &str, file: &str, allowed_extensions: &[&str]) -> Result<()> {
    let allowed_set: HashSet<&str> = allowed_extensions.iter().copied().collect();

    match std::path::Path::new(file)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(extension) if allowed_set.contains(extension.to_ascii_lowercase().as_str()) => Ok(()),
        Some(extension) => Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: format!(
                "Unsupported file extension: {}. Allowed extensions: {}",
                extension,
                allowed_extensions.join(", ")
            ),
        }),
        None => Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: file.to_string(),
            reason: "File has no extension or invalid filename".to_string(),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(CalcError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Checks a `DD/MM/YYYY` date the way the intake form does before a period
/// is accepted: exact two/two/four digit layout, a real calendar day, and a
/// year between [`MIN_YEAR`] and `max_year`.
///
/// The error carries a short reason suitable for a field-level message.
pub fn validate_date_br(value: &str, max_year: i32) -> std::result::Result<NaiveDate, String> {
    let caps = DATE_BR
        .captures(value)
        .ok_or_else(|| "expected DD/MM/YYYY".to_string())?;

    // The regex guarantees ASCII digits, so these parses cannot fail.
    let day: u32 = caps[1].parse().map_err(|_| "invalid day".to_string())?;
    let month: u32 = caps[2].parse().map_err(|_| "invalid month".to_string())?;
    let year: i32 = caps[3].parse().map_err(|_| "invalid year".to_string())?;

    if !(1..=12).contains(&month) {
        return Err(format!("month {} is out of range", month));
    }
    if !(MIN_YEAR..=max_year).contains(&year) {
        return Err(format!("year must be between {} and {}", MIN_YEAR, max_year));
    }

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| format!("day {} does not exist in {:02}/{}", day, month, year))
}

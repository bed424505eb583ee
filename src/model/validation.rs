use std::collections::BTreeMap;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use thiserror::Error;

use super::field::{FieldMap, FieldSpec, FieldValue};

/// A single declarative check on a field.
///
/// Shape rules (`Number`, `Integer`, `Date`, `Email`, `Url`, `Coordinates`)
/// accept an empty value; pair them with `Required` to demand one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Text must be non-empty after trimming.
    Required,
    /// Text must parse as a finite decimal number.
    Number,
    /// Text must parse as a whole number.
    Integer,
    /// Value must be a boolean flag.
    Flag,
    /// Text must be a calendar date, `YYYY-MM-DD` or `DD-MM-YYYY`.
    Date,
    /// Text must look like an email address.
    Email,
    /// Text must be an absolute `http`/`https` URL.
    Url,
    /// Text must be `"<latitude>,<longitude>"`.
    Coordinates,
}

/// Validation errors for form fields. Each carries the field label.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} is required.")]
    Required(&'static str),
    #[error("{0} must be a number.")]
    NotANumber(&'static str),
    #[error("{0} must be a whole number.")]
    NotAnInteger(&'static str),
    #[error("{0} must be true or false.")]
    NotAFlag(&'static str),
    #[error("{0} must be a date (YYYY-MM-DD).")]
    InvalidDate(&'static str),
    #[error("{0} must be a valid email address.")]
    InvalidEmail(&'static str),
    #[error("{0} must be a valid http(s) URL.")]
    InvalidUrl(&'static str),
    #[error("{0} must be \"latitude,longitude\".")]
    InvalidCoordinates(&'static str),
}

/// Per-field validation failures, keyed by field name. Empty means valid.
pub type FieldErrors = BTreeMap<&'static str, ValidationError>;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid hardcoded regex")
});

/// Accepted date layouts: the form's ISO input and the server's stored format.
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d-%m-%Y"];

/// Parses a decimal number, rejecting NaN and infinities.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Parses a whole number.
pub fn parse_integer(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Parses a date in any of the accepted layouts.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// Splits `"lat,lon"` into its two trimmed parts. A missing part is `""`.
pub fn split_coordinates(raw: &str) -> (&str, &str) {
    match raw.split_once(',') {
        Some((lat, lon)) => (lat.trim(), lon.trim()),
        None => (raw.trim(), ""),
    }
}

/// Returns `true` if `raw` looks like an email address.
pub fn is_email(raw: &str) -> bool {
    EMAIL_RE.is_match(raw.trim())
}

/// Returns `true` if `raw` is an absolute URL with an `http` or `https` scheme.
pub fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw.trim())
        .map(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
        .unwrap_or(false)
}

fn check(rule: Rule, spec: &FieldSpec, value: Option<&FieldValue>) -> Result<(), ValidationError> {
    let label = spec.label;
    if rule == Rule::Flag {
        return match value {
            Some(FieldValue::Flag(_)) => Ok(()),
            _ => Err(ValidationError::NotAFlag(label)),
        };
    }

    let text = value.map_or("", FieldValue::as_text);
    let blank = text.trim().is_empty();

    match rule {
        Rule::Required if blank => Err(ValidationError::Required(label)),
        _ if blank => Ok(()),
        Rule::Number if parse_number(text).is_none() => Err(ValidationError::NotANumber(label)),
        Rule::Integer if parse_integer(text).is_none() => {
            Err(ValidationError::NotAnInteger(label))
        }
        Rule::Date if parse_date(text).is_none() => Err(ValidationError::InvalidDate(label)),
        Rule::Email if !is_email(text) => Err(ValidationError::InvalidEmail(label)),
        Rule::Url if !is_http_url(text) => Err(ValidationError::InvalidUrl(label)),
        Rule::Coordinates => {
            let (lat, lon) = split_coordinates(text);
            match (parse_number(lat), parse_number(lon)) {
                (Some(_), Some(_)) => Ok(()),
                _ => Err(ValidationError::InvalidCoordinates(label)),
            }
        }
        _ => Ok(()),
    }
}

/// Validates one field, reporting its first failing rule.
pub fn validate_field(spec: &FieldSpec, values: &FieldMap) -> Result<(), ValidationError> {
    let value = values.get(spec.name);
    spec.rules
        .iter()
        .try_for_each(|rule| check(*rule, spec, value))
}

/// Validates every field of a schema, collecting one error per failing field.
pub fn validate(specs: &[FieldSpec], values: &FieldMap) -> FieldErrors {
    specs
        .iter()
        .filter_map(|spec| validate_field(spec, values).err().map(|e| (spec.name, e)))
        .collect()
}

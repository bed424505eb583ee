//! Numeric coercion for wire payloads.
//!
//! A value that does not parse coerces to `None`, which serializes as JSON
//! `null`: the same bytes a JavaScript `NaN` produces under `JSON.stringify`.
//! The validator rejects such values before a payload is built for
//! submission, so `None` only reaches the wire when a caller skips validation.

use super::validation::{parse_integer, parse_number};

/// Coerces a decimal field. Unparseable input becomes `None`.
pub fn coerce_float(raw: &str) -> Option<f64> {
    parse_number(raw)
}

/// Coerces a whole-number field. Unparseable input becomes `None`.
pub fn coerce_int(raw: &str) -> Option<i64> {
    parse_integer(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_number_twenty() {
        assert_eq!(coerce_int("20"), Some(20));
    }

    #[test]
    fn seat_number_garbage_is_not_a_number() {
        assert_eq!(coerce_int("abc"), None);
        assert_eq!(serde_json::to_string(&coerce_int("abc")).unwrap(), "null");
    }

    #[test]
    fn float_parses_decimals() {
        assert_eq!(coerce_float("12.50"), Some(12.5));
        assert_eq!(coerce_float(" 3 "), Some(3.0));
        assert_eq!(coerce_float(""), None);
        assert_eq!(coerce_float("NaN"), None);
    }
}

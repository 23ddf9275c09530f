//! Shared validation helpers for inbound HTTP adapters.

use actix_web::web;
use chrono::NaiveDate;
use serde_json::{Value, json};
use tracing::debug;

use crate::domain::{Error, ItemStatus};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidId,
    InvalidDate,
    InvalidStatus,
    InvalidValue,
    InvalidJson,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidId => "invalid_id",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidStatus => "invalid_status",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidJson => "invalid_json",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<Value>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Reject a field value that failed a domain rule, reusing the rule's message.
pub(crate) fn invalid_field_error(field: FieldName, message: impl Into<String>) -> Error {
    ValidationError::new(field.as_str(), message).with_code(ErrorCode::InvalidValue)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn invalid_id_error(field: FieldName, value: impl Into<Value>) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be numeric"))
        .with_value(ErrorCode::InvalidId, value)
}

/// Parse a path segment holding a numeric identifier.
pub(crate) fn parse_path_id(raw: &str, field: FieldName) -> Result<i32, Error> {
    raw.trim()
        .parse::<i32>()
        .map_err(|_| invalid_id_error(field, raw))
}

/// Parse a numeric identifier from a JSON body. Accepts integers and
/// digit-only strings.
pub(crate) fn parse_numeric_id(value: Value, field: FieldName) -> Result<i32, Error> {
    let parsed = match &value {
        Value::Number(number) => number.as_i64().and_then(|id| i32::try_from(id).ok()),
        Value::String(raw) => raw.trim().parse::<i32>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| invalid_id_error(field, value))
}

pub(crate) fn parse_date(value: String, field: FieldName) -> Result<NaiveDate, Error> {
    NaiveDate::parse_from_str(&value, "%Y-%m-%d").map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must be a YYYY-MM-DD date"))
            .with_value(ErrorCode::InvalidDate, value.clone())
    })
}

pub(crate) fn parse_status(value: String, field: FieldName) -> Result<ItemStatus, Error> {
    value.parse::<ItemStatus>().map_err(|err| {
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(ErrorCode::InvalidStatus, value.clone())
    })
}

/// JSON extractor configuration rendering body errors in the domain shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        debug!(error = %err, "rejected request body");
        Error::invalid_request("request body must be valid JSON")
            .with_details(json!({ "code": ErrorCode::InvalidJson.as_str() }))
            .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const FIELD: FieldName = FieldName::new("listId");

    #[rstest]
    #[case(json!(7), 7)]
    #[case(json!("12"), 12)]
    #[case(json!(" 3 "), 3)]
    fn numeric_ids_accept_numbers_and_digit_strings(#[case] raw: Value, #[case] expected: i32) {
        assert_eq!(parse_numeric_id(raw, FIELD).expect("numeric id"), expected);
    }

    #[rstest]
    #[case(json!("abc"))]
    #[case(json!(1.5))]
    #[case(json!(null))]
    #[case(json!(true))]
    #[case(json!(9_999_999_999_i64))]
    fn non_numeric_ids_are_rejected(#[case] raw: Value) {
        let err = parse_numeric_id(raw, FIELD).expect_err("rejected");
        let details = err.details().expect("details");
        assert_eq!(details["field"], "listId");
        assert_eq!(details["code"], "invalid_id");
    }

    #[rstest]
    fn path_ids_must_be_numeric() {
        assert_eq!(parse_path_id("42", FieldName::new("id")).expect("id"), 42);
        let err = parse_path_id("forty-two", FieldName::new("id")).expect_err("rejected");
        assert_eq!(err.message(), "id must be numeric");
    }

    #[rstest]
    #[case("2030-02-28", true)]
    #[case("2030-02-30", false)]
    #[case("28/02/2030", false)]
    fn dates_use_iso_format(#[case] raw: &str, #[case] valid: bool) {
        assert_eq!(
            parse_date(raw.to_owned(), FieldName::new("deadline")).is_ok(),
            valid
        );
    }

    #[rstest]
    fn unknown_status_reports_value() {
        let err = parse_status("archived".to_owned(), FieldName::new("status"))
            .expect_err("rejected");
        let details = err.details().expect("details");
        assert_eq!(details["value"], "archived");
        assert_eq!(details["code"], "invalid_status");
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let err = require::<String>(None, FieldName::new("title")).expect_err("missing");
        assert_eq!(err.message(), "missing required field: title");
        assert_eq!(err.details().expect("details")["code"], "missing_field");
    }
}

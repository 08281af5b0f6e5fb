//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{DocumentId, EmailAddress, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidUuid,
    InvalidEmail,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidEmail => "invalid_email",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
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

fn field_error(field: FieldName, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let message = format!("missing required field: {}", field.as_str());
    field_error(field, message, ErrorCode::MissingField)
}

pub(crate) fn parse_document_id(value: &str, field: FieldName) -> Result<DocumentId, Error> {
    uuid::Uuid::parse_str(value)
        .map(DocumentId::from_uuid)
        .map_err(|_| {
            let message = format!("{} must be a valid UUID", field.as_str());
            field_error(field, message, ErrorCode::InvalidUuid)
        })
}

pub(crate) fn parse_email(value: &str, field: FieldName) -> Result<EmailAddress, Error> {
    EmailAddress::new(value).map_err(|_| {
        let message = format!("{} must be a valid email address", field.as_str());
        field_error(field, message, ErrorCode::InvalidEmail)
    })
}

use serde::{Deserialize, Serialize};

use crate::i18n::Locale;
use crate::validation::FieldErrors;

/// Serializable error envelope handed to whatever renders the failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error category (e.g. "not_found", "validation")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Field name → localized message, for validation failures only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<std::collections::BTreeMap<String, String>>,
    /// ISO 8601 timestamp when the error occurred
    pub timestamp: String,
}

/// Coarse classification used by callers that branch on the failure type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    NotFound,
    Validation,
    BadRequest,
    Conflict,
    Internal,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(FieldErrors),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<FieldErrors> for ServiceError {
    fn from(errors: FieldErrors) -> Self {
        ServiceError::ValidationError(errors)
    }
}

impl ServiceError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        ServiceError::NotFound(format!("{entity} with ID {id} not found"))
    }

    /// Single source of truth for error classification.
    pub fn kind(&self) -> ErrorCategory {
        match self {
            Self::NotFound(_) => ErrorCategory::NotFound,
            Self::ValidationError(_) => ErrorCategory::Validation,
            Self::InvalidInput(_) | Self::InvalidOperation(_) => ErrorCategory::BadRequest,
            Self::Conflict(_) => ErrorCategory::Conflict,
            Self::InternalError(_) => ErrorCategory::Internal,
        }
    }

    /// Field errors carried by a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::ValidationError(errors) => Some(errors),
            _ => None,
        }
    }

    /// Message suitable for display. Internal errors return a generic text
    /// so implementation details do not leak.
    pub fn response_message(&self) -> String {
        match self {
            Self::InternalError(_) => "Internal error".to_string(),
            Self::ValidationError(_) => "One or more fields are invalid".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn to_response(&self, locale: Locale) -> ErrorResponse {
        ErrorResponse {
            error: self.kind().to_string(),
            message: self.response_message(),
            fields: self.field_errors().map(|errors| errors.localized(locale)),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{Field, Rule};

    #[test]
    fn service_error_kind_mapping() {
        assert_eq!(
            ServiceError::NotFound("x".into()).kind(),
            ErrorCategory::NotFound
        );
        assert_eq!(
            ServiceError::ValidationError(FieldErrors::new()).kind(),
            ErrorCategory::Validation
        );
        assert_eq!(
            ServiceError::InvalidOperation("x".into()).kind(),
            ErrorCategory::BadRequest
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).kind(),
            ErrorCategory::Conflict
        );
        assert_eq!(
            ServiceError::InternalError("x".into()).kind(),
            ErrorCategory::Internal
        );
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = ServiceError::InternalError("lock poisoned at repo.rs:42".into());
        assert_eq!(err.response_message(), "Internal error");
    }

    #[test]
    fn validation_response_carries_localized_fields() {
        let mut errors = FieldErrors::new();
        errors.add(Field::Amount, Rule::MustBePositive);
        let response = ServiceError::from(errors).to_response(Locale::En);
        assert_eq!(response.error, "validation");
        let fields = response.fields.unwrap();
        assert_eq!(fields["amount"], "Amount must be greater than zero");
    }

    #[test]
    fn not_found_names_entity() {
        let err = ServiceError::not_found("Batch", 7);
        assert_eq!(err.to_string(), "Not found: Batch with ID 7 not found");
        assert!(err.field_errors().is_none());
    }
}

use std::fmt;

use site_store::StoreError;
use site_types::TypeError;

/// A single rejected form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors found in one submission.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub fields: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn push(&mut self, field: &'static str, message: impl Into<String>) {
        self.fields.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Message for `field`, if it was rejected.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.field == field)
            .map(|f| f.message.as_str())
    }

    /// `Ok(())` when nothing was rejected.
    pub fn into_result(self) -> Result<(), ContentError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(ContentError::Validation(self))
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

/// Errors produced by content store operations.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("validation failed: {0}")]
    Validation(ValidationErrors),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: u64 },

    #[error("schema violation: {0}")]
    SchemaViolation(String),

    #[error("persistence error: {0}")]
    Persistence(#[from] StoreError),

    #[error("stored content is corrupt: {0}")]
    Corrupt(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("admin session required")]
    Unauthorized,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ContentError {
    /// Recoverable errors are reported inline to the user; the rest are
    /// configuration-level failures for an operator.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NotFound { .. } | Self::Unauthorized
        )
    }
}

impl From<TypeError> for ContentError {
    fn from(e: TypeError) -> Self {
        Self::SchemaViolation(e.to_string())
    }
}

/// Result alias for content operations.
pub type ContentResult<T> = Result<T, ContentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_joins_fields() {
        let mut errs = ValidationErrors::default();
        errs.push("name", "Name is required / 姓名不能为空");
        errs.push("email", "Invalid email address / 邮箱格式不正确");
        let msg = ContentError::Validation(errs).to_string();
        assert!(msg.starts_with("validation failed: name: Name is required"));
        assert!(msg.contains("; email: Invalid email address"));
    }

    #[test]
    fn empty_validation_is_ok() {
        assert!(ValidationErrors::default().into_result().is_ok());
    }

    #[test]
    fn type_errors_become_schema_violations() {
        let err: ContentError = TypeError::UnknownCategory("crypto".into()).into();
        assert!(matches!(err, ContentError::SchemaViolation(_)));
        assert!(!err.is_recoverable());
    }

    #[test]
    fn not_found_is_recoverable() {
        let err = ContentError::NotFound {
            kind: "article",
            id: 9,
        };
        assert_eq!(err.to_string(), "article not found: 9");
        assert!(err.is_recoverable());
    }
}

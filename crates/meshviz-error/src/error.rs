//! The main Error type for meshviz.

use crate::{ErrorKind, ErrorStatus};
use std::fmt;

/// Unified error type for all meshviz operations.
pub struct Error {
    kind: ErrorKind,
    message: String,
    status: ErrorStatus,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<Box<dyn std::error::Error + Send + Sync + 'static>>,
}

impl Error {
    /// Create a new error with the given kind and message.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let status = if kind.is_retryable() {
            ErrorStatus::Temporary
        } else {
            ErrorStatus::Permanent
        };

        Self {
            kind,
            message: message.into(),
            status,
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn status(&self) -> ErrorStatus {
        self.status
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Look up a single context value by key.
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source<E>(mut self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(Box::new(source));
        self
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({}) at {}", self.kind, self.status, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IoFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("io")
            .set_source(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        let kind = match err.classify() {
            serde_json::error::Category::Io => ErrorKind::IoFailed,
            _ => ErrorKind::DeserializationFailed,
        };
        Error::new(kind, err.to_string())
            .with_operation("json")
            .with_context("line", err.line().to_string())
            .with_context("column", err.column().to_string())
            .set_source(err)
    }
}

impl Error {
    /// Create an Unexpected error.
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create an InvalidArgument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument, message)
    }

    /// Create a ConfigInvalid error
    pub fn config_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ConfigInvalid, message)
    }

    /// Create a MissingMetadataField error naming the entity and the key.
    pub fn missing_metadata_field(entity: impl Into<String>, key: &str) -> Self {
        let entity = entity.into();
        Self::new(
            ErrorKind::MissingMetadataField,
            format!("entity '{}' has no metadata field '{}'", entity, key),
        )
        .with_context("entity", entity)
        .with_context("key", key)
    }

    /// Create a MissingMetadataField error for a key present with the wrong type.
    pub fn mistyped_metadata_field(entity: impl Into<String>, key: &str, expected: &str) -> Self {
        let entity = entity.into();
        Self::new(
            ErrorKind::MissingMetadataField,
            format!(
                "entity '{}' metadata field '{}' is not a {}",
                entity, key, expected
            ),
        )
        .with_context("entity", entity)
        .with_context("key", key)
        .with_context("expected", expected)
    }

    /// Create an InvalidMetadataValue error
    pub fn invalid_metadata_value(entity: impl Into<String>, key: &str, value: f64) -> Self {
        let entity = entity.into();
        Self::new(
            ErrorKind::InvalidMetadataValue,
            format!(
                "entity '{}' metadata field '{}' must be a finite non-negative number, got {}",
                entity, key, value
            ),
        )
        .with_context("entity", entity)
        .with_context("key", key)
    }

    /// Create a MalformedEntity error
    pub fn malformed_entity(entity: impl Into<String>, reason: impl Into<String>) -> Self {
        let entity = entity.into();
        let reason = reason.into();
        Self::new(
            ErrorKind::MalformedEntity,
            format!("entity '{}' is malformed: {}", entity, reason),
        )
        .with_context("entity", entity)
    }

    /// Create an EntityNotFound error
    pub fn entity_not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(
            ErrorKind::EntityNotFound,
            format!("entity '{}' not found", id),
        )
        .with_context("id", id)
    }

    /// Create a CycleDetected error
    pub fn cycle_detected(entity: impl Into<String>) -> Self {
        let entity = entity.into();
        Self::new(
            ErrorKind::CycleDetected,
            format!("entity '{}' appears on its own call path", entity),
        )
        .with_context("entity", entity)
    }

    /// Create a DepthExceeded error
    pub fn depth_exceeded(entity: impl Into<String>, max_depth: usize) -> Self {
        let entity = entity.into();
        Self::new(
            ErrorKind::DepthExceeded,
            format!(
                "traversal exceeded max depth {} at entity '{}'",
                max_depth, entity
            ),
        )
        .with_context("entity", entity)
        .with_context("max_depth", max_depth.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = Error::new(ErrorKind::MalformedEntity, "bad name");
        assert_eq!(err.kind(), ErrorKind::MalformedEntity);
        assert_eq!(err.message(), "bad name");
        assert_eq!(err.status(), ErrorStatus::Permanent);
    }

    #[test]
    fn test_operation_chaining() {
        let err = Error::cycle_detected("reviews (v2)")
            .with_operation("vizceral::walk")
            .with_operation("vizceral::build_config");

        assert_eq!(err.operation(), "vizceral::build_config");
        assert_eq!(err.context_value("called"), Some("vizceral::walk"));
        assert_eq!(err.context_value("entity"), Some("reviews (v2)"));
    }

    #[test]
    fn test_missing_metadata_field_names_entity_and_key() {
        let err = Error::missing_metadata_field("reviews (v2)", "rate_5xx");
        assert_eq!(err.kind(), ErrorKind::MissingMetadataField);
        assert_eq!(err.context_value("entity"), Some("reviews (v2)"));
        assert_eq!(err.context_value("key"), Some("rate_5xx"));
        assert!(err.message().contains("rate_5xx"));
        assert_eq!(err.status(), ErrorStatus::Permanent);
    }

    #[test]
    fn test_display() {
        let err = Error::malformed_entity("a(b) (v1)", "name contains '('")
            .with_operation("topology::validate");

        let display = format!("{}", err);
        assert!(display.contains("MalformedEntity"));
        assert!(display.contains("permanent"));
        assert!(display.contains("topology::validate"));
        assert!(display.contains("entity: a(b) (v1)"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: Error = json_err.into();
        assert_eq!(err.kind(), ErrorKind::DeserializationFailed);
        assert_eq!(err.operation(), "json");
    }

    #[test]
    fn test_io_failure_is_temporary() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "broken pipe");
        let err: Error = io_err.into();
        assert_eq!(err.kind(), ErrorKind::IoFailed);
        assert_eq!(err.status(), ErrorStatus::Temporary);
        assert!(format!("{}", err).contains("temporary"));
    }
}

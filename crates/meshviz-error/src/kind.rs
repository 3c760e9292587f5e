//! Error kinds for meshviz operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on `ErrorKind` to decide how to report a failure; the
/// transform never recovers locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration file or values
    ConfigInvalid,

    /// Invalid argument passed to function
    InvalidArgument,

    // =========================================================================
    // Topology errors
    // =========================================================================
    /// A required counter or link is absent from an entity's metadata, or has
    /// the wrong type
    MissingMetadataField,

    /// A counter is present but negative or not finite
    InvalidMetadataValue,

    /// Name/version cannot form an unambiguous identity key, or the parent
    /// link is inconsistent with the tree shape
    MalformedEntity,

    /// An entity id does not exist in the topology
    EntityNotFound,

    /// An entity was reached again on its own call path
    CycleDetected,

    /// Traversal went deeper than the configured limit
    DepthExceeded,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Serializing the visualization document failed
    SerializationFailed,

    /// Parsing the input topology failed
    DeserializationFailed,

    // =========================================================================
    // File/IO errors
    // =========================================================================
    /// File not found
    FileNotFound,

    /// Permission denied
    PermissionDenied,

    /// IO operation failed
    IoFailed,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Check if this error kind is retryable by default
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::IoFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(
            ErrorKind::MissingMetadataField.to_string(),
            "MissingMetadataField"
        );
        assert_eq!(ErrorKind::MalformedEntity.as_str(), "MalformedEntity");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::IoFailed.is_retryable());
        assert!(!ErrorKind::MissingMetadataField.is_retryable());
        assert!(!ErrorKind::CycleDetected.is_retryable());
    }
}

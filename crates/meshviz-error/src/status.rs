//! Error status: whether the same request could succeed if repeated.

use std::fmt;

/// Whether an error depends on the input or on the environment.
///
/// - `Permanent`: the input is structurally invalid, repeating will not help
/// - `Temporary`: an I/O hiccup; the same input may succeed later
///
/// The transform itself never repeats a request; the status is reported to
/// the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ErrorStatus {
    /// Examples: MissingMetadataField, MalformedEntity, CycleDetected
    #[default]
    Permanent,

    Temporary,
}

impl ErrorStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorStatus::Permanent => "permanent",
            ErrorStatus::Temporary => "temporary",
        }
    }
}

impl fmt::Display for ErrorStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

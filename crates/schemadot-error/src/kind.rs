//! Error kinds for schemadot operations

use strum_macros::{Display, IntoStaticStr};

/// The kind of error that occurred.
///
/// Callers match on ErrorKind to decide whether a failure is local to one
/// schema object or terminal for the whole generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, IntoStaticStr, Display)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// Invalid configuration or parameters
    ConfigInvalid,

    // =========================================================================
    // Schema provider errors
    // =========================================================================
    /// The schema provider could not be reached or answered with a failure
    ProviderUnavailable,

    /// A selection referenced a handle the provider does not know
    HandleNotFound,

    /// A field layout id could not be resolved
    LayoutNotFound,

    /// An optional platform module (e.g. commerce) is not enabled
    ModuleDisabled,

    // =========================================================================
    // Serialization errors
    // =========================================================================
    /// Serialization failed
    SerializationFailed,

    /// Deserialization failed
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
        matches!(self, ErrorKind::ProviderUnavailable | ErrorKind::IoFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::HandleNotFound.to_string(), "HandleNotFound");
        assert_eq!(ErrorKind::LayoutNotFound.as_str(), "LayoutNotFound");
    }

    #[test]
    fn test_is_retryable() {
        assert!(ErrorKind::ProviderUnavailable.is_retryable());
        assert!(ErrorKind::IoFailed.is_retryable());
        assert!(!ErrorKind::ConfigInvalid.is_retryable());
        assert!(!ErrorKind::HandleNotFound.is_retryable());
        assert!(!ErrorKind::DeserializationFailed.is_retryable());
    }
}

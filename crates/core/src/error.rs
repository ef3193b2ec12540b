//! Error types for the particle-field core.

use thiserror::Error;

/// Errors produced while constructing or driving a particle field.
///
/// Configuration problems are never errors: unusable option values fall back
/// to their defaults. Only a missing host or a broken drawing surface is fatal.
#[derive(Debug, Error)]
pub enum FieldError {
    /// A host size was negative or not finite, or a pixel surface size was
    /// zero or overflowed.
    #[error("invalid dimensions: width and height must be finite and in range")]
    InvalidDimensions,

    /// The host element the field should attach to does not exist.
    #[error("host element not found: {0}")]
    HostNotFound(String),

    /// The host environment lacks a drawing or animation primitive.
    #[error("surface unavailable: {0}")]
    Surface(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing output (snapshots, reports) failed.
    #[error("I/O error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_dimensions_displays_readable_message() {
        let msg = FieldError::InvalidDimensions.to_string();
        assert!(
            msg.contains("width") && msg.contains("height"),
            "expected message mentioning width and height, got: {msg}"
        );
    }

    #[test]
    fn host_not_found_includes_selector() {
        let msg = FieldError::HostNotFound("#stage".into()).to_string();
        assert!(msg.contains("#stage"), "missing selector in: {msg}");
    }

    #[test]
    fn surface_includes_message() {
        let msg = FieldError::Surface("no 2d context".into()).to_string();
        assert!(msg.contains("no 2d context"), "missing message in: {msg}");
    }

    #[test]
    fn invalid_color_includes_message() {
        let msg = FieldError::InvalidColor("bad hex".into()).to_string();
        assert!(msg.contains("bad hex"), "missing message in: {msg}");
    }

    #[test]
    fn io_includes_message() {
        let msg = FieldError::Io("disk full".into()).to_string();
        assert!(msg.contains("disk full"), "missing message in: {msg}");
    }

    #[test]
    fn field_error_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<FieldError>();
    }

    #[test]
    fn field_error_implements_std_error() {
        fn assert_std_error<T: std::error::Error>() {}
        assert_std_error::<FieldError>();
    }
}

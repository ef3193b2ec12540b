//! Structured CLI errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: field error (bad dimensions, missing surface)
//! - 11: I/O error (params file, snapshot)
//! - 12: input error (bad JSON params, bad color)
//! - 13: serialization error

use particle_field_core::FieldError;
use std::fmt;

/// Errors produced by CLI operations, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum CliError {
    /// A field-level error (bad dimensions, surface failure).
    Field(FieldError),
    /// An I/O error (params file read, snapshot write).
    Io(String),
    /// A user input error (bad JSON params, bad background color).
    Input(String),
    /// A serialization error (JSON output failure).
    Serialization(String),
}

impl CliError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Field(_) => 10,
            CliError::Io(_) => 11,
            CliError::Input(_) => 12,
            CliError::Serialization(_) => 13,
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Field(e) => write!(f, "{e}"),
            CliError::Io(msg) | CliError::Input(msg) | CliError::Serialization(msg) => {
                write!(f, "{msg}")
            }
        }
    }
}

impl From<FieldError> for CliError {
    fn from(e: FieldError) -> Self {
        match e {
            FieldError::Io(msg) => CliError::Io(msg),
            FieldError::InvalidColor(msg) => CliError::Input(format!("invalid color: {msg}")),
            other => CliError::Field(other),
        }
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct_per_variant() {
        let codes = [
            CliError::Field(FieldError::InvalidDimensions).exit_code(),
            CliError::Io("write failed".into()).exit_code(),
            CliError::Input("bad params".into()).exit_code(),
            CliError::Serialization("json fail".into()).exit_code(),
        ];
        assert_eq!(codes, [10, 11, 12, 13]);
    }

    #[test]
    fn from_field_error_io_routes_to_cli_io() {
        let cli_err = CliError::from(FieldError::Io("disk full".into()));
        assert_eq!(cli_err.exit_code(), 11);
        assert!(cli_err.to_string().contains("disk full"));
    }

    #[test]
    fn from_field_error_invalid_color_routes_to_input() {
        let cli_err = CliError::from(FieldError::InvalidColor("#12".into()));
        assert_eq!(cli_err.exit_code(), 12);
        assert!(cli_err.to_string().contains("#12"));
    }

    #[test]
    fn from_field_error_other_routes_to_cli_field() {
        let cli_err = CliError::from(FieldError::HostNotFound("#stage".into()));
        assert_eq!(cli_err.exit_code(), 10);
        assert!(cli_err.to_string().contains("#stage"));
    }

    #[test]
    fn from_serde_json_error_routes_to_serialization() {
        let bad_json = serde_json::from_str::<serde_json::Value>("{invalid");
        let cli_err = CliError::from(bad_json.unwrap_err());
        assert_eq!(cli_err.exit_code(), 13);
    }
}

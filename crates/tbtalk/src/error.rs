//! Error types for tbtalk.
//!
//! This module defines all error types used throughout the tbtalk crate,
//! providing detailed context for debugging and user-friendly error messages.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for tbtalk operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Session Errors ===
    /// Login was attempted with an empty name.
    #[error("cannot log in with an empty name")]
    EmptyName,

    /// An edit was attempted by a user without the admin role.
    #[error("'{user}' is not an admin and cannot {action}")]
    NotAdmin {
        /// The user who attempted the edit.
        user: String,
        /// Description of the attempted action.
        action: &'static str,
    },

    /// A row index was outside the fixed row range.
    #[error("row {index} is out of range (rows are numbered 1 to {len})")]
    RowIndex {
        /// The 1-based row number that was requested.
        index: usize,
        /// Number of rows available.
        len: usize,
    },

    // === Shell Errors ===
    /// A shell command could not be parsed.
    #[error("invalid command: {0}")]
    Command(String),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the export document.
    #[error("failed to write export to {path}: {source}")]
    ExportWrite {
        /// Path that couldn't be written.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for tbtalk operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new shell command error.
    #[must_use]
    pub fn command(message: impl Into<String>) -> Self {
        Self::Command(message.into())
    }

    /// Create a not-admin error for the given user and action.
    #[must_use]
    pub fn not_admin(user: impl Into<String>, action: &'static str) -> Self {
        Self::NotAdmin {
            user: user.into(),
            action,
        }
    }

    /// Check if this error is a role/permission issue.
    #[must_use]
    pub fn is_role_error(&self) -> bool {
        matches!(self, Self::NotAdmin { .. })
    }

    /// Check if this error came from shell command parsing.
    #[must_use]
    pub fn is_command_error(&self) -> bool {
        matches!(self, Self::Command(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_name_display() {
        let err = Error::EmptyName;
        assert_eq!(err.to_string(), "cannot log in with an empty name");
    }

    #[test]
    fn test_not_admin_display() {
        let err = Error::not_admin("jordan", "edit discussion rows");
        let msg = err.to_string();
        assert!(msg.contains("jordan"));
        assert!(msg.contains("edit discussion rows"));
    }

    #[test]
    fn test_row_index_display() {
        let err = Error::RowIndex { index: 5, len: 3 };
        let msg = err.to_string();
        assert!(msg.contains('5'));
        assert!(msg.contains("1 to 3"));
    }

    #[test]
    fn test_command_error_display() {
        let err = Error::command("unknown command 'frobnicate'");
        assert_eq!(
            err.to_string(),
            "invalid command: unknown command 'frobnicate'"
        );
    }

    #[test]
    fn test_is_role_error() {
        assert!(Error::not_admin("sam", "export").is_role_error());
        assert!(!Error::EmptyName.is_role_error());
    }

    #[test]
    fn test_is_command_error() {
        assert!(Error::command("nope").is_command_error());
        assert!(!Error::EmptyName.is_command_error());
    }

    #[test]
    fn test_config_validation_display() {
        let err = Error::ConfigValidation {
            message: "filename_prefix must not be empty".to_string(),
        };
        assert!(err.to_string().contains("filename_prefix"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_json_error() {
        let json_result: std::result::Result<i32, serde_json::Error> =
            serde_json::from_str("not valid json");
        if let Err(json_err) = json_result {
            let err: Error = json_err.into();
            assert!(matches!(err, Error::Json(_)));
        }
    }

    #[test]
    fn test_export_write_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::ExportWrite {
            path: PathBuf::from("/root/forbidden/meeting.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("/root/forbidden/meeting.txt"));
    }

    #[test]
    fn test_directory_create_display() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = Error::DirectoryCreate {
            path: PathBuf::from("/root/forbidden"),
            source: io_err,
        };
        assert!(err.to_string().contains("/root/forbidden"));
    }
}

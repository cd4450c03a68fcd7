//! Error types for the ds-core crate.
//!
//! This module provides the [`ConfigError`] type for failures while building
//! a scan configuration or loading persisted settings, and [`ExportError`]
//! for the spreadsheet writer.

use camino::Utf8PathBuf;

/// Errors that can occur during configuration loading and validation.
///
/// # Examples
///
/// ```
/// use ds_core::ConfigError;
///
/// let error = ConfigError::invalid_option("max_depth", "must be between 1 and 50, got 0");
/// assert!(error.to_string().contains("max_depth"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// The settings file path is unusable.
    #[error("invalid path '{path}': {reason}")]
    InvalidPath {
        /// The invalid path.
        path: Utf8PathBuf,
        /// Explanation of why the path is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading or writing settings.
    #[error("failed to access configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the settings file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Creates a new [`ConfigError::InvalidOption`] error.
    #[inline]
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }
}

/// Errors raised while writing a spreadsheet export.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// Writing the finished workbook failed.
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),

    /// The workbook could not be assembled.
    #[error("failed to build spreadsheet: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::invalid_option("max_depth", "must be positive");
        let msg = error.to_string();
        assert!(msg.contains("max_depth"));
        assert!(msg.contains("must be positive"));
    }

    #[test]
    fn test_invalid_path_display() {
        let error = ConfigError::InvalidPath {
            path: Utf8PathBuf::from("/etc/dirscan.json"),
            reason: "is a directory".to_owned(),
        };
        assert!(error.to_string().contains("/etc/dirscan.json"));
    }

    #[test]
    fn test_parse_error_from_serde() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ConfigError::from(err);
        assert!(error.to_string().starts_with("failed to parse configuration"));
    }

    #[test]
    fn test_export_error_from_io() {
        let error = ExportError::from(std::io::Error::other("disk full"));
        assert_eq!(error.to_string(), "failed to write export: disk full");
    }
}

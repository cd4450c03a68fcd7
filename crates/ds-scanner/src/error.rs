//! Error types for the ds-scanner crate.
//!
//! This module provides the [`ScanError`] type for errors that can occur
//! before or during a directory scan.

use camino::Utf8PathBuf;

/// Errors that can occur during scanning operations.
///
/// # Error Recovery Strategy
///
/// - **Invalid root** ([`ScanError::InvalidRoot`]): Fatal - reported before any work starts
/// - **Entry access** ([`ScanError::EntryAccess`]): Report a diagnostic, skip the entry, continue
/// - **Non-UTF-8 names** ([`ScanError::NonUtf8Path`]): Report a diagnostic, skip the entry, continue
/// - **Worker failure** ([`ScanError::WorkerFailed`]): Fatal - the background task died
///
/// # Examples
///
/// ```
/// use ds_scanner::ScanError;
///
/// fn describe(err: &ScanError) -> &'static str {
///     match err {
///         ScanError::InvalidRoot { .. } => "bad root",
///         ScanError::EntryAccess { .. } => "unreadable entry",
///         ScanError::NonUtf8Path(_) => "undecodable name",
///         ScanError::WorkerFailed(_) => "worker crashed",
///     }
/// }
///
/// let err = ScanError::invalid_root("/nope", "path does not exist");
/// assert_eq!(describe(&err), "bad root");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    /// The scan root is missing or not a directory.
    #[error("invalid scan root {path}: {reason}")]
    InvalidRoot {
        /// The rejected root path.
        path: Utf8PathBuf,
        /// Why it was rejected.
        reason: String,
    },

    /// A directory listing or metadata read failed.
    #[error("cannot access {path}: {source}")]
    EntryAccess {
        /// The entry that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A directory entry name is not valid UTF-8.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// The background scan task panicked or was aborted.
    #[error("scan worker failed: {0}")]
    WorkerFailed(String),
}

impl ScanError {
    /// Creates a new [`ScanError::InvalidRoot`] error.
    #[inline]
    pub fn invalid_root(path: impl Into<Utf8PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidRoot {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Creates a new [`ScanError::EntryAccess`] error.
    #[inline]
    pub fn entry_access(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::EntryAccess {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` if this error only affects a single entry.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::EntryAccess { .. } | Self::NonUtf8Path(_))
    }

    /// Returns `true` if this error is a permission failure.
    #[must_use]
    pub fn is_permission_denied(&self) -> bool {
        matches!(
            self,
            Self::EntryAccess { source, .. } if source.kind() == std::io::ErrorKind::PermissionDenied
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_entry_access_is_recoverable() {
        let err = ScanError::entry_access(
            "/data/locked",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.is_recoverable());
        assert!(err.is_permission_denied());
        assert!(err.to_string().contains("/data/locked"));
    }

    #[test]
    fn test_other_io_error_is_not_permission() {
        let err = ScanError::entry_access("/data/x", io::Error::other("disk on fire"));
        assert!(err.is_recoverable());
        assert!(!err.is_permission_denied());
    }

    #[test]
    fn test_invalid_root_is_fatal() {
        let err = ScanError::invalid_root("/missing", "path does not exist");
        assert!(!err.is_recoverable());
        assert_eq!(
            err.to_string(),
            "invalid scan root /missing: path does not exist"
        );
    }

    #[test]
    fn test_non_utf8_is_recoverable() {
        let err = ScanError::NonUtf8Path(std::path::PathBuf::from("bad"));
        assert!(err.is_recoverable());
        assert!(!err.is_permission_denied());
    }
}

//! Progress reporting and diagnostics.
//!
//! The walker pushes two kinds of notifications to a [`ScanObserver`]:
//!
//! - [`ProgressUpdate`] - running counts, throttled by [`ProgressThrottle`]
//! - [`Diagnostic`] - one per recovered entry error
//!
//! Observers run on the walker's thread. The session module forwards both
//! into a channel so they can be consumed on another task.

use std::fmt;

use camino::Utf8PathBuf;
use ds_core::RelativePath;
use serde::{Deserialize, Serialize};

use crate::error::ScanError;

/// Running counts reported while a scan is in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressUpdate {
    /// Files appended so far.
    pub files: u64,
    /// Directories appended so far.
    pub folders: u64,
    /// Entry most recently processed, `None` for the final update of an empty scan.
    pub current: Option<RelativePath>,
}

/// How serious a recovered error is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Permission denied; the branch is skipped.
    Warning,
    /// Any other I/O failure or an undecodable name.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Warning => "warning",
            Self::Error => "error",
        })
    }
}

/// A recovered per-entry error. The scan continues after each one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Warning or error.
    pub severity: Severity,
    /// Absolute path of the entry that failed.
    pub path: Utf8PathBuf,
    /// Human-readable description.
    pub message: String,
}

impl Diagnostic {
    /// Classifies a recoverable scan error.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::io;
    /// use ds_scanner::{Diagnostic, ScanError, Severity};
    ///
    /// let denied = ScanError::entry_access("/srv/private", io::Error::from(io::ErrorKind::PermissionDenied));
    /// assert_eq!(Diagnostic::from_error(&denied).severity, Severity::Warning);
    ///
    /// let broken = ScanError::entry_access("/srv/broken", io::Error::other("I/O error"));
    /// assert_eq!(Diagnostic::from_error(&broken).severity, Severity::Error);
    /// ```
    #[must_use]
    pub fn from_error(error: &ScanError) -> Self {
        let severity = if error.is_permission_denied() {
            Severity::Warning
        } else {
            Severity::Error
        };
        let path = match error {
            ScanError::EntryAccess { path, .. } | ScanError::InvalidRoot { path, .. } => {
                path.clone()
            }
            ScanError::NonUtf8Path(raw) => Utf8PathBuf::from(raw.to_string_lossy().into_owned()),
            ScanError::WorkerFailed(_) => Utf8PathBuf::new(),
        };
        Self {
            severity,
            path,
            message: error.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Receives notifications from the walker.
pub trait ScanObserver {
    /// Called every `progress_interval` files and once when traversal ends.
    fn on_progress(&mut self, update: &ProgressUpdate);

    /// Called for every recovered per-entry error.
    fn on_diagnostic(&mut self, diagnostic: &Diagnostic);
}

/// Discards every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ScanObserver for NoopObserver {
    fn on_progress(&mut self, _update: &ProgressUpdate) {}

    fn on_diagnostic(&mut self, _diagnostic: &Diagnostic) {}
}

/// Keeps every notification in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingObserver {
    /// Progress updates in arrival order.
    pub progress: Vec<ProgressUpdate>,
    /// Diagnostics in arrival order.
    pub diagnostics: Vec<Diagnostic>,
}

impl ScanObserver for CollectingObserver {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        self.progress.push(update.clone());
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

impl<T: ScanObserver + ?Sized> ScanObserver for &mut T {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        (**self).on_progress(update);
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        (**self).on_diagnostic(diagnostic);
    }
}

/// Decides which processed files trigger a progress report.
///
/// # Examples
///
/// ```
/// use ds_scanner::ProgressThrottle;
///
/// let mut throttle = ProgressThrottle::new(3);
/// let fired: Vec<bool> = (0..6).map(|_| throttle.tick()).collect();
/// assert_eq!(fired, [false, false, true, false, false, true]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ProgressThrottle {
    interval: usize,
    seen: usize,
}

impl ProgressThrottle {
    /// Reports every `interval`-th file. Zero behaves like 1.
    #[must_use]
    pub const fn new(interval: usize) -> Self {
        Self {
            interval: if interval == 0 { 1 } else { interval },
            seen: 0,
        }
    }

    /// Counts one file; returns `true` when a report is due.
    pub fn tick(&mut self) -> bool {
        self.seen += 1;
        self.seen % self.interval == 0
    }

    /// The configured interval.
    #[must_use]
    pub const fn interval(&self) -> usize {
        self.interval
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_throttle_interval_one_fires_every_time() {
        let mut throttle = ProgressThrottle::new(1);
        assert!((0..5).all(|_| throttle.tick()));
    }

    #[test]
    fn test_throttle_zero_is_clamped() {
        assert_eq!(ProgressThrottle::new(0).interval(), 1);
    }

    #[test]
    fn test_non_utf8_diagnostic_is_error() {
        let diag = Diagnostic::from_error(&ScanError::NonUtf8Path("x".into()));
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.path, "x");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::from_error(&ScanError::entry_access(
            "/a/b",
            io::Error::from(io::ErrorKind::PermissionDenied),
        ));
        assert!(diag.to_string().starts_with("warning: cannot access /a/b"));
    }

    #[test]
    fn test_collecting_observer_through_mut_ref() {
        fn report(mut observer: impl ScanObserver) {
            observer.on_progress(&ProgressUpdate {
                files: 1,
                folders: 0,
                current: None,
            });
        }

        let mut collector = CollectingObserver::default();
        report(&mut collector);
        assert_eq!(collector.progress.len(), 1);
    }
}

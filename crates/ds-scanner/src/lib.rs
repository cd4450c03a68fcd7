//! Depth-limited directory scanner with cooperative cancellation.
//!
//! This crate is the traversal engine of the dirscan tool. It enumerates a
//! directory tree up to a configured depth, applies the inclusion filter,
//! prunes directories without qualifying content, and reports progress
//! while it runs.
//!
//! # Overview
//!
//! The main entry point is [`Scanner`], which combines:
//!
//! - [`InclusionFilter`]: Hidden-file and extension rules
//! - the walker: Sequential depth-first traversal with post-order pruning
//! - [`ScanStatistics`]: Per-scan counters and the extension breakdown
//! - [`CancellationHandle`]: Cooperative stop signal
//! - [`ScanObserver`]: Progress and diagnostic callbacks
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8Path;
//! use ds_core::ScanConfiguration;
//! use ds_scanner::{CancellationHandle, CollectingObserver, Scanner};
//!
//! let scanner = Scanner::new(ScanConfiguration::new(Utf8Path::new("./data")))?;
//! let mut observer = CollectingObserver::default();
//! let outcome = scanner.scan(&CancellationHandle::new(), &mut observer);
//!
//! println!("{} files, {} folders", outcome.stats.files, outcome.stats.folders);
//! # Ok::<(), ds_scanner::ScanError>(())
//! ```
//!
//! # Background Scans
//!
//! [`ScanController`] runs the scanner on a blocking worker and delivers
//! [`ScanEvent`]s over a bounded channel, so a UI task can consume progress
//! without sharing state with the worker:
//!
//! ```ignore
//! let controller = ScanController::new();
//! let mut scan = controller.start(config).await?;
//!
//! while let Some(event) = scan.events.recv().await {
//!     match event {
//!         ScanEvent::Progress(p) => println!("{} files", p.files),
//!         ScanEvent::Diagnostic(d) => eprintln!("{d}"),
//!         ScanEvent::Complete(outcome) => println!("done: {}", outcome.entries.len()),
//!     }
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod cancel;
mod error;
mod filter;
mod progress;
mod session;
mod stats;
mod walker;

pub use cancel::CancellationHandle;
pub use error::ScanError;
pub use filter::InclusionFilter;
pub use progress::{
    CollectingObserver, Diagnostic, NoopObserver, ProgressThrottle, ProgressUpdate, ScanObserver,
    Severity,
};
pub use session::{ActiveScan, DEFAULT_EVENT_CAPACITY, ScanController, ScanEvent};
pub use stats::{ExtensionStat, ExtensionSummary, ScanStatistics};

use std::time::{Duration, Instant};

use ds_core::{DirectoryEntry, ScanConfiguration};
use tracing::info;

use crate::walker::{Walker, check_root};

/// Everything a finished (or stopped) scan produced.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Entries in traversal order.
    pub entries: Vec<DirectoryEntry>,
    /// Final counters.
    pub stats: ScanStatistics,
    /// `true` when the scan stopped early; `entries` is then partial.
    pub was_cancelled: bool,
    /// Wall-clock time spent traversing.
    pub elapsed: Duration,
}

impl ScanOutcome {
    /// Iterates over file entries only.
    pub fn files(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.iter().filter(|e| e.is_file())
    }
}

/// A validated scan over one root.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use ds_core::ScanConfiguration;
/// use ds_scanner::{ScanError, Scanner};
///
/// let missing = ScanConfiguration::new(Utf8Path::new("/definitely/not/here"));
/// assert!(matches!(Scanner::new(missing), Err(ScanError::InvalidRoot { .. })));
/// ```
#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfiguration,
}

impl Scanner {
    /// Creates a scanner, checking that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidRoot`] before any traversal starts.
    pub fn new(config: ScanConfiguration) -> Result<Self, ScanError> {
        check_root(&config.root)?;
        Ok(Self { config })
    }

    /// The configuration this scanner was built with.
    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ScanConfiguration {
        &self.config
    }

    /// Runs the scan on the calling thread.
    ///
    /// Per-entry failures are reported to `observer` and never abort the
    /// scan. When `cancel` is set the walk unwinds and the outcome carries
    /// whatever was collected up to that point.
    pub fn scan<O: ScanObserver>(&self, cancel: &CancellationHandle, observer: &mut O) -> ScanOutcome {
        info!(
            root = %self.config.root,
            max_depth = self.config.max_depth.get(),
            include_hidden = self.config.include_hidden,
            filter = %self.config.extension_filter,
            show_empty = self.config.show_empty_folders,
            "Starting scan"
        );

        let started = Instant::now();
        let result = Walker::new(&self.config, cancel, observer).run();
        let elapsed = started.elapsed();

        info!(
            files = result.stats.files,
            folders = result.stats.folders,
            cancelled = result.cancelled,
            elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            "Scan finished"
        );

        ScanOutcome {
            entries: result.entries,
            stats: result.stats,
            was_cancelled: result.cancelled,
            elapsed,
        }
    }
}

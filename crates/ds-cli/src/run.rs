//! Drives one background scan to completion.
//!
//! The worker runs on a blocking thread; this task owns the event receiver,
//! the progress line, and the Ctrl-C handler.

use std::io::{IsTerminal, Write};

use color_eyre::eyre::eyre;
use ds_core::ScanConfiguration;
use ds_scanner::{ProgressUpdate, ScanController, ScanEvent, ScanOutcome};
use tracing::{debug, info, warn};

/// Result of a scan as seen by the command layer.
pub struct ScanReport {
    /// Entries, statistics, and the cancellation flag.
    pub outcome: Box<ScanOutcome>,
    /// Number of entries that could not be read.
    pub diagnostics: usize,
}

/// Starts a scan and consumes its events until the worker exits.
///
/// Ctrl-C requests cancellation; the partial outcome is still returned.
pub async fn run_scan(config: ScanConfiguration) -> color_eyre::Result<ScanReport> {
    let controller = ScanController::new();
    let mut scan = controller.start(config).await?;

    let mut progress = ProgressLine::new(std::io::stderr().is_terminal());
    let mut outcome = None;
    let mut diagnostics = 0;
    let mut interrupted = false;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            event = scan.events.recv() => match event {
                Some(ScanEvent::Progress(update)) => progress.show(&update),
                Some(ScanEvent::Diagnostic(diagnostic)) => {
                    debug!(path = %diagnostic.path, "Diagnostic received");
                    diagnostics += 1;
                }
                Some(ScanEvent::Complete(result)) => outcome = Some(result),
                None => break,
            },
            result = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                match result {
                    Ok(()) => {
                        info!("Interrupt received, stopping scan");
                        scan.handle.cancel();
                    }
                    Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
                }
            }
        }
    }

    progress.clear();
    controller.wait().await?;

    let outcome = outcome.ok_or_else(|| eyre!("scan ended without a result"))?;
    Ok(ScanReport {
        outcome,
        diagnostics,
    })
}

/// Single-line progress indicator, drawn only on a terminal.
struct ProgressLine {
    enabled: bool,
    drawn: bool,
}

impl ProgressLine {
    const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            drawn: false,
        }
    }

    fn show(&mut self, update: &ProgressUpdate) {
        if !self.enabled {
            return;
        }
        let current = update
            .current
            .as_ref()
            .map(ToString::to_string)
            .unwrap_or_default();
        let mut stderr = std::io::stderr().lock();
        let _ = write!(
            stderr,
            "\r\x1b[2KScanning... {} files, {} folders  {current}",
            update.files, update.folders
        );
        let _ = stderr.flush();
        self.drawn = true;
    }

    fn clear(&mut self) {
        if self.drawn {
            let mut stderr = std::io::stderr().lock();
            let _ = write!(stderr, "\r\x1b[2K");
            let _ = stderr.flush();
            self.drawn = false;
        }
    }
}

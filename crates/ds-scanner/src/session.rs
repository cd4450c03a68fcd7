//! Background scan controller.
//!
//! The walker is blocking, so [`ScanController`] runs it on
//! [`tokio::task::spawn_blocking`] and forwards every callback as a
//! [`ScanEvent`] over a bounded channel. The receiving task owns all
//! presentation state; the worker never touches it.
//!
//! # Channel Protocol
//!
//! 1. Any number of [`ScanEvent::Progress`] and [`ScanEvent::Diagnostic`]
//! 2. Exactly one [`ScanEvent::Complete`], unless the scan was superseded
//!
//! # Cancellation
//!
//! Dropping the receiver stops the worker at its next send. Starting a new
//! scan cancels the previous one and waits for its worker to exit, so at most
//! one scan is active per controller. Concurrent `start` calls are serialized
//! by an async gate held from taking the previous worker until the new one is
//! stored.

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use ds_core::ScanConfiguration;

use crate::cancel::CancellationHandle;
use crate::error::ScanError;
use crate::progress::{Diagnostic, ProgressUpdate, ScanObserver};
use crate::{ScanOutcome, Scanner};

/// Default bound of the event channel.
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Notification delivered from the scan worker.
///
/// The `Complete` variant is boxed to keep the enum small on the channel.
#[derive(Debug)]
pub enum ScanEvent {
    /// Throttled running counts.
    Progress(ProgressUpdate),
    /// A recovered per-entry error.
    Diagnostic(Diagnostic),
    /// Final result; sent once, also after cancellation.
    Complete(Box<ScanOutcome>),
}

/// A scan in flight, as seen by the consumer.
#[derive(Debug)]
pub struct ActiveScan {
    /// Stops this scan when cancelled.
    pub handle: CancellationHandle,
    /// Events from the worker, in order.
    pub events: mpsc::Receiver<ScanEvent>,
}

#[derive(Debug)]
struct Running {
    handle: CancellationHandle,
    superseded: CancellationToken,
    task: JoinHandle<()>,
}

/// Runs at most one background scan at a time.
#[derive(Debug)]
pub struct ScanController {
    current: Mutex<Option<Running>>,
    gate: AsyncMutex<()>,
    capacity: usize,
}

impl Default for ScanController {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanController {
    /// Creates an idle controller.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    /// Creates an idle controller with a custom channel bound (at least 1).
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            current: Mutex::new(None),
            gate: AsyncMutex::new(()),
            capacity: capacity.max(1),
        }
    }

    /// Validates the root, stops any previous scan, and starts a new one.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidRoot`] before any work starts, or
    /// [`ScanError::WorkerFailed`] if the previous worker panicked.
    pub async fn start(&self, config: ScanConfiguration) -> Result<ActiveScan, ScanError> {
        let scanner = Scanner::new(config)?;
        let _gate = self.gate.lock().await;

        let previous = self.current.lock().take();
        if let Some(previous) = previous {
            debug!("Superseding previous scan");
            previous.handle.cancel();
            previous.superseded.cancel();
            join(previous.task).await?;
        }

        let handle = CancellationHandle::new();
        let superseded = CancellationToken::new();
        let (tx, events) = mpsc::channel(self.capacity);

        let mut observer = ChannelObserver {
            tx,
            cancel: handle.clone(),
            runtime: Handle::current(),
        };
        let worker_cancel = handle.clone();
        let worker_superseded = superseded.clone();

        let task = tokio::task::spawn_blocking(move || {
            let outcome = scanner.scan(&worker_cancel, &mut observer);
            observer.complete(outcome, &worker_superseded);
        });

        *self.current.lock() = Some(Running {
            handle: handle.clone(),
            superseded,
            task,
        });

        Ok(ActiveScan { handle, events })
    }

    /// Requests cancellation of the current scan, if any.
    pub fn cancel(&self) {
        if let Some(running) = self.current.lock().as_ref() {
            running.handle.cancel();
        }
    }

    /// Returns `true` while a worker has not yet exited.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.current
            .lock()
            .as_ref()
            .is_some_and(|running| !running.task.is_finished())
    }

    /// Waits for the current worker to exit.
    ///
    /// The consumer must keep draining its events (or drop the receiver),
    /// otherwise the worker can block on a full channel.
    pub async fn wait(&self) -> Result<(), ScanError> {
        let _gate = self.gate.lock().await;
        let running = self.current.lock().take();
        match running {
            Some(running) => join(running.task).await,
            None => Ok(()),
        }
    }
}

async fn join(task: JoinHandle<()>) -> Result<(), ScanError> {
    task.await.map_err(|e| {
        warn!(error = %e, "Scan worker failed");
        ScanError::WorkerFailed(e.to_string())
    })
}

/// Forwards walker callbacks into the event channel.
struct ChannelObserver {
    tx: mpsc::Sender<ScanEvent>,
    cancel: CancellationHandle,
    runtime: Handle,
}

impl ChannelObserver {
    /// Sends unless the scan was cancelled first; a closed channel cancels the scan.
    fn send(&self, event: ScanEvent) {
        let delivered = self.runtime.block_on(async {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => true,
                sent = self.tx.send(event) => sent.is_ok(),
            }
        });
        if !delivered {
            debug!("Event receiver dropped, cancelling scan");
            self.cancel.cancel();
        }
    }

    fn complete(self, outcome: ScanOutcome, superseded: &CancellationToken) {
        let event = ScanEvent::Complete(Box::new(outcome));
        self.runtime.block_on(async {
            tokio::select! {
                biased;
                () = superseded.cancelled() => {}
                _ = self.tx.send(event) => {}
            }
        });
    }
}

impl ScanObserver for ChannelObserver {
    fn on_progress(&mut self, update: &ProgressUpdate) {
        self.send(ScanEvent::Progress(update.clone()));
    }

    fn on_diagnostic(&mut self, diagnostic: &Diagnostic) {
        self.send(ScanEvent::Diagnostic(diagnostic.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    fn tree() -> (tempfile::TempDir, Utf8PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        std::fs::create_dir(root.join("sub")).unwrap();
        std::fs::write(root.join("a.txt"), "a").unwrap();
        std::fs::write(root.join("sub/b.txt"), "b").unwrap();
        (dir, root)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_events_end_with_complete() {
        let (_dir, root) = tree();
        let controller = ScanController::new();
        let mut scan = controller
            .start(ScanConfiguration::new(&root).with_progress_interval(1))
            .await
            .unwrap();

        let mut progress = 0;
        let mut diagnostics = Vec::new();
        let mut outcome = None;
        while let Some(event) = scan.events.recv().await {
            match event {
                ScanEvent::Progress(_) => progress += 1,
                ScanEvent::Diagnostic(d) => diagnostics.push(d),
                ScanEvent::Complete(o) => outcome = Some(o),
            }
        }

        let outcome = outcome.unwrap();
        assert!(diagnostics.is_empty());
        assert!(!outcome.was_cancelled);
        assert_eq!(outcome.stats.files, 2);
        assert_eq!(progress, 3);
        controller.wait().await.unwrap();
        assert!(!controller.is_running());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_invalid_root_fails_before_spawning() {
        let controller = ScanController::new();
        let result = controller
            .start(ScanConfiguration::new(&Utf8PathBuf::from("/no/such/dir/anywhere")))
            .await;
        assert!(matches!(result, Err(ScanError::InvalidRoot { .. })));
        assert!(!controller.is_running());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancel_before_walk_reports_cancelled() {
        let (_dir, root) = tree();
        let controller = ScanController::with_capacity(1);
        let mut scan = controller.start(ScanConfiguration::new(&root)).await.unwrap();
        scan.handle.cancel();

        let mut last = None;
        while let Some(event) = scan.events.recv().await {
            if let ScanEvent::Complete(o) = event {
                last = Some(o);
            }
        }
        // The worker may have finished before the cancel landed.
        let outcome = last.unwrap();
        assert!(outcome.was_cancelled || outcome.stats.files == 2);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_restart_supersedes_previous_scan() {
        let (_dir, root) = tree();
        let controller = ScanController::with_capacity(1);

        let first = controller.start(ScanConfiguration::new(&root)).await.unwrap();
        let second = controller.start(ScanConfiguration::new(&root)).await.unwrap();

        assert!(first.handle.is_cancelled());
        assert!(!second.handle.is_cancelled());
        drop(first);
        drop(second);
        controller.wait().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_dropped_receiver_cancels_worker() {
        let dir = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        for i in 0..50 {
            std::fs::write(root.join(format!("f{i:02}.txt")), "x").unwrap();
        }

        let controller = ScanController::with_capacity(1);
        let scan = controller
            .start(ScanConfiguration::new(&root).with_progress_interval(1))
            .await
            .unwrap();
        let handle = scan.handle.clone();
        drop(scan);

        controller.wait().await.unwrap();
        assert!(handle.is_cancelled());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_concurrent_starts_leave_one_live_scan() {
        let (_dir, root) = tree();
        let config = ScanConfiguration::new(&root);
        let controller = ScanController::with_capacity(1);

        let first = controller.start(config.clone()).await.unwrap();
        let (second, third) = tokio::join!(
            controller.start(config.clone()),
            controller.start(config.clone())
        );
        let (second, third) = (second.unwrap(), third.unwrap());

        assert!(first.handle.is_cancelled());
        assert_ne!(second.handle.is_cancelled(), third.handle.is_cancelled());

        controller.cancel();
        assert!(second.handle.is_cancelled());
        assert!(third.handle.is_cancelled());

        drop((first, second, third));
        controller.wait().await.unwrap();
        assert!(!controller.is_running());
    }
}

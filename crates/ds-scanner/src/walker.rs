//! Depth-limited recursive traversal with post-order directory pruning.
//!
//! This module provides [`Walker`], the engine behind [`Scanner::scan`].
//! One call of [`Walker::visit_dir`] handles one directory level:
//!
//! 1. Stop if cancellation was requested or the depth limit is reached
//! 2. List the directory; unreadable directories become diagnostics
//! 3. Sort by name (codepoint order) and split into files and subdirectories
//! 4. Append qualifying files, updating statistics and progress
//! 5. Recurse into subdirectories, keeping each one only if it produced
//!    content (or empty folders are requested)
//!
//! Traversal is sequential and depth-first. The recursion depth is bounded
//! by [`MaxDepth::MAX`](ds_core::MaxDepth::MAX).
//!
//! [`Scanner::scan`]: crate::Scanner::scan

use std::fs;
use std::io;
use std::time::SystemTime;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, Local};
use ds_core::{DirectoryEntry, EntrySize, RelativePath, ScanConfiguration, extension_of};
use tracing::{debug, error, warn};

use crate::cancel::CancellationHandle;
use crate::error::ScanError;
use crate::filter::InclusionFilter;
use crate::progress::{Diagnostic, ProgressThrottle, ProgressUpdate, ScanObserver};
use crate::stats::ScanStatistics;

/// How a listed entry is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Listed {
    File,
    Dir,
}

/// Entries accumulated by one traversal.
#[derive(Debug, Default)]
pub(crate) struct WalkResult {
    pub(crate) entries: Vec<DirectoryEntry>,
    pub(crate) stats: ScanStatistics,
    pub(crate) cancelled: bool,
}

/// A single-use traversal over one scan root.
pub(crate) struct Walker<'a, O: ScanObserver> {
    config: &'a ScanConfiguration,
    filter: InclusionFilter,
    cancel: &'a CancellationHandle,
    observer: O,
    throttle: ProgressThrottle,
    result: WalkResult,
    current: Option<RelativePath>,
    last_reported: Option<(u64, u64)>,
}

impl<'a, O: ScanObserver> Walker<'a, O> {
    pub(crate) fn new(
        config: &'a ScanConfiguration,
        cancel: &'a CancellationHandle,
        observer: O,
    ) -> Self {
        Self {
            config,
            filter: InclusionFilter::new(config),
            cancel,
            observer,
            throttle: ProgressThrottle::new(config.progress_interval),
            result: WalkResult::default(),
            current: None,
            last_reported: None,
        }
    }

    /// Walks from the root and returns everything collected.
    ///
    /// A final progress update is sent, also when the scan was cancelled,
    /// unless the last throttled update already carried the final counts.
    pub(crate) fn run(mut self) -> WalkResult {
        let root = self.config.root.clone();
        self.visit_dir(&root, &RelativePath::root(), 0);
        let counts = (self.result.stats.files, self.result.stats.folders);
        if self.last_reported != Some(counts) {
            self.emit_progress();
        }
        self.result.cancelled = self.cancel.is_cancelled();
        self.result
    }

    /// Processes one directory level; returns whether it contributed content.
    fn visit_dir(&mut self, dir: &Utf8Path, rel: &RelativePath, depth: usize) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        if depth >= self.config.max_depth.get() {
            return false;
        }

        let listing = match self.list(dir) {
            Ok(listing) => listing,
            Err(e) => {
                self.report(&e);
                return false;
            }
        };

        let mut has_content = false;

        for (name, _) in listing.iter().filter(|(_, kind)| *kind == Listed::File) {
            if self.cancel.is_cancelled() {
                return has_content;
            }
            if !self.filter.should_include_file(name) {
                continue;
            }
            self.add_file(&dir.join(name), rel.join(name));
            has_content = true;
        }

        for (name, _) in listing.iter().filter(|(_, kind)| *kind == Listed::Dir) {
            if self.cancel.is_cancelled() {
                return has_content;
            }
            if !self.filter.should_include_dir(name) {
                continue;
            }

            let child_path = dir.join(name);
            let child_rel = rel.join(name);
            let child_has_content = self.visit_dir(&child_path, &child_rel, depth + 1);

            let keep = child_has_content
                || (self.config.show_empty_folders && !self.cancel.is_cancelled());
            if keep {
                let modified = fs::metadata(&child_path)
                    .and_then(|m| m.modified())
                    .ok()
                    .map(to_local);
                self.result
                    .entries
                    .push(DirectoryEntry::directory(child_rel, modified));
                self.result.stats.record_folder();
                has_content = true;
            } else {
                debug!(path = %child_rel, "Pruned directory without content");
            }
        }

        has_content
    }

    /// Lists `dir` sorted by name, classifying each entry.
    fn list(&mut self, dir: &Utf8Path) -> Result<Vec<(String, Listed)>, ScanError> {
        let read = fs::read_dir(dir).map_err(|e| ScanError::entry_access(dir, e))?;
        let mut listing = Vec::new();

        for item in read {
            let item = match item {
                Ok(item) => item,
                Err(e) => {
                    self.report(&ScanError::entry_access(dir, e));
                    continue;
                }
            };

            let name = match item.file_name().into_string() {
                Ok(name) => name,
                Err(_) => {
                    self.report(&ScanError::NonUtf8Path(item.path()));
                    continue;
                }
            };

            match self.classify(&dir.join(&name), &item) {
                Ok(Some(kind)) => listing.push((name, kind)),
                Ok(None) => {}
                Err(e) => self.report(&e),
            }
        }

        listing.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(listing)
    }

    /// Returns `None` for symlinked directories that must not be followed.
    fn classify(&self, path: &Utf8Path, item: &fs::DirEntry) -> Result<Option<Listed>, ScanError> {
        let file_type = item
            .file_type()
            .map_err(|e| ScanError::entry_access(path, e))?;

        if file_type.is_dir() {
            return Ok(Some(Listed::Dir));
        }
        if !file_type.is_symlink() {
            return Ok(Some(Listed::File));
        }

        // Broken links are listed as files with unknown metadata.
        match fs::metadata(path) {
            Ok(target) if target.is_dir() => {
                if self.config.follow_links {
                    Ok(Some(Listed::Dir))
                } else {
                    debug!(path = %path, "Skipping symlinked directory");
                    Ok(None)
                }
            }
            _ => Ok(Some(Listed::File)),
        }
    }

    fn add_file(&mut self, path: &Utf8Path, rel: RelativePath) {
        let (size, modified) = match fs::metadata(path) {
            Ok(meta) => (
                EntrySize::Bytes(meta.len()),
                meta.modified().ok().map(to_local),
            ),
            Err(e) => {
                debug!(path = %path, error = %e, "Metadata unavailable, using sentinels");
                (EntrySize::Unknown, None)
            }
        };

        let entry = DirectoryEntry::file(rel, size, modified);
        self.result
            .stats
            .record_file(extension_of(&entry.name).as_deref(), size.bytes());
        self.current = Some(entry.path.clone());
        self.result.entries.push(entry);

        if self.throttle.tick() {
            self.emit_progress();
        }
    }

    fn emit_progress(&mut self) {
        let update = ProgressUpdate {
            files: self.result.stats.files,
            folders: self.result.stats.folders,
            current: self.current.clone(),
        };
        self.last_reported = Some((update.files, update.folders));
        self.observer.on_progress(&update);
    }

    fn report(&mut self, err: &ScanError) {
        if err.is_permission_denied() {
            warn!(error = %err, "Permission denied, skipping");
        } else {
            error!(error = %err, "Failed to read entry, skipping");
        }
        self.observer.on_diagnostic(&Diagnostic::from_error(err));
    }
}

fn to_local(time: SystemTime) -> DateTime<Local> {
    DateTime::<Local>::from(time)
}

/// Validates that `root` exists and is a directory.
pub(crate) fn check_root(root: &Utf8Path) -> Result<Utf8PathBuf, ScanError> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(root.to_owned()),
        Ok(_) => Err(ScanError::invalid_root(root, "not a directory")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(ScanError::invalid_root(root, "path does not exist"))
        }
        Err(e) => Err(ScanError::invalid_root(root, e.to_string())),
    }
}

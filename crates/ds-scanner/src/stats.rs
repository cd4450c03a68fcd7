//! Running scan statistics.
//!
//! This module provides [`ScanStatistics`], the counters the walker updates
//! while it appends entries, and [`ExtensionSummary`] for the per-extension
//! breakdown shown after a scan.
//!
//! Statistics are owned by a single scan and mutated only by its walker, so
//! plain integers are enough; the finished value is moved into the outcome.
//!
//! # Examples
//!
//! ```
//! use ds_scanner::ScanStatistics;
//!
//! let mut stats = ScanStatistics::new();
//! stats.record_file(Some(".txt"), Some(100));
//! stats.record_file(Some(".txt"), Some(300));
//! stats.record_file(None, None);
//! stats.record_folder();
//!
//! assert_eq!(stats.files, 3);
//! assert_eq!(stats.folders, 1);
//! assert_eq!(stats.extension_count_sum(), 3);
//!
//! let breakdown = stats.breakdown();
//! assert_eq!(breakdown[0].extension, ".txt");
//! assert_eq!(breakdown[0].average_size, 200);
//! assert_eq!(breakdown[1].extension, "no-extension");
//! ```

use ds_core::{FxHashMap, NO_EXTENSION};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Count and cumulative size for one extension bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionStat {
    /// Number of files in the bucket.
    pub count: u64,
    /// Sum of known file sizes in bytes.
    pub total_size: u64,
}

/// One row of the per-extension breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtensionSummary {
    /// Dotted lower-case extension, or `no-extension`.
    pub extension: String,
    /// Number of files.
    pub count: u64,
    /// Sum of known sizes.
    pub total_size: u64,
    /// `total_size / count`, rounded down.
    pub average_size: u64,
}

/// Counters for one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStatistics {
    /// Files appended to the result.
    pub files: u64,
    /// Directories appended to the result.
    pub folders: u64,
    /// Per-extension buckets keyed by dotted lower-case extension.
    pub extensions: FxHashMap<String, ExtensionStat>,
}

impl ScanStatistics {
    /// Creates empty statistics.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one file. Unknown sizes count toward the file total but add no bytes.
    pub fn record_file(&mut self, extension: Option<&str>, size: Option<u64>) {
        self.files += 1;
        let key = extension.unwrap_or(NO_EXTENSION);
        let bucket = self.extensions.entry(key.to_owned()).or_default();
        bucket.count += 1;
        bucket.total_size += size.unwrap_or(0);
    }

    /// Counts one kept directory.
    #[inline]
    pub fn record_folder(&mut self) {
        self.folders += 1;
    }

    /// Sum of all known file sizes.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.extensions.values().map(|s| s.total_size).sum()
    }

    /// Sum of the per-extension counts; equals [`files`](Self::files).
    #[must_use]
    pub fn extension_count_sum(&self) -> u64 {
        self.extensions.values().map(|s| s.count).sum()
    }

    /// Buckets sorted by count (descending), ties broken by extension.
    #[must_use]
    pub fn breakdown(&self) -> Vec<ExtensionSummary> {
        let mut rows: Vec<ExtensionSummary> = self
            .extensions
            .iter()
            .map(|(ext, stat)| ExtensionSummary {
                extension: ext.clone(),
                count: stat.count,
                total_size: stat.total_size,
                average_size: stat.total_size.checked_div(stat.count).unwrap_or(0),
            })
            .collect();
        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));
        rows
    }
}

impl Serialize for ScanStatistics {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ScanStatistics", 4)?;
        state.serialize_field("files", &self.files)?;
        state.serialize_field("folders", &self.folders)?;
        state.serialize_field("total_size", &self.total_size())?;
        state.serialize_field("extensions", &self.breakdown())?;
        state.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let stats = ScanStatistics::new();
        assert_eq!(stats.files, 0);
        assert_eq!(stats.folders, 0);
        assert_eq!(stats.total_size(), 0);
        assert!(stats.breakdown().is_empty());
    }

    #[test]
    fn test_unknown_size_counts_file() {
        let mut stats = ScanStatistics::new();
        stats.record_file(Some(".bin"), None);
        assert_eq!(stats.files, 1);
        assert_eq!(stats.extensions[".bin"].count, 1);
        assert_eq!(stats.extensions[".bin"].total_size, 0);
    }

    #[test]
    fn test_breakdown_order() {
        let mut stats = ScanStatistics::new();
        stats.record_file(Some(".md"), Some(1));
        stats.record_file(Some(".rs"), Some(10));
        stats.record_file(Some(".rs"), Some(20));
        stats.record_file(Some(".c"), Some(5));

        let order: Vec<String> = stats.breakdown().into_iter().map(|r| r.extension).collect();
        assert_eq!(order, [".rs", ".c", ".md"]);
        assert_eq!(stats.total_size(), 36);
    }

    #[test]
    fn test_serialized_form() {
        let mut stats = ScanStatistics::new();
        stats.record_file(Some(".txt"), Some(10));
        stats.record_file(None, Some(4));
        stats.record_folder();

        let json = serde_json::to_string(&stats).unwrap();
        insta::assert_snapshot!(json, @r#"{"files":2,"folders":1,"total_size":14,"extensions":[{"extension":".txt","count":1,"total_size":10,"average_size":10},{"extension":"no-extension","count":1,"total_size":4,"average_size":4}]}"#);
    }
}

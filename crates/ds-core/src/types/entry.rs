//! Result-set records produced by a directory scan.
//!
//! A scan yields a flat list of [`DirectoryEntry`] values in traversal order.
//! Each entry is either a file that passed the inclusion filter or a
//! directory that was kept by the pruning rule.

use std::fmt;

use camino::Utf8Path;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use super::path::RelativePath;
use crate::format::{format_size, format_timestamp};

/// Display value used when a size or timestamp could not be read.
pub const UNKNOWN_SENTINEL: &str = "unknown";

/// Display value used for the size column of directories.
pub const NOT_APPLICABLE_SENTINEL: &str = "-";

/// Statistics bucket for files without an extension.
pub const NO_EXTENSION: &str = "no-extension";

/// The kind of a result-set entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    /// A regular file (or a symlink resolving to one).
    File,
    /// A directory.
    Directory,
}

impl EntryKind {
    /// Returns the lower-case display label.
    ///
    /// # Examples
    ///
    /// ```
    /// use ds_core::EntryKind;
    ///
    /// assert_eq!(EntryKind::File.label(), "file");
    /// assert_eq!(EntryKind::Directory.label(), "directory");
    /// ```
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Directory => "directory",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Size of an entry, with explicit sentinels instead of magic numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntrySize {
    /// Byte count of a file.
    Bytes(u64),
    /// The size could not be read (permission error, file vanished).
    Unknown,
    /// Directories carry no size.
    NotApplicable,
}

impl EntrySize {
    /// Returns the byte count, if known.
    #[inline]
    #[must_use]
    pub const fn bytes(self) -> Option<u64> {
        match self {
            Self::Bytes(n) => Some(n),
            Self::Unknown | Self::NotApplicable => None,
        }
    }
}

impl fmt::Display for EntrySize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bytes(n) => f.write_str(&format_size(*n)),
            Self::Unknown => f.write_str(UNKNOWN_SENTINEL),
            Self::NotApplicable => f.write_str(NOT_APPLICABLE_SENTINEL),
        }
    }
}

/// A single record in the scan result set.
///
/// # Examples
///
/// ```
/// use ds_core::{DirectoryEntry, EntryKind, EntrySize, RelativePath};
///
/// let entry = DirectoryEntry::file(
///     RelativePath::from_segments(["docs", "Report.TXT"]),
///     EntrySize::Bytes(2048),
///     None,
/// );
///
/// assert_eq!(entry.kind, EntryKind::File);
/// assert_eq!(entry.name, "Report.TXT");
/// assert_eq!(entry.extension().as_deref(), Some(".txt"));
/// assert_eq!(entry.size.to_string(), "2.0 KB");
/// assert_eq!(entry.modified_display(), "unknown");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryEntry {
    /// Path relative to the scan root.
    pub path: RelativePath,

    /// Base name (final path segment).
    pub name: String,

    /// File or directory.
    pub kind: EntryKind,

    /// Byte size for files; [`EntrySize::NotApplicable`] for directories.
    pub size: EntrySize,

    /// Last modification time, `None` when it could not be read.
    pub modified: Option<DateTime<Local>>,
}

impl DirectoryEntry {
    /// Creates a file entry.
    #[must_use]
    pub fn file(path: RelativePath, size: EntrySize, modified: Option<DateTime<Local>>) -> Self {
        let name = path.name().unwrap_or_default().to_owned();
        Self {
            path,
            name,
            kind: EntryKind::File,
            size,
            modified,
        }
    }

    /// Creates a directory entry. Directories never carry a size.
    #[must_use]
    pub fn directory(path: RelativePath, modified: Option<DateTime<Local>>) -> Self {
        let name = path.name().unwrap_or_default().to_owned();
        Self {
            path,
            name,
            kind: EntryKind::Directory,
            size: EntrySize::NotApplicable,
            modified,
        }
    }

    /// Returns `true` for file entries.
    #[inline]
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Returns `true` for directory entries.
    #[inline]
    #[must_use]
    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Lower-cased dotted extension of the entry name.
    pub fn extension(&self) -> Option<String> {
        extension_of(&self.name)
    }

    /// Modification time as `YYYY-MM-DD HH:MM:SS`, or `"unknown"`.
    pub fn modified_display(&self) -> String {
        self.modified
            .as_ref()
            .map_or_else(|| UNKNOWN_SENTINEL.to_owned(), format_timestamp)
    }
}

/// Returns the lower-cased, dotted extension of a file name.
///
/// Only the suffix after the last dot counts. Names that merely start with a
/// dot (`.bashrc`) or that end in a dot have no extension.
///
/// # Examples
///
/// ```
/// use ds_core::extension_of;
///
/// assert_eq!(extension_of("archive.TAR.GZ").as_deref(), Some(".gz"));
/// assert_eq!(extension_of(".hidden.txt").as_deref(), Some(".txt"));
/// assert_eq!(extension_of(".bashrc"), None);
/// assert_eq!(extension_of("Makefile"), None);
/// ```
pub fn extension_of(name: &str) -> Option<String> {
    Utf8Path::new(name)
        .extension()
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext.to_lowercase()))
}

//! Presentation-only column sorting.
//!
//! The scanner always returns entries in traversal order; these helpers
//! reorder a copy for display when the user picks a column.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::types::DirectoryEntry;

/// A sortable column of the detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortColumn {
    /// Base name.
    Name,
    /// Relative path.
    Path,
    /// File or directory.
    Kind,
    /// Byte size.
    Size,
    /// Modification time.
    Modified,
    /// Lower-cased extension.
    Extension,
}

impl SortColumn {
    /// Every column, in display order.
    pub const ALL: [Self; 6] = [
        Self::Name,
        Self::Path,
        Self::Kind,
        Self::Size,
        Self::Modified,
        Self::Extension,
    ];

    /// Lower-case column name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Path => "path",
            Self::Kind => "kind",
            Self::Size => "size",
            Self::Modified => "modified",
            Self::Extension => "extension",
        }
    }

    fn compare(self, a: &DirectoryEntry, b: &DirectoryEntry) -> Ordering {
        match self {
            Self::Name => cmp_case_insensitive(&a.name, &b.name),
            Self::Path => cmp_case_insensitive(&a.path.to_string(), &b.path.to_string()),
            Self::Kind => a.kind.label().cmp(b.kind.label()),
            Self::Size => size_key(a).cmp(&size_key(b)),
            Self::Modified => a.modified.cmp(&b.modified),
            Self::Extension => a
                .extension()
                .unwrap_or_default()
                .cmp(&b.extension().unwrap_or_default()),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SortColumn {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ConfigError::invalid_option("sort", format!("unknown column '{wanted}'")))
    }
}

/// Current sort column and direction of a view.
///
/// # Examples
///
/// ```
/// use ds_core::{SortColumn, SortState};
///
/// let state = SortState::by(SortColumn::Size);
/// assert_eq!(state.column, Some(SortColumn::Size));
/// assert!(!state.descending);
/// assert_eq!(SortState::default().column, None);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortState {
    /// Column to sort by; `None` keeps traversal order.
    pub column: Option<SortColumn>,
    /// Reverse the ordering.
    pub descending: bool,
}

impl SortState {
    /// Ascending sort on `column`.
    #[must_use]
    pub const fn by(column: SortColumn) -> Self {
        Self {
            column: Some(column),
            descending: false,
        }
    }
}

/// Sorts entries in place. Equal keys keep their relative order.
pub fn sort_entries(entries: &mut [DirectoryEntry], state: SortState) {
    let Some(column) = state.column else {
        return;
    };
    entries.sort_by(|a, b| {
        let ord = column.compare(a, b);
        if state.descending { ord.reverse() } else { ord }
    });
}

fn cmp_case_insensitive(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

fn size_key(entry: &DirectoryEntry) -> u64 {
    entry.size.bytes().unwrap_or(0)
}

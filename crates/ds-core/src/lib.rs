//! Core types, configuration, and formatting for the dirscan tool.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Domain types ([`DirectoryEntry`], [`EntryKind`], [`EntrySize`], [`RelativePath`])
//! - Scan configuration and persisted settings ([`ScanConfiguration`], [`Config`])
//! - Size and timestamp formatting for display and sorting
//! - Export preparation ([`files_only`], [`write_csv`], [`write_json`], [`write_xlsx`])
//! - Presentation-only column sorting ([`sort_entries`])
//! - Type aliases for `FxHashMap`/`FxHashSet` (faster than std)

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod hash;
pub mod sort;
pub mod types;

pub use config::{
    Config, DEFAULT_PROGRESS_INTERVAL, ExportSettings, ExtensionFilter, FilterPreset, MaxDepth,
    ScanConfiguration, ScanSettings,
};
pub use error::{ConfigError, ExportError};
pub use export::{
    ExportFormat, ExportRecord, XLSX_SHEET_NAME, files_only, write_csv, write_json, write_xlsx,
};
pub use format::{
    TIMESTAMP_FORMAT, format_duration, format_size, format_timestamp, parse_size, parse_timestamp,
};
pub use hash::{FxHashMap, FxHashSet};
pub use sort::{SortColumn, SortState, sort_entries};
pub use types::{
    DirectoryEntry, EntryKind, EntrySize, NO_EXTENSION, NOT_APPLICABLE_SENTINEL, RelativePath,
    UNKNOWN_SENTINEL, extension_of,
};

//! Domain types for dirscan.
//!
//! # Module Organization
//!
//! - [`entry`] - Result-set records, kinds and size sentinels
//! - [`path`] - Scan-root-relative paths
//!
//! All public types are re-exported at this module level and at the crate
//! root:
//!
//! ```
//! use ds_core::{DirectoryEntry, EntryKind, RelativePath};
//! ```

pub mod entry;
pub mod path;

pub use entry::{
    extension_of, DirectoryEntry, EntryKind, EntrySize, NO_EXTENSION, NOT_APPLICABLE_SENTINEL,
    UNKNOWN_SENTINEL,
};
pub use path::RelativePath;

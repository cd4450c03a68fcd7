//! Inclusion filter applied to every directory entry during traversal.
//!
//! Two rules decide whether an entry participates in a scan:
//!
//! - **Hidden-file rule**: names starting with `.` are rejected unless hidden
//!   entries are included. Applies to files and directories alike.
//! - **Extension rule**: files only. When the configured filter is not the
//!   wildcard, a file passes only if its extension is on the allow-list.
//!
//! Directories are never filtered by extension; whether they appear in the
//! result is decided by the pruning rule in the walker.

use ds_core::{ExtensionFilter, ScanConfiguration, extension_of};

/// Pure predicate over entry names, built once per scan.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use ds_core::{ExtensionFilter, ScanConfiguration};
/// use ds_scanner::InclusionFilter;
///
/// let config = ScanConfiguration::new(Utf8Path::new("."))
///     .with_extension_filter(ExtensionFilter::parse(".txt,doc"));
/// let filter = InclusionFilter::new(&config);
///
/// assert!(filter.should_include_file("a.txt"));
/// assert!(filter.should_include_file("b.DOC"));
/// assert!(!filter.should_include_file("c.pdf"));
/// assert!(!filter.should_include_file(".hidden.txt"));
/// assert!(filter.should_include_dir("docs.pdf"));
/// assert!(!filter.should_include_dir(".git"));
/// ```
#[derive(Debug, Clone)]
pub struct InclusionFilter {
    include_hidden: bool,
    extensions: ExtensionFilter,
}

impl InclusionFilter {
    /// Builds the filter from a scan configuration.
    #[must_use]
    pub fn new(config: &ScanConfiguration) -> Self {
        Self {
            include_hidden: config.include_hidden,
            extensions: config.extension_filter.clone(),
        }
    }

    /// Returns `true` if `name` carries the hidden-file marker.
    #[inline]
    #[must_use]
    pub fn is_hidden(name: &str) -> bool {
        name.starts_with('.')
    }

    /// Hidden-file rule only.
    #[inline]
    #[must_use]
    pub fn should_include_dir(&self, name: &str) -> bool {
        self.include_hidden || !Self::is_hidden(name)
    }

    /// Hidden-file rule followed by the extension rule.
    #[must_use]
    pub fn should_include_file(&self, name: &str) -> bool {
        if !self.should_include_dir(name) {
            return false;
        }
        if self.extensions.is_all() {
            return true;
        }
        self.extensions.allows(extension_of(name).as_deref())
    }
}

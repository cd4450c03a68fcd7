//! Configuration structures for dirscan.
//!
//! This module provides:
//!
//! - [`ExtensionFilter`] - Extension allow-list parsed from user input
//! - [`FilterPreset`] - Quick-select extension groups (documents, images, ...)
//! - [`MaxDepth`] - Validated traversal depth limit
//! - [`ScanConfiguration`] - The immutable per-scan settings consumed by the engine
//! - [`Config`] - Persisted settings (JSON) combining scan and export defaults
//!
//! A [`ScanConfiguration`] is built once per scan request and handed to the
//! scanner by value; changing settings only affects the next scan.

use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::export::ExportFormat;
use crate::hash::FxHashSet;

/// Tokens that select every extension.
const WILDCARD_TOKENS: &[&str] = &["*", "all"];

/// Default number of processed files between progress reports.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;

// =============================================================================
// EXTENSION FILTER
// =============================================================================

/// Extension allow-list applied to files (never to directories).
///
/// Tokens are matched case-insensitively and may be written with or without
/// a leading dot; both spellings normalize to the same entry.
///
/// # Examples
///
/// ```
/// use ds_core::ExtensionFilter;
///
/// let filter = ExtensionFilter::parse(".txt, DOC");
/// assert!(filter.allows(Some(".txt")));
/// assert!(filter.allows(Some("doc")));
/// assert!(!filter.allows(Some(".pdf")));
/// assert!(!filter.allows(None));
///
/// assert!(ExtensionFilter::parse("*").is_all());
/// assert!(ExtensionFilter::parse("All").is_all());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExtensionFilter {
    /// Every file passes.
    #[default]
    All,
    /// Only files whose extension (undotted, lower-case) is in the set pass.
    Only(FxHashSet<String>),
}

impl ExtensionFilter {
    /// Parses a comma-separated extension list.
    ///
    /// Empty input, `*` and `all` select every file, as does a list made only
    /// of empty tokens. A bare `.` token selects files without an extension.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty()
            || WILDCARD_TOKENS
                .iter()
                .any(|w| trimmed.eq_ignore_ascii_case(w))
        {
            return Self::All;
        }

        let tokens: FxHashSet<String> = trimmed.split(',').filter_map(normalize_token).collect();

        if tokens.is_empty() {
            Self::All
        } else {
            Self::Only(tokens)
        }
    }

    /// Returns `true` for the wildcard filter.
    #[inline]
    #[must_use]
    pub const fn is_all(&self) -> bool {
        matches!(self, Self::All)
    }

    /// Checks an extension (dotted or undotted, any case) against the filter.
    ///
    /// `None` means the file has no extension; besides the wildcard it only
    /// passes a filter that lists a bare `.`. The extension is compared as
    /// given, so surrounding whitespace is significant.
    #[must_use]
    pub fn allows(&self, extension: Option<&str>) -> bool {
        match self {
            Self::All => true,
            Self::Only(allowed) => {
                let ext = extension.unwrap_or_default().to_lowercase();
                allowed.contains(ext.strip_prefix('.').unwrap_or(&ext))
            }
        }
    }
}

impl fmt::Display for ExtensionFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("*"),
            Self::Only(allowed) => {
                let mut sorted: Vec<&String> = allowed.iter().collect();
                sorted.sort();
                for (i, ext) in sorted.into_iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, ".{ext}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<FilterPreset> for ExtensionFilter {
    fn from(preset: FilterPreset) -> Self {
        Self::parse(preset.extensions())
    }
}

/// Trims and lower-cases a token and strips one leading dot.
///
/// Empty tokens are dropped; `.` becomes the empty extension.
fn normalize_token(token: &str) -> Option<String> {
    let token = token.trim();
    if token.is_empty() {
        return None;
    }
    Some(token.strip_prefix('.').unwrap_or(token).to_lowercase())
}

// =============================================================================
// FILTER PRESETS
// =============================================================================

/// Quick-select groups of extensions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum FilterPreset {
    /// No restriction.
    #[default]
    All,
    /// Text documents.
    Documents,
    /// Slide decks.
    Presentations,
    /// Spreadsheets and tabular data.
    Spreadsheets,
    /// Raster and vector images.
    Images,
    /// Audio files.
    Audio,
    /// Video files.
    Video,
    /// Compressed archives.
    Archives,
    /// Source code.
    Code,
}

impl FilterPreset {
    /// Every preset, in menu order.
    pub const ALL: [Self; 9] = [
        Self::All,
        Self::Documents,
        Self::Presentations,
        Self::Spreadsheets,
        Self::Images,
        Self::Audio,
        Self::Video,
        Self::Archives,
        Self::Code,
    ];

    /// The extension list this preset expands to.
    ///
    /// # Examples
    ///
    /// ```
    /// use ds_core::FilterPreset;
    ///
    /// assert_eq!(FilterPreset::All.extensions(), "*");
    /// assert!(FilterPreset::Images.extensions().contains(".png"));
    /// ```
    #[must_use]
    pub const fn extensions(self) -> &'static str {
        match self {
            Self::All => "*",
            Self::Documents => ".txt,.doc,.docx,.pdf,.rtf,.odt",
            Self::Presentations => ".ppt,.pptx,.odp",
            Self::Spreadsheets => ".xls,.xlsx,.csv,.ods",
            Self::Images => ".jpg,.jpeg,.png,.gif,.bmp,.svg,.tiff",
            Self::Audio => ".mp3,.wav,.flac,.aac,.ogg,.m4a",
            Self::Video => ".mp4,.avi,.mkv,.mov,.wmv,.flv,.webm",
            Self::Archives => ".zip,.rar,.7z,.tar,.gz,.bz2",
            Self::Code => ".py,.js,.html,.css,.java,.cpp,.c,.php",
        }
    }

    /// Stable lower-case name used on the command line and in settings.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Documents => "documents",
            Self::Presentations => "presentations",
            Self::Spreadsheets => "spreadsheets",
            Self::Images => "images",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Archives => "archives",
            Self::Code => "code",
        }
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FilterPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| {
                let names: Vec<&str> = Self::ALL.iter().map(|p| p.name()).collect();
                ConfigError::invalid_option(
                    "preset",
                    format!("unknown preset '{wanted}', expected one of: {}", names.join(", ")),
                )
            })
    }
}

// =============================================================================
// DEPTH LIMIT
// =============================================================================

/// Maximum traversal depth, validated to `1..=50`.
///
/// Depth is counted in path segments below the scan root: with a limit of 2,
/// `a.txt` and `sub/b.txt` are reachable but `sub/deep/c.txt` is not.
///
/// # Examples
///
/// ```
/// use ds_core::MaxDepth;
///
/// assert_eq!(MaxDepth::new(2).unwrap().get(), 2);
/// assert!(MaxDepth::new(0).is_err());
/// assert!(MaxDepth::new(51).is_err());
/// assert_eq!(MaxDepth::default().get(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaxDepth(u8);

impl MaxDepth {
    /// Smallest accepted depth.
    pub const MIN: usize = 1;
    /// Largest accepted depth.
    pub const MAX: usize = 50;

    /// Validates and wraps a depth limit.
    pub fn new(depth: usize) -> Result<Self, ConfigError> {
        if (Self::MIN..=Self::MAX).contains(&depth) {
            u8::try_from(depth)
                .map(Self)
                .map_err(|e| ConfigError::invalid_option("max_depth", e.to_string()))
        } else {
            Err(ConfigError::invalid_option(
                "max_depth",
                format!(
                    "must be between {} and {}, got {depth}",
                    Self::MIN,
                    Self::MAX
                ),
            ))
        }
    }

    /// Returns the limit as a segment count.
    #[inline]
    #[must_use]
    pub const fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for MaxDepth {
    fn default() -> Self {
        Self(3)
    }
}

// =============================================================================
// SCAN CONFIGURATION
// =============================================================================

/// Immutable settings for one scan.
///
/// Created when a scan is requested and moved into the worker; it is never
/// mutated while the scan runs.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use ds_core::{ExtensionFilter, MaxDepth, ScanConfiguration};
///
/// let config = ScanConfiguration::new(Utf8Path::new("./data"))
///     .with_max_depth(MaxDepth::new(5).unwrap())
///     .with_include_hidden(true)
///     .with_extension_filter(ExtensionFilter::parse("txt,md"));
///
/// assert_eq!(config.max_depth.get(), 5);
/// assert!(config.include_hidden);
/// assert!(!config.show_empty_folders);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfiguration {
    /// Directory to enumerate. Must exist and be a directory when the scan starts.
    pub root: Utf8PathBuf,
    /// Depth limit in path segments below the root.
    pub max_depth: MaxDepth,
    /// Whether dot-prefixed files and directories participate.
    pub include_hidden: bool,
    /// Extension allow-list for files.
    pub extension_filter: ExtensionFilter,
    /// Keep directories that contribute no qualifying descendant.
    pub show_empty_folders: bool,
    /// Descend into symlinked directories.
    pub follow_links: bool,
    /// Number of processed files between progress reports (at least 1).
    pub progress_interval: usize,
}

impl ScanConfiguration {
    /// Creates a configuration with default settings for `root`.
    #[must_use]
    pub fn new(root: &Utf8Path) -> Self {
        Self {
            root: root.to_owned(),
            max_depth: MaxDepth::default(),
            include_hidden: false,
            extension_filter: ExtensionFilter::All,
            show_empty_folders: false,
            follow_links: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Builds a configuration from persisted settings.
    pub fn from_settings(root: &Utf8Path, settings: &ScanSettings) -> Result<Self, ConfigError> {
        if settings.progress_interval == 0 {
            return Err(ConfigError::invalid_option(
                "progress_interval",
                "must be at least 1",
            ));
        }

        Ok(Self {
            root: root.to_owned(),
            max_depth: MaxDepth::new(settings.max_depth)?,
            include_hidden: settings.include_hidden,
            extension_filter: ExtensionFilter::parse(&settings.extensions),
            show_empty_folders: settings.show_empty_folders,
            follow_links: settings.follow_links,
            progress_interval: settings.progress_interval,
        })
    }

    /// Sets the depth limit.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: MaxDepth) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the hidden-file policy.
    #[must_use]
    pub const fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Sets the extension allow-list.
    #[must_use]
    pub fn with_extension_filter(mut self, filter: ExtensionFilter) -> Self {
        self.extension_filter = filter;
        self
    }

    /// Keeps or prunes directories without qualifying descendants.
    #[must_use]
    pub const fn with_show_empty_folders(mut self, show: bool) -> Self {
        self.show_empty_folders = show;
        self
    }

    /// Configures whether symlinked directories are descended.
    #[must_use]
    pub const fn with_follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }

    /// Sets the progress throttle. Zero is clamped to 1.
    #[must_use]
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval.max(1);
        self
    }
}

// =============================================================================
// PERSISTED SETTINGS
// =============================================================================

/// Scan defaults as stored in the settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanSettings {
    /// Depth limit (1-50).
    pub max_depth: usize,
    /// Include dot-prefixed entries.
    pub include_hidden: bool,
    /// Extension list, `*` for all.
    pub extensions: String,
    /// Keep directories without qualifying content.
    pub show_empty_folders: bool,
    /// Descend into symlinked directories.
    pub follow_links: bool,
    /// Files between progress reports.
    pub progress_interval: usize,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_depth: MaxDepth::default().get(),
            include_hidden: false,
            extensions: "*".to_owned(),
            show_empty_folders: false,
            follow_links: false,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

/// Export defaults as stored in the settings file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Format used when none is given on the command line.
    pub format: ExportFormat,
    /// Pretty-print JSON output.
    pub pretty_json: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: ExportFormat::Json,
            pretty_json: true,
        }
    }
}

/// Root settings document.
///
/// # Examples
///
/// ```
/// use ds_core::Config;
///
/// let config: Config = serde_json::from_str(r#"{"scan": {"max_depth": 7}}"#).unwrap();
/// assert_eq!(config.scan.max_depth, 7);
/// assert_eq!(config.scan.extensions, "*");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Scan defaults.
    pub scan: ScanSettings,
    /// Export defaults.
    pub export: ExportSettings,
}

impl Config {
    /// Reads settings from a JSON file.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        if path.is_dir() {
            return Err(ConfigError::InvalidPath {
                path: path.to_owned(),
                reason: "is a directory".to_owned(),
            });
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Reads settings, falling back to defaults when the file does not exist.
    pub fn load_or_default(path: &Utf8Path) -> Result<Self, ConfigError> {
        match Self::load(path) {
            Err(ConfigError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Writes settings as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Utf8Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

//! Scan-root-relative paths.
//!
//! This module provides [`RelativePath`], the segment list that identifies an
//! entry within one scan. Segment count doubles as the entry's depth, which
//! is what the depth limit is checked against.

use std::fmt;
use std::path::MAIN_SEPARATOR_STR;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use smallvec::SmallVec;

/// A path relative to the scan root, stored as ordered segments.
///
/// Uses [`SmallVec`] so that the common case of shallow trees does not
/// allocate for the segment list itself.
///
/// # Examples
///
/// ```
/// use ds_core::RelativePath;
///
/// let path = RelativePath::root().join("docs").join("report.txt");
/// assert_eq!(path.depth(), 2);
/// assert_eq!(path.name(), Some("report.txt"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelativePath {
    segments: SmallVec<[String; 4]>,
}

impl RelativePath {
    /// Returns the empty path that denotes the scan root itself.
    #[inline]
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Builds a path from segments, dropping empty ones.
    ///
    /// # Examples
    ///
    /// ```
    /// use ds_core::RelativePath;
    ///
    /// let path = RelativePath::from_segments(["sub", "", "b.txt"]);
    /// assert_eq!(path.depth(), 2);
    /// ```
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// Returns a new path with `segment` appended.
    #[must_use]
    pub fn join(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// Number of segments; `0` for the scan root.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the scan root.
    #[inline]
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// The final segment (base name), if any.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The containing path; `None` for the scan root.
    ///
    /// # Examples
    ///
    /// ```
    /// use ds_core::RelativePath;
    ///
    /// let path = RelativePath::from_segments(["sub", "b.txt"]);
    /// assert_eq!(path.parent(), Some(RelativePath::from_segments(["sub"])));
    /// assert_eq!(RelativePath::from_segments(["a.txt"]).parent(), Some(RelativePath::root()));
    /// assert_eq!(RelativePath::root().parent(), None);
    /// ```
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.segments.split_last()?;
        Some(Self {
            segments: rest.iter().cloned().collect(),
        })
    }

    /// Iterates over the segments from the root downwards.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.segments.iter().map(String::as_str)
    }

    /// Resolves this path against the scan root.
    ///
    /// # Examples
    ///
    /// ```
    /// use camino::Utf8Path;
    /// use ds_core::RelativePath;
    ///
    /// let path = RelativePath::from_segments(["sub", "b.txt"]);
    /// assert_eq!(path.to_path(Utf8Path::new("/data")), Utf8Path::new("/data/sub/b.txt"));
    /// ```
    #[must_use]
    pub fn to_path(&self, root: &Utf8Path) -> Utf8PathBuf {
        let mut path = root.to_owned();
        for segment in &self.segments {
            path.push(segment);
        }
        path
    }
}

impl fmt::Display for RelativePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(MAIN_SEPARATOR_STR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl Serialize for RelativePath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for RelativePath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::from_segments(raw.split(['/', '\\'])))
    }
}

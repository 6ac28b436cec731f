//! Error and status types.
//!
//! Construction failures are fatal and surfaced as [`GridError`]. Everything
//! that can go wrong with an individual path request is reported through
//! [`PathStatus`] inside the [`SearchResult`] — callers branch on the status
//! rather than unwinding.

use thiserror::Error;

use crate::path::Path;

/// Fatal grid construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// One or both grid dimensions were zero.
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// The supplied cell data does not cover the requested dimensions.
    #[error("got {cells} cells for a {width}x{height} grid")]
    CellCountMismatch {
        cells: usize,
        width: usize,
        height: usize,
    },
}

/// Outcome of a single path request.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PathStatus {
    /// A route was found and is attached to the result.
    PathFound,
    /// The frontier emptied without reaching the end node, or the shortest
    /// route exceeded the configured maximum path length.
    PathNotFound,
    /// Start and end name the same cell; no search was performed.
    SameStartEnd,
    /// Start or end lies outside the grid bounds.
    InvalidIndex,
    /// The target grid no longer exists (async requests whose grid was
    /// dropped before the worker picked them up).
    GridNotReady,
}

impl std::fmt::Display for PathStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PathStatus::PathFound => "path found",
            PathStatus::PathNotFound => "path not found",
            PathStatus::SameStartEnd => "start and end are the same cell",
            PathStatus::InvalidIndex => "index out of grid bounds",
            PathStatus::GridNotReady => "grid not ready",
        };
        f.write_str(s)
    }
}

/// A path (when one was found) together with its status.
#[derive(Clone, Debug)]
pub struct SearchResult {
    pub path: Option<Path>,
    pub status: PathStatus,
}

impl SearchResult {
    /// A result carrying no path.
    pub(crate) fn status(status: PathStatus) -> Self {
        Self { path: None, status }
    }

    /// A successful result.
    pub(crate) fn found(path: Path) -> Self {
        Self {
            path: Some(path),
            status: PathStatus::PathFound,
        }
    }

    /// Whether a path was found.
    #[inline]
    pub fn is_found(&self) -> bool {
        self.status == PathStatus::PathFound
    }

    /// Consume the result, keeping only the path.
    #[inline]
    pub fn into_path(self) -> Option<Path> {
        self.path
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn path_status_round_trip() {
        for status in [
            PathStatus::PathFound,
            PathStatus::PathNotFound,
            PathStatus::SameStartEnd,
            PathStatus::InvalidIndex,
            PathStatus::GridNotReady,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            let back: PathStatus = serde_json::from_str(&json).unwrap();
            assert_eq!(status, back);
        }
    }
}

//! Source locations.
//!
//! A `SourceLocation` is a half-open byte range `[start, end)` within a file.
//! Locations are carried by tree nodes and type nodes and attached to
//! diagnostics; they never participate in structural equality.

use serde::Serialize;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct SourceLocation {
    /// File path, or `None` for synthesized nodes.
    pub file: Option<Arc<str>>,
    pub start: u32,
    pub end: u32,
}

impl SourceLocation {
    /// Location for nodes that do not come from source text.
    pub const UNKNOWN: SourceLocation = SourceLocation {
        file: None,
        start: 0,
        end: 0,
    };

    pub fn new(file: Arc<str>, start: u32, end: u32) -> Self {
        debug_assert!(start <= end, "inverted source range {start}..{end}");
        SourceLocation {
            file: Some(file),
            start,
            end,
        }
    }

    /// A location in a file without a path, used by the standalone type parser.
    pub fn anonymous(start: u32, end: u32) -> Self {
        SourceLocation {
            file: None,
            start,
            end,
        }
    }

    #[inline]
    pub fn is_known(&self) -> bool {
        self.file.is_some()
    }

    #[inline]
    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn file_path(&self) -> &str {
        self.file.as_deref().unwrap_or("")
    }

    /// Smallest location covering both `self` and `other`.
    /// The file of `self` wins; locations from different files are not merged.
    pub fn extend(&self, other: &SourceLocation) -> SourceLocation {
        if self.file != other.file {
            return self.clone();
        }
        SourceLocation {
            file: self.file.clone(),
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "{}:{}-{}", file, self.start, self.end),
            None => write!(f, "<unknown>:{}-{}", self.start, self.end),
        }
    }
}

//! Source-location tracking, attached to every value stored in a
//! [`crate::table::ResourceTable`] so diagnostics can point back at the file
//! (and, for XML-derived values, the line) a value came from.

use std::fmt;
use std::path::PathBuf;

/// Where a value came from: a path, and optionally a line number within it.
///
/// aapt2 carries this alongside every `ResourceConfigValue` so that a
/// collision error can say exactly which two files disagree. Comparisons
/// never factor into collision resolution; a `Source` is metadata, not an
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Source {
    pub path: PathBuf,
    pub line: Option<u32>,
}

impl Source {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Source {
            path: path.into(),
            line: None,
        }
    }

    pub fn with_line(path: impl Into<PathBuf>, line: u32) -> Self {
        Source {
            path: path.into(),
            line: Some(line),
        }
    }

    pub fn unknown() -> Self {
        Source::default()
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.as_os_str().is_empty() {
            return f.write_str("<unknown>");
        }
        match self.line {
            Some(line) => write!(f, "{}:{}", self.path.display(), line),
            None => write!(f, "{}", self.path.display()),
        }
    }
}

//! Error types for `restable-xml`.

use thiserror::Error;

/// Failures raised while building a [`crate::Dom`] from either a textual or
/// binary XML representation.
///
/// Per spec.md §4.7, a parse error discards the whole tree and is reported
/// as a single diagnostic carrying the current line number; since the DOM
/// builder has no `Diagnostics` sink of its own to call through (that lives
/// one layer up, at the resource-parsing front end), that diagnostic is
/// modeled here as the `Display` of this error instead.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("{line}: xml parse error: {message}")]
    XmlParse { line: u32, message: String },

    #[error("binary xml chunk malformed: {0}")]
    BinaryParse(String),

    #[error("xml input is not valid utf-8 at byte {0}")]
    InvalidUtf8(usize),
}

//! String pool (component B): the deduplicated table of strings a
//! `ResourceTable` and the values inside it refer to by index, plus the
//! styled-string span model used for HTML-ish resource strings.
//!
//! Grounded in the binary `ResStringPoolHeader`/`StringPool` layout aapt2 and
//! `delvinru-apk-info`'s `axml` crate read off disk: what matters for the
//! compiler side is the same shape minus the serialization, an index into a
//! vector of owned strings, with an optional overlay of style spans.

use std::collections::HashMap;
use std::fmt;

/// A `(start, end)` run of a styled string tagged with a span name, such as
/// `b` or `i` in a resource string that was written as
/// `"<b>Hello</b> world"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub name: String,
    pub first_char: u32,
    pub last_char: u32,
}

/// A string together with the spans that style ranges of it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyledString {
    pub value: String,
    pub spans: Vec<Span>,
}

/// An index into a [`StringPool`]'s entries. Indices are stable for the
/// lifetime of the pool: entries are only ever appended, never removed or
/// reordered, so a `StringRef` taken before a later `insert` remains valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StringRef(u32);

impl StringRef {
    #[inline]
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

/// Alias used where a reference specifically denotes a styled entry. Spans
/// are stored in the same underlying table as plain strings; this alias
/// exists only to make call sites self-documenting.
pub type StyleRef = StringRef;

/// A deduplicated, append-only table of strings and styled strings.
///
/// Two kinds of entry share one index space: plain strings and styled
/// strings. `makeRef`/`insert` look the string up first so that repeated
/// references to the same literal (e.g. many `@string/app_name` resources
/// sharing the pool with a single `<string name="app_name">` value) collapse
/// to one entry, matching aapt2's `StringPool::makeRef`.
#[derive(Debug, Clone, Default)]
pub struct StringPool {
    entries: Vec<StyledString>,
    index: HashMap<String, StringRef>,
}

impl StringPool {
    pub fn new() -> Self {
        StringPool::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Interns a plain string, returning the existing reference if this
    /// exact string (unstyled) is already in the pool.
    pub fn insert(&mut self, value: impl Into<String>) -> StringRef {
        let value = value.into();
        if let Some(existing) = self.index.get(&value) {
            if self.entries[existing.index()].spans.is_empty() {
                return *existing;
            }
        }
        let idx = self.entries.len() as u32;
        self.entries.push(StyledString {
            value: value.clone(),
            spans: Vec::new(),
        });
        let reference = StringRef(idx);
        self.index.entry(value).or_insert(reference);
        reference
    }

    /// Inserts a styled string, deduplicating against any existing entry
    /// that is structurally equal (same text and same spans). Two strings
    /// that render identically but carry different markup are still
    /// distinct entries.
    pub fn insert_styled(&mut self, value: StyledString) -> StyleRef {
        if let Some(idx) = self.entries.iter().position(|entry| *entry == value) {
            return StringRef(idx as u32);
        }
        let idx = self.entries.len() as u32;
        self.entries.push(value);
        StringRef(idx)
    }

    pub fn get(&self, reference: StringRef) -> Option<&StyledString> {
        self.entries.get(reference.index())
    }

    pub fn get_str(&self, reference: StringRef) -> Option<&str> {
        self.get(reference).map(|s| s.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (StringRef, &StyledString)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, s)| (StringRef(i as u32), s))
    }

    /// Merges `other`'s entries into `self`, returning a mapping from the
    /// old indices to the new ones. Used by the table merger so that values
    /// cloned out of a merged-in table point at `self`'s pool instead.
    pub fn merge_from(&mut self, other: &StringPool) -> Vec<StringRef> {
        other
            .entries
            .iter()
            .map(|entry| {
                if entry.spans.is_empty() {
                    self.insert(entry.value.clone())
                } else {
                    self.insert_styled(entry.clone())
                }
            })
            .collect()
    }
}

impl fmt::Display for StringPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StringPool({} entries)", self.entries.len())
    }
}

//! Symbol visibility (component tied to §4.1/§4.6): whether a resource name
//! is public API, framework-private, or simply undefined.

use crate::source::Source;

/// Visibility of a resource name, independent of any particular value.
///
/// Ordered by how much it resists being overridden: `Undefined` loses to
/// everything, `Private` loses only to `Public`, and `Public` never loses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SymbolState {
    Undefined,
    Private,
    Public,
}

impl Default for SymbolState {
    fn default() -> Self {
        SymbolState::Undefined
    }
}

impl SymbolState {
    /// `true` if `self` may be replaced by `incoming` without an explicit
    /// override. Mirrors aapt2's `setSymbolStateImpl` monotonicity rule:
    /// public can't be downgraded, and undefined can't override anything
    /// that already has a definite state.
    pub fn can_transition_to(&self, incoming: SymbolState) -> bool {
        match (*self, incoming) {
            (SymbolState::Public, SymbolState::Public) => true,
            (SymbolState::Public, _) => false,
            (_, SymbolState::Undefined) => *self == SymbolState::Undefined,
            _ => true,
        }
    }
}

/// A symbol attached to a resource entry: its visibility, the comment that
/// documents it (if any), and where the declaration came from.
#[derive(Debug, Clone, Default)]
pub struct Symbol {
    pub state: SymbolState,
    pub source: Source,
    pub comment: Option<String>,
    /// `true` if this symbol came from `<java-symbol>` rather than
    /// `<public>` — these are implicitly public to generated Java code but
    /// never appear in the `R` class, a detail `restable-cli` need not act
    /// on but that downstream consumers may care about.
    pub allow_new: bool,
}

impl Symbol {
    pub fn new(state: SymbolState, source: Source) -> Self {
        Symbol {
            state,
            source,
            comment: None,
            allow_new: false,
        }
    }

    pub fn is_public(&self) -> bool {
        self.state == SymbolState::Public
    }
}

//! The resource model, value taxonomy, and merge/collision engine for a
//! resource-table compiler/linker in the style of Android's `aapt2`.
//!
//! This crate is the in-memory core only: parsing resource XML, reading or
//! writing the binary `.arsc` table format, and packaging the result into
//! an archive are all left to other crates. What lives here is the data
//! model a front end builds up (`table`, `value`, `string_pool`,
//! `identifier`, `config`, `symbol`), the rules for reconciling two
//! definitions of the same resource (`collision`), and the algorithm for
//! folding one table into another (`merger`, `mangle`).

pub mod collision;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod identifier;
pub mod mangle;
pub mod merger;
pub mod source;
pub mod string_pool;
pub mod symbol;
pub mod table;
pub mod value;

pub use collision::{resolve_value_collision, CollisionResult};
pub use config::{ConfigDescription, ConfigParseError, Density, Orientation};
pub use diagnostics::{BuildContext, Diagnostics, StaticBuildContext, StderrDiagnostics};
pub use errors::{MergeError, TableError};
pub use identifier::{ResourceId, ResourceName, ResourceNameRef, ResourceType};
pub use merger::{FileToMerge, TableMerger};
pub use source::Source;
pub use string_pool::{Span, StringPool, StringRef, StyleRef, StyledString};
pub use symbol::{Symbol, SymbolState};
pub use table::{ResourceConfigValue, ResourceEntry, ResourceTable, ResourceTablePackage, ResourceTableType};
pub use value::{
    Array, Attribute, AttributeSymbol, AttributeTypeMask, AttributeTypeMaskOpt, BinaryPrimitive, DataType,
    FileReference, Item, Plural, PluralCategory, Reference, ReferenceType, Style, StyleEntry, Styleable, Value,
    ValueVisitor,
};

//! Value taxonomy (component C): the closed set of things a resource entry
//! can hold, with `clone`/`flatten`/`print` contracts.
//!
//! Grounded directly in `original_source/ResourceValues.cpp`: each variant
//! below corresponds 1:1 to one of aapt2's `Value` subclasses. Double
//! dispatch (aapt2's `accept(ValueVisitor*)`) becomes an exhaustive `match`
//! here, with an optional [`ValueVisitor`] trait offered for callers who
//! want the same open-ended-visitor ergonomics without a second enum.

use bitflags::bitflags;

use crate::identifier::ResourceId;
use crate::string_pool::{StringPool, StringRef, StyleRef};

/// Whether a [`Reference`] names a `@resource` or a `?attribute` lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceType {
    Resource,
    Attribute,
}

/// A reference to another resource, by ID and/or by name.
///
/// aapt2 keeps both fields because references are often written by name in
/// source XML and only resolved to an ID during linking; a `Reference` with
/// `id: None` is unresolved, one with `name: None` came from a binary
/// resource table that only had room for the numeric ID.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reference {
    pub id: Option<ResourceId>,
    pub name: Option<String>,
    pub reference_type: ReferenceType,
    /// `true` for references written as `@*package:type/entry`, which are
    /// visible only within the package that declared them.
    pub private_reference: bool,
}

impl Reference {
    pub fn by_id(id: ResourceId) -> Self {
        Reference {
            id: Some(id),
            name: None,
            reference_type: ReferenceType::Resource,
            private_reference: false,
        }
    }

    pub fn by_name(name: impl Into<String>) -> Self {
        Reference {
            id: None,
            name: Some(name.into()),
            reference_type: ReferenceType::Resource,
            private_reference: false,
        }
    }

    pub fn is_internal_id(&self) -> bool {
        self.id.map(|id| id.is_internal()).unwrap_or(false)
    }

    pub fn print(&self) -> String {
        let sigil = match self.reference_type {
            ReferenceType::Resource if self.private_reference => "@*",
            ReferenceType::Resource => "@",
            ReferenceType::Attribute => "?",
        };
        if let Some(name) = &self.name {
            format!("{}{}", sigil, name)
        } else if let Some(id) = self.id {
            if id.is_internal() {
                sigil.to_string()
            } else {
                format!("{}{}", sigil, id)
            }
        } else {
            format!("{}null", sigil)
        }
    }
}

bitflags! {
    /// The set of `Res_value` data types an `<attr format="...">` declares
    /// as acceptable, one bit per primitive kind. Mirrors the `typeMask`
    /// bits `ResourceValueType`/`ResTableFlag` expose in
    /// `delvinru-apk-info`'s `crates/axml`, generalized from "bits read off
    /// a binary chunk" to "bits set while compiling an `<attr>` tag".
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttributeTypeMask: u32 {
        const REFERENCE = 1 << 0;
        const STRING    = 1 << 1;
        const INTEGER   = 1 << 2;
        const BOOLEAN   = 1 << 3;
        const COLOR     = 1 << 4;
        const FLOAT     = 1 << 5;
        const DIMENSION = 1 << 6;
        const FRACTION  = 1 << 7;
        const ENUM      = 0x10000;
        const FLAGS     = 0x20000;
        /// No constraint: any data type is accepted. Used by the collision
        /// resolver to recognize an attribute `USE` record, which declares
        /// no type constraint of its own and must defer to a `DECL`'s mask.
        const ANY = Self::REFERENCE.bits()
            | Self::STRING.bits()
            | Self::INTEGER.bits()
            | Self::BOOLEAN.bits()
            | Self::COLOR.bits()
            | Self::FLOAT.bits()
            | Self::DIMENSION.bits()
            | Self::FRACTION.bits()
            | Self::ENUM.bits()
            | Self::FLAGS.bits();
    }
}

impl AttributeTypeMask {
    /// `Attribute::printMask`: enumerate set bits in a fixed, stable order
    /// joined by `|`, rather than relying on bit position.
    pub fn print_mask(&self) -> String {
        const ORDER: &[(AttributeTypeMask, &str)] = &[
            (AttributeTypeMask::REFERENCE, "reference"),
            (AttributeTypeMask::STRING, "string"),
            (AttributeTypeMask::INTEGER, "integer"),
            (AttributeTypeMask::BOOLEAN, "boolean"),
            (AttributeTypeMask::COLOR, "color"),
            (AttributeTypeMask::FLOAT, "float"),
            (AttributeTypeMask::DIMENSION, "dimension"),
            (AttributeTypeMask::FRACTION, "fraction"),
            (AttributeTypeMask::ENUM, "enum"),
            (AttributeTypeMask::FLAGS, "flags"),
        ];
        ORDER
            .iter()
            .filter(|(bit, _)| self.contains(*bit))
            .map(|(_, name)| *name)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// One `<enum>`/`<flag>` child of an `<attr>` declaration: a symbolic name
/// mapped to its integer value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSymbol {
    pub name: Reference,
    pub value: i32,
}

/// An `<attr>` declaration (`DECL`) or reference to one (`USE`).
///
/// `typeMask == AttributeTypeMask::ANY` is how the collision resolver in
/// `collision.rs` distinguishes a `USE` record (an attribute referenced from
/// a style or layout, with no constraints of its own) from a `DECL` (an
/// actual `<attr>` tag, which always sets a real mask).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Attribute {
    pub type_mask: AttributeTypeMaskOpt,
    pub min_int: Option<i32>,
    pub max_int: Option<i32>,
    pub symbols: Vec<AttributeSymbol>,
    /// Weak attribute declarations yield to a strong (i.e., fully specified)
    /// declaration of the same attribute during collision resolution.
    pub weak: bool,
}

/// Wraps [`AttributeTypeMask`] so `Attribute` can derive `Default`
/// (`bitflags` types don't implement it in a way `#[derive(Default)]` can
/// reach through a plain field without this indirection in older bitflags
/// generations; kept explicit here since the teacher crate's flag types do
/// the same).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AttributeTypeMaskOpt(pub AttributeTypeMask);

impl Attribute {
    pub fn is_use_record(&self) -> bool {
        self.type_mask.0 == AttributeTypeMask::ANY
    }

    pub fn clone_value(&self) -> Attribute {
        // Attribute::clone ignores the string pool argument in aapt2: every
        // field is either a primitive or a Reference, neither of which
        // points into a string pool.
        self.clone()
    }

    pub fn print(&self) -> String {
        format!("attr type={}", self.type_mask.0.print_mask())
    }
}

/// The `Res_value` data-type tag carried by [`BinaryPrimitive`]. Names follow
/// `delvinru-apk-info`'s `ResourceValueType` (`crates/axml/src/structs/common.rs`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Null,
    Reference,
    Attribute,
    IntDec,
    IntHex,
    IntBoolean,
    IntColorArgb8,
    IntColorRgb8,
    IntColorArgb4,
    IntColorRgb4,
    Dimension,
    Fraction,
    Float,
}

impl DataType {
    pub fn tag(&self) -> u8 {
        match self {
            DataType::Null => 0x00,
            DataType::Reference => 0x01,
            DataType::Attribute => 0x02,
            DataType::Float => 0x04,
            DataType::Dimension => 0x05,
            DataType::Fraction => 0x06,
            DataType::IntDec => 0x10,
            DataType::IntHex => 0x11,
            DataType::IntBoolean => 0x12,
            DataType::IntColorArgb8 => 0x1c,
            DataType::IntColorRgb8 => 0x1d,
            DataType::IntColorArgb4 => 0x1e,
            DataType::IntColorRgb4 => 0x1f,
        }
    }
}

/// The flattened `(dataType, data)` pair a [`BinaryPrimitive`] or other
/// [`Item`] reduces to. Deliberately not a wire-format struct: emitting the
/// bytes of a `Res_value` chunk is the unflatten/flatten layer's job, which
/// this crate treats as an external collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatValue {
    pub data_type: u8,
    pub data: u32,
}

/// A raw integer/float/boolean/color/dimension/fraction primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryPrimitive {
    pub data_type: DataType,
    pub data: u32,
}

impl BinaryPrimitive {
    pub fn flatten(&self) -> FlatValue {
        FlatValue {
            data_type: self.data_type.tag(),
            // host-to-device byte order; a no-op on little-endian hosts but
            // spelled out so the intent survives a big-endian build target.
            data: self.data.to_le(),
        }
    }

    pub fn print(&self) -> String {
        format!("(0x{:02x}) 0x{:08x}", self.data_type.tag(), self.data)
    }
}

/// A reference to an external file that holds the actual resource content
/// (a drawable PNG, a layout XML, a raw asset).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    pub path: StringRef,
}

/// The subset of [`Value`] that can appear as a single, atomic entry: the
/// leaves of the taxonomy. `Style`, `Array`, `Plural`, `Attribute`, and
/// `Styleable` are built out of `Item`s but are not themselves `Item`s,
/// mirroring aapt2's `Item : public Value` vs. plain `Value` split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Item {
    Reference(Reference),
    /// `@id/foo` declared with no associated value.
    Id,
    RawString(StringRef),
    String(StringRef),
    StyledString(StyleRef),
    FileReference(FileReference),
    BinaryPrimitive(BinaryPrimitive),
}

impl Item {
    pub fn clone_value(&self, dst_pool: &mut StringPool, src_pool: &StringPool) -> Item {
        match self {
            Item::Reference(r) => Item::Reference(r.clone()),
            Item::Id => Item::Id,
            Item::RawString(s) => Item::RawString(reintern(dst_pool, src_pool, *s)),
            Item::String(s) => Item::String(reintern(dst_pool, src_pool, *s)),
            Item::StyledString(s) => {
                let styled = src_pool
                    .get(*s)
                    .cloned()
                    .unwrap_or_default();
                Item::StyledString(dst_pool.insert_styled(styled))
            }
            Item::FileReference(f) => Item::FileReference(FileReference {
                path: reintern(dst_pool, src_pool, f.path),
            }),
            Item::BinaryPrimitive(p) => Item::BinaryPrimitive(*p),
        }
    }

    /// `true` for values that defer to a conflicting definition instead of
    /// raising a collision error: aapt2's `Value::isWeak`, which only a
    /// weak `Attribute` overrides. No `Item` variant is ever weak on its
    /// own; that bit lives on the compound `Value::Attribute`.
    pub fn is_weak(&self) -> bool {
        false
    }

    /// Wraps this leaf into the closed [`Value`] taxonomy. A thin
    /// convenience over `Value::Item(self)` for call sites that build an
    /// `Item` and immediately need a `Value` to hand to `add_resource`.
    pub fn into_value(self) -> Value {
        Value::Item(self)
    }

    pub fn flatten(&self) -> Option<FlatValue> {
        match self {
            Item::Reference(r) => Some(FlatValue {
                data_type: match r.reference_type {
                    ReferenceType::Resource => DataType::Reference.tag(),
                    ReferenceType::Attribute => DataType::Attribute.tag(),
                },
                data: r.id.map(|id| id.id()).unwrap_or(0).to_le(),
            }),
            Item::Id => Some(FlatValue {
                data_type: DataType::IntBoolean.tag(),
                data: 0,
            }),
            Item::RawString(s) | Item::String(s) => {
                // debug_assert mirrors aapt2's UINT32_MAX guard: a pool this
                // large would already have failed to build long before
                // flatten runs.
                debug_assert!(s.index() <= u32::MAX as usize);
                Some(FlatValue {
                    data_type: 0x03, // Res_value::TYPE_STRING
                    data: (s.index() as u32).to_le(),
                })
            }
            Item::StyledString(s) => Some(FlatValue {
                data_type: 0x03,
                data: (s.index() as u32).to_le(),
            }),
            Item::FileReference(f) => Some(FlatValue {
                data_type: 0x03,
                data: (f.path.index() as u32).to_le(),
            }),
            Item::BinaryPrimitive(p) => Some(p.flatten()),
        }
    }

    pub fn print(&self, pool: &StringPool) -> String {
        match self {
            Item::Reference(r) => r.print(),
            Item::Id => "(id)".to_string(),
            Item::RawString(s) => pool.get_str(*s).unwrap_or("").to_string(),
            Item::String(s) => format!("\"{}\"", pool.get_str(*s).unwrap_or("")),
            Item::StyledString(s) => pool
                .get(*s)
                .map(|v| format!("\"{}\"", v.value))
                .unwrap_or_default(),
            Item::FileReference(f) => pool.get_str(f.path).unwrap_or("").to_string(),
            Item::BinaryPrimitive(p) => p.print(),
        }
    }
}

fn reintern(dst: &mut StringPool, src: &StringPool, r: StringRef) -> StringRef {
    dst.insert(src.get_str(r).unwrap_or("").to_string())
}

/// One `<item name="...">` entry of a `<style>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleEntry {
    pub key: Reference,
    pub value: Item,
}

/// A `<style>` resource: an optional parent to inherit from, plus the
/// attribute/value pairs it overrides or adds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Style {
    pub parent: Option<Reference>,
    /// `true` if `parent` was inferred from the style's own name
    /// (`Widget.MyApp.Button` implying a parent of `Widget.MyApp`) rather
    /// than an explicit `parent="..."` attribute.
    pub parent_inferred: bool,
    pub entries: Vec<StyleEntry>,
}

impl Style {
    pub fn clone_value(&self, dst_pool: &mut StringPool, src_pool: &StringPool) -> Style {
        Style {
            parent: self.parent.clone(),
            parent_inferred: self.parent_inferred,
            entries: self
                .entries
                .iter()
                .map(|e| StyleEntry {
                    key: e.key.clone(),
                    value: e.value.clone_value(dst_pool, src_pool),
                })
                .collect(),
        }
    }

    pub fn print(&self, pool: &StringPool) -> String {
        let parent = self
            .parent
            .as_ref()
            .map(|p| p.print())
            .unwrap_or_else(|| "(none)".to_string());
        format!(
            "style parent={} entries={}",
            parent,
            self.entries
                .iter()
                .map(|e| format!("{}={}", e.key.print(), e.value.print(pool)))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}

/// An `<array>`/`<string-array>`/`<integer-array>` resource.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Array {
    pub elements: Vec<Item>,
}

impl Array {
    pub fn clone_value(&self, dst_pool: &mut StringPool, src_pool: &StringPool) -> Array {
        Array {
            elements: self
                .elements
                .iter()
                .map(|e| e.clone_value(dst_pool, src_pool))
                .collect(),
        }
    }
}

/// The six ICU plural categories a `<plurals>` resource may define.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PluralCategory {
    Zero,
    One,
    Two,
    Few,
    Many,
    Other,
}

impl PluralCategory {
    pub const ALL: [PluralCategory; 6] = [
        PluralCategory::Zero,
        PluralCategory::One,
        PluralCategory::Two,
        PluralCategory::Few,
        PluralCategory::Many,
        PluralCategory::Other,
    ];

    fn index(&self) -> usize {
        *self as usize
    }
}

/// A `<plurals>` resource: up to one `Item` per ICU plural category.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Plural {
    pub values: [Option<Item>; 6],
}

impl Plural {
    pub fn get(&self, category: PluralCategory) -> Option<&Item> {
        self.values[category.index()].as_ref()
    }

    pub fn set(&mut self, category: PluralCategory, value: Item) {
        self.values[category.index()] = Some(value);
    }

    pub fn clone_value(&self, dst_pool: &mut StringPool, src_pool: &StringPool) -> Plural {
        let mut out = Plural::default();
        for category in PluralCategory::ALL {
            if let Some(item) = self.get(category) {
                out.set(category, item.clone_value(dst_pool, src_pool));
            }
        }
        out
    }
}

/// A `<declare-styleable>` resource: the ordered set of attributes a custom
/// view declares for itself, used to generate `R.styleable` index constants.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Styleable {
    pub entries: Vec<Reference>,
}

impl Styleable {
    pub fn clone_value(&self) -> Styleable {
        self.clone()
    }
}

/// The closed taxonomy of values a resource entry's config slot can hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Item(Item),
    Attribute(Attribute),
    Style(Style),
    Array(Array),
    Plural(Plural),
    Styleable(Styleable),
}

impl Value {
    pub fn is_weak(&self) -> bool {
        match self {
            Value::Item(item) => item.is_weak(),
            Value::Attribute(attr) => attr.weak,
            _ => false,
        }
    }

    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Value::Item(item) => Some(item),
            _ => None,
        }
    }

    pub fn as_attribute(&self) -> Option<&Attribute> {
        match self {
            Value::Attribute(attr) => Some(attr),
            _ => None,
        }
    }

    pub fn clone_value(&self, dst_pool: &mut StringPool, src_pool: &StringPool) -> Value {
        match self {
            Value::Item(item) => Value::Item(item.clone_value(dst_pool, src_pool)),
            Value::Attribute(attr) => Value::Attribute(attr.clone_value()),
            Value::Style(style) => Value::Style(style.clone_value(dst_pool, src_pool)),
            Value::Array(array) => Value::Array(array.clone_value(dst_pool, src_pool)),
            Value::Plural(plural) => Value::Plural(plural.clone_value(dst_pool, src_pool)),
            Value::Styleable(styleable) => Value::Styleable(styleable.clone_value()),
        }
    }

    pub fn print(&self, pool: &StringPool) -> String {
        match self {
            Value::Item(item) => item.print(pool),
            Value::Attribute(attr) => attr.print(),
            Value::Style(style) => style.print(pool),
            Value::Array(array) => format!(
                "[{}]",
                array
                    .elements
                    .iter()
                    .map(|e| e.print(pool))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Value::Plural(plural) => format!(
                "{{{}}}",
                PluralCategory::ALL
                    .iter()
                    .filter_map(|c| plural.get(*c).map(|v| format!("{:?}={}", c, v.print(pool))))
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
            Value::Styleable(styleable) => format!(
                "styleable[{}]",
                styleable
                    .entries
                    .iter()
                    .map(|r| r.print())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
}

/// An open-ended visitor over the [`Value`] taxonomy, offered for callers
/// who want per-variant dispatch without matching on `Value`/`Item`
/// directly — analogous to aapt2's `ValueVisitor`/`RawValueVisitor` double
/// dispatch (`BaseValue::accept`, `BaseItem::accept`). Every method has a
/// no-op default so implementors only override the variants they care
/// about; `visit_item` dispatches further into the per-`Item`-variant
/// methods rather than stopping at the `Item` wrapper, mirroring how aapt2
/// gives every leaf `Value` subclass (`Reference`, `Id`, `String`, ...) its
/// own `accept` override rather than a single generic one.
pub trait ValueVisitor {
    fn visit_reference(&mut self, _reference: &Reference) {}
    fn visit_id(&mut self) {}
    fn visit_raw_string(&mut self, _string: &StringRef) {}
    fn visit_string(&mut self, _string: &StringRef) {}
    fn visit_styled_string(&mut self, _string: &StyleRef) {}
    fn visit_file_reference(&mut self, _file: &FileReference) {}
    fn visit_binary_primitive(&mut self, _primitive: &BinaryPrimitive) {}
    fn visit_attribute(&mut self, _attr: &Attribute) {}
    fn visit_style(&mut self, _style: &Style) {}
    fn visit_array(&mut self, _array: &Array) {}
    fn visit_plural(&mut self, _plural: &Plural) {}
    fn visit_styleable(&mut self, _styleable: &Styleable) {}

    fn visit_item(&mut self, item: &Item) {
        match item {
            Item::Reference(r) => self.visit_reference(r),
            Item::Id => self.visit_id(),
            Item::RawString(s) => self.visit_raw_string(s),
            Item::String(s) => self.visit_string(s),
            Item::StyledString(s) => self.visit_styled_string(s),
            Item::FileReference(f) => self.visit_file_reference(f),
            Item::BinaryPrimitive(p) => self.visit_binary_primitive(p),
        }
    }

    fn visit(&mut self, value: &Value) {
        match value {
            Value::Item(item) => self.visit_item(item),
            Value::Attribute(attr) => self.visit_attribute(attr),
            Value::Style(style) => self.visit_style(style),
            Value::Array(array) => self.visit_array(array),
            Value::Plural(plural) => self.visit_plural(plural),
            Value::Styleable(styleable) => self.visit_styleable(styleable),
        }
    }
}

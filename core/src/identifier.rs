//! Identifier and name types (component A): packed 32-bit resource IDs and
//! the `(package, type, entry)` triple that names a resource before it has
//! an ID assigned.

use std::fmt;

/// The closed set of resource types a `ResourceTable` can hold.
///
/// Ordinal order is the sort key used when a [`crate::table::ResourceTablePackage`]
/// orders its [`crate::table::ResourceTableType`] children (spec invariant: strictly
/// sorted, no duplicates).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ResourceType {
    Attr = 0,
    Id = 1,
    String = 2,
    Drawable = 3,
    Layout = 4,
    Color = 5,
    Dimen = 6,
    Style = 7,
    Array = 8,
    Plurals = 9,
    Integer = 10,
    Bool = 11,
    Fraction = 12,
    Menu = 13,
    Raw = 14,
    Xml = 15,
    Mipmap = 16,
    Transition = 17,
    Anim = 18,
    Animator = 19,
    Interpolator = 20,
    Font = 21,
    Macro = 22,
    Styleable = 23,
}

impl ResourceType {
    /// Name as it appears in resource file paths and XML tags.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceType::Attr => "attr",
            ResourceType::Id => "id",
            ResourceType::String => "string",
            ResourceType::Drawable => "drawable",
            ResourceType::Layout => "layout",
            ResourceType::Color => "color",
            ResourceType::Dimen => "dimen",
            ResourceType::Style => "style",
            ResourceType::Array => "array",
            ResourceType::Plurals => "plurals",
            ResourceType::Integer => "integer",
            ResourceType::Bool => "bool",
            ResourceType::Fraction => "fraction",
            ResourceType::Menu => "menu",
            ResourceType::Raw => "raw",
            ResourceType::Xml => "xml",
            ResourceType::Mipmap => "mipmap",
            ResourceType::Transition => "transition",
            ResourceType::Anim => "anim",
            ResourceType::Animator => "animator",
            ResourceType::Interpolator => "interpolator",
            ResourceType::Font => "font",
            ResourceType::Macro => "macro",
            ResourceType::Styleable => "styleable",
        }
    }

    pub fn parse(s: &str) -> Option<ResourceType> {
        Some(match s {
            "attr" => ResourceType::Attr,
            "id" => ResourceType::Id,
            "string" => ResourceType::String,
            "drawable" => ResourceType::Drawable,
            "layout" => ResourceType::Layout,
            "color" => ResourceType::Color,
            "dimen" => ResourceType::Dimen,
            "style" => ResourceType::Style,
            "array" => ResourceType::Array,
            "plurals" => ResourceType::Plurals,
            "integer" => ResourceType::Integer,
            "bool" => ResourceType::Bool,
            "fraction" => ResourceType::Fraction,
            "menu" => ResourceType::Menu,
            "raw" => ResourceType::Raw,
            "xml" => ResourceType::Xml,
            "mipmap" => ResourceType::Mipmap,
            "transition" => ResourceType::Transition,
            "anim" => ResourceType::Anim,
            "animator" => ResourceType::Animator,
            "interpolator" => ResourceType::Interpolator,
            "font" => ResourceType::Font,
            "macro" => ResourceType::Macro,
            "styleable" => ResourceType::Styleable,
            _ => return None,
        })
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A 32-bit resource identifier, packed as `PP TT EEEE`.
///
/// Package and type are 1-based bytes; entry is a 16-bit index. A package of
/// `0x01` is reserved for framework ("internal") resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceId(u32);

impl ResourceId {
    pub const INTERNAL_PACKAGE: u8 = 0x01;

    #[inline]
    pub fn new(package_id: u8, type_id: u8, entry_id: u16) -> ResourceId {
        ResourceId(
            ((package_id as u32) << 24) | ((type_id as u32) << 16) | entry_id as u32,
        )
    }

    #[inline]
    pub fn from_packed(id: u32) -> ResourceId {
        ResourceId(id)
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.0
    }

    #[inline]
    pub fn package_id(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    #[inline]
    pub fn type_id(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    #[inline]
    pub fn entry_id(&self) -> u16 {
        self.0 as u16
    }

    /// `true` if both the package and type bytes are non-zero.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.package_id() != 0 && self.type_id() != 0
    }

    /// Internal IDs (attributes built in to the framework package) are never
    /// worth printing a numeric value alongside — see `Reference::print`.
    #[inline]
    pub fn is_internal(&self) -> bool {
        self.package_id() == Self::INTERNAL_PACKAGE
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

/// An owning `(package, type, entry)` triple naming a resource before IDs are
/// assigned.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceName {
    pub package: String,
    pub type_: ResourceType,
    pub entry: String,
}

impl ResourceName {
    pub fn new(package: impl Into<String>, type_: ResourceType, entry: impl Into<String>) -> Self {
        ResourceName {
            package: package.into(),
            type_,
            entry: entry.into(),
        }
    }

    pub fn as_ref(&self) -> ResourceNameRef<'_> {
        ResourceNameRef {
            package: &self.package,
            type_: self.type_,
            entry: &self.entry,
        }
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.package, self.type_, self.entry)
    }
}

/// Borrowing counterpart to [`ResourceName`]. O(1) to build from, and to turn
/// back into, a `ResourceName`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceNameRef<'a> {
    pub package: &'a str,
    pub type_: ResourceType,
    pub entry: &'a str,
}

impl<'a> ResourceNameRef<'a> {
    pub fn new(package: &'a str, type_: ResourceType, entry: &'a str) -> Self {
        ResourceNameRef {
            package,
            type_,
            entry,
        }
    }

    pub fn to_owned(&self) -> ResourceName {
        ResourceName {
            package: self.package.to_owned(),
            type_: self.type_,
            entry: self.entry.to_owned(),
        }
    }
}

impl fmt::Display for ResourceNameRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.package, self.type_, self.entry)
    }
}

impl<'a> From<&'a ResourceName> for ResourceNameRef<'a> {
    fn from(name: &'a ResourceName) -> Self {
        name.as_ref()
    }
}

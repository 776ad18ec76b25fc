//! Resource table (components A/E): the hierarchical
//! `packages -> types -> entries -> config values` structure a compiler
//! builds up while processing resource files, plus the `addResource`/
//! `setSymbolState` entry points that validate and insert into it.
//!
//! Grounded in `original_source/ResourceTable.cpp`: the four-level
//! container hierarchy, the `findX`/`findOrCreateX` naming, the exact
//! validation chain `addResourceImpl` runs, and `resolveValueCollision`
//! dispatch are all carried over as directly as idiomatic Rust allows. Sort
//! order is maintained with a binary-search insertion point on every level
//! rather than a `HashMap`, matching spec.md's "sorted dynamic array, no
//! hashing" container choice — and incidentally matching the vector-of-
//! structs style `delvinru-apk-info`'s `ResTablePackage`/`ResTableType`
//! favor over `HashMap` for similar lookups.

use crate::collision::{resolve_value_collision, CollisionResult};
use crate::config::ConfigDescription;
use crate::diagnostics::Diagnostics;
use crate::errors::TableError;
use crate::identifier::{ResourceId, ResourceName, ResourceType};
use crate::source::Source;
use crate::string_pool::StringPool;
use crate::symbol::{Symbol, SymbolState};
use crate::value::Value;

const VALID_NAME_CHARS: &[char] = &['.', '_', '-'];
const VALID_NAME_MANGLED_CHARS: &[char] = &['.', '_', '-', '$'];

/// Returns the first character in `name` that is neither alphanumeric nor in
/// `allowed`, if any. Mirrors `findNonAlphaNumericAndNotInSet`.
fn find_invalid_char(name: &str, allowed: &[char]) -> Option<char> {
    name.chars()
        .find(|c| !c.is_alphanumeric() && !allowed.contains(c))
}

fn validate_name(name: &str, allow_mangled: bool) -> Result<(), TableError> {
    let allowed = if allow_mangled {
        VALID_NAME_MANGLED_CHARS
    } else {
        VALID_NAME_CHARS
    };
    if name.is_empty() || find_invalid_char(name, allowed).is_some() {
        return Err(TableError::InvalidName(name.to_string()));
    }
    Ok(())
}

/// The `(config, product)` pair that distinguishes two values with the same
/// name, sorted lexicographically just like aapt2's `ltConfigKeyRef`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ConfigKey {
    pub config: ConfigDescription,
    pub product: String,
}

/// One config-specific value bound to a [`ResourceEntry`].
#[derive(Debug, Clone)]
pub struct ResourceConfigValue {
    pub config: ConfigDescription,
    pub product: String,
    pub value: Value,
    pub source: Source,
}

impl ResourceConfigValue {
    fn key(&self) -> ConfigKey {
        ConfigKey {
            config: self.config.clone(),
            product: self.product.clone(),
        }
    }
}

/// One named resource within a [`ResourceTableType`]: a symbol plus the
/// set of config-specific values defined for it.
#[derive(Debug, Clone)]
pub struct ResourceEntry {
    pub name: String,
    pub id: Option<u16>,
    pub symbol: Symbol,
    values: Vec<ResourceConfigValue>,
}

impl ResourceEntry {
    fn new(name: impl Into<String>) -> Self {
        ResourceEntry {
            name: name.into(),
            id: None,
            symbol: Symbol::default(),
            values: Vec::new(),
        }
    }

    pub fn values(&self) -> &[ResourceConfigValue] {
        &self.values
    }

    /// `ResourceEntry::findValue`: the one value matching `(config,
    /// product)` exactly, if present.
    pub fn find_value(&self, config: &ConfigDescription, product: &str) -> Option<&ResourceConfigValue> {
        self.values
            .binary_search_by(|v| v.key().cmp(&ConfigKey {
                config: config.clone(),
                product: product.to_string(),
            }))
            .ok()
            .map(|idx| &self.values[idx])
    }

    /// `ResourceEntry::findOrCreateValue`. The returned `bool` is `true` when
    /// this call created a fresh slot (no value has ever been stamped into
    /// it yet), so a caller can skip collision resolution for a brand new
    /// slot without having to guess from the placeholder's shape.
    pub(crate) fn find_or_create_value(
        &mut self,
        config: &ConfigDescription,
        product: &str,
    ) -> (bool, &mut ResourceConfigValue) {
        let target = ConfigKey {
            config: config.clone(),
            product: product.to_string(),
        };
        match self.values.binary_search_by(|v| v.key().cmp(&target)) {
            Ok(idx) => (false, &mut self.values[idx]),
            Err(idx) => {
                self.values.insert(
                    idx,
                    ResourceConfigValue {
                        config: config.clone(),
                        product: product.to_string(),
                        value: Value::Item(crate::value::Item::Id),
                        source: Source::unknown(),
                    },
                );
                (true, &mut self.values[idx])
            }
        }
    }

    /// `ResourceEntry::findAllValues`: every value whose config matches
    /// `config`, across all products, returned in stored (sorted) order.
    ///
    /// aapt2's implementation walks the vector twice — once backward from
    /// the first match to catch earlier products, once forward — which is
    /// unnecessary since entries are already sorted by `(config, product)`
    /// and therefore already contiguous for a fixed config: a single
    /// forward scan from the lower bound returns the same set. Resolved
    /// Open Question: reproduce the *result*, not the two-loop shape.
    pub fn find_all_values(&self, config: &ConfigDescription) -> Vec<&ResourceConfigValue> {
        self.values
            .iter()
            .filter(|v| &v.config == config)
            .collect()
    }

    /// `ResourceEntry::findValuesIf`: a generalization of `find_all_values`
    /// to an arbitrary predicate, useful for callers filtering by product
    /// or by value kind instead of by config.
    pub fn find_values_if<'a>(
        &'a self,
        mut predicate: impl FnMut(&ResourceConfigValue) -> bool,
    ) -> Vec<&'a ResourceConfigValue> {
        self.values.iter().filter(|v| predicate(v)).collect()
    }
}

/// One resource type (`string`, `drawable`, ...) within a
/// [`ResourceTablePackage`]: an ID (if assigned), its own visibility, and
/// its sorted entries.
///
/// `symbol.state` tracks the type-level visibility spec.md §3 calls for
/// alongside the per-entry one: `setSymbolState` raises it to `Public`
/// whenever any entry of this type is published, and like every other
/// symbol state in this crate it only ever moves up, never down (see
/// [`SymbolState::can_transition_to`]).
#[derive(Debug, Clone)]
pub struct ResourceTableType {
    pub type_: ResourceType,
    pub id: Option<u8>,
    pub symbol: Symbol,
    entries: Vec<ResourceEntry>,
}

impl ResourceTableType {
    fn new(type_: ResourceType) -> Self {
        ResourceTableType {
            type_,
            id: None,
            symbol: Symbol::default(),
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ResourceEntry] {
        &self.entries
    }

    pub fn find_entry(&self, name: &str) -> Option<&ResourceEntry> {
        self.entries
            .binary_search_by(|e| e.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.entries[idx])
    }

    pub fn find_entry_mut(&mut self, name: &str) -> Option<&mut ResourceEntry> {
        match self.entries.binary_search_by(|e| e.name.as_str().cmp(name)) {
            Ok(idx) => Some(&mut self.entries[idx]),
            Err(_) => None,
        }
    }

    pub fn find_or_create_entry(&mut self, name: &str) -> &mut ResourceEntry {
        match self.entries.binary_search_by(|e| e.name.as_str().cmp(name)) {
            Ok(idx) => &mut self.entries[idx],
            Err(idx) => {
                self.entries.insert(idx, ResourceEntry::new(name));
                &mut self.entries[idx]
            }
        }
    }
}

/// One package within a [`ResourceTable`]: an ID (if assigned) plus its
/// sorted resource types.
#[derive(Debug, Clone)]
pub struct ResourceTablePackage {
    pub name: String,
    pub id: Option<u8>,
    types: Vec<ResourceTableType>,
}

impl ResourceTablePackage {
    fn new(name: impl Into<String>) -> Self {
        ResourceTablePackage {
            name: name.into(),
            id: None,
            types: Vec::new(),
        }
    }

    pub fn types(&self) -> &[ResourceTableType] {
        &self.types
    }

    pub fn find_type(&self, type_: ResourceType) -> Option<&ResourceTableType> {
        self.types
            .binary_search_by(|t| t.type_.cmp(&type_))
            .ok()
            .map(|idx| &self.types[idx])
    }

    pub fn find_type_mut(&mut self, type_: ResourceType) -> Option<&mut ResourceTableType> {
        match self.types.binary_search_by(|t| t.type_.cmp(&type_)) {
            Ok(idx) => Some(&mut self.types[idx]),
            Err(_) => None,
        }
    }

    pub fn find_or_create_type(&mut self, type_: ResourceType) -> &mut ResourceTableType {
        match self.types.binary_search_by(|t| t.type_.cmp(&type_)) {
            Ok(idx) => &mut self.types[idx],
            Err(idx) => {
                self.types.insert(idx, ResourceTableType::new(type_));
                &mut self.types[idx]
            }
        }
    }
}

/// The root container: a string pool and the sorted set of packages that
/// share it.
#[derive(Debug, Clone, Default)]
pub struct ResourceTable {
    pub string_pool: StringPool,
    packages: Vec<ResourceTablePackage>,
}

impl ResourceTable {
    pub fn new() -> Self {
        ResourceTable::default()
    }

    pub fn packages(&self) -> &[ResourceTablePackage] {
        &self.packages
    }

    pub fn find_package(&self, name: &str) -> Option<&ResourceTablePackage> {
        self.packages
            .binary_search_by(|p| p.name.as_str().cmp(name))
            .ok()
            .map(|idx| &self.packages[idx])
    }

    pub fn find_package_mut(&mut self, name: &str) -> Option<&mut ResourceTablePackage> {
        match self.packages.binary_search_by(|p| p.name.as_str().cmp(name)) {
            Ok(idx) => Some(&mut self.packages[idx]),
            Err(_) => None,
        }
    }

    /// `ResourceTable::findPackageById`: a linear scan, since packages are
    /// sorted by name, not by ID (an ID may not be assigned yet at all).
    pub fn find_package_by_id(&self, id: u8) -> Option<&ResourceTablePackage> {
        self.packages.iter().find(|p| p.id == Some(id))
    }

    pub fn find_or_create_package(&mut self, name: &str) -> &mut ResourceTablePackage {
        match self.packages.binary_search_by(|p| p.name.as_str().cmp(name)) {
            Ok(idx) => &mut self.packages[idx],
            Err(idx) => {
                self.packages.insert(idx, ResourceTablePackage::new(name));
                &mut self.packages[idx]
            }
        }
    }

    /// `ResourceTable::createPackage`: idempotent like `find_or_create_package`,
    /// but also takes the package's ID if the caller knows it (aapt2's
    /// `createPackage(name, optional id)`). Assigns `id` onto a package that
    /// doesn't have one yet; fails if it disagrees with one already stamped.
    pub fn create_package(&mut self, name: &str, id: Option<u8>) -> Result<&mut ResourceTablePackage, TableError> {
        let package = self.find_or_create_package(name);
        if let Some(id) = id {
            if let Some(existing) = package.id {
                if existing != id {
                    return Err(TableError::PackageIdMismatch {
                        package: name.to_string(),
                        new: id,
                        existing,
                    });
                }
            } else {
                package.id = Some(id);
            }
        }
        Ok(package)
    }

    /// `ResourceTable::findResource`.
    pub fn find_resource(&self, name: &ResourceName) -> Option<&ResourceEntry> {
        self.find_package(&name.package)?
            .find_type(name.type_)?
            .find_entry(&name.entry)
    }

    /// `ResourceTable::addResource`/`addResourceImpl`: validates the name,
    /// checks any explicit `id` against whatever is already stamped on the
    /// package/type/entry, resolves a collision against the existing value
    /// at `(config, product)` if one exists, and stamps the winning value
    /// in place.
    ///
    /// `overridable` mirrors aapt2's `allow_new`/override flag passed down
    /// from the table merger: when true, a `Conflict` verdict is resolved
    /// in favor of the incoming value instead of raising an error.
    pub fn add_resource(
        &mut self,
        name: &ResourceName,
        id: Option<ResourceId>,
        config: &ConfigDescription,
        product: &str,
        value: Value,
        source: Source,
        overridable: bool,
        diag: &mut dyn Diagnostics,
    ) -> Result<(), TableError> {
        if let Err(err) = validate_name(&name.entry, false) {
            diag.error(&source, &format!("resource name '{}' has invalid characters", name));
            return Err(err);
        }

        let package = self.find_or_create_package(&name.package);
        if let Some(id) = id {
            if let Some(existing) = package.id {
                if existing != id.package_id() {
                    diag.error(&source, &format!("trying to add resource '{}' with a package ID that conflicts with an existing one", name));
                    return Err(TableError::IdMismatch {
                        name: name.clone(),
                        new: id.id(),
                        existing: ResourceId::new(existing, 0, 0).id(),
                    });
                }
            } else {
                package.id = Some(id.package_id());
            }
        }

        let type_ = package.find_or_create_type(name.type_);
        if let Some(id) = id {
            if let Some(existing) = type_.id {
                if existing != id.type_id() {
                    diag.error(&source, &format!("trying to add resource '{}' with a type ID that conflicts with an existing one", name));
                    return Err(TableError::IdMismatch {
                        name: name.clone(),
                        new: id.id(),
                        existing: ResourceId::new(0, existing, 0).id(),
                    });
                }
            } else {
                type_.id = Some(id.type_id());
            }
        }

        let entry = type_.find_or_create_entry(&name.entry);
        if let Some(id) = id {
            if let Some(existing) = entry.id {
                if existing != id.entry_id() {
                    diag.error(&source, &format!("trying to add resource '{}' with an entry ID that conflicts with an existing one", name));
                    return Err(TableError::IdMismatch {
                        name: name.clone(),
                        new: id.id(),
                        existing: existing as u32,
                    });
                }
            } else {
                entry.id = Some(id.entry_id());
            }
        }

        let (created, slot) = entry.find_or_create_value(config, product);
        if created {
            slot.value = value;
            slot.source = source;
            return Ok(());
        }

        match resolve_value_collision(&slot.value, &value) {
            CollisionResult::KeepOriginal => {
                diag.note(&source, &format!("keeping existing value for '{}'", name));
                Ok(())
            }
            CollisionResult::TakeNew => {
                slot.value = value;
                slot.source = source;
                Ok(())
            }
            CollisionResult::Conflict if overridable => {
                diag.warn(&source, &format!("overriding conflicting value for '{}'", name));
                slot.value = value;
                slot.source = source;
                Ok(())
            }
            CollisionResult::Conflict => {
                diag.error(&source, &format!("duplicate value for resource '{}'", name));
                Err(TableError::Conflict(name.clone()))
            }
        }
    }

    /// `ResourceTable::setSymbolState`/`setSymbolStateImpl`: same name/ID
    /// validation as `add_resource`, followed by the monotonic visibility
    /// transition in [`SymbolState::can_transition_to`].
    pub fn set_symbol_state(
        &mut self,
        name: &ResourceName,
        id: Option<ResourceId>,
        symbol: Symbol,
        allow_mangled: bool,
        diag: &mut dyn Diagnostics,
    ) -> Result<(), TableError> {
        if let Err(err) = validate_name(&name.entry, allow_mangled) {
            diag.error(&symbol.source, &format!("resource name '{}' has invalid characters", name));
            return Err(err);
        }

        let package = self.find_or_create_package(&name.package);
        if let Some(id) = id {
            if let Some(existing) = package.id {
                if existing != id.package_id() {
                    diag.error(&symbol.source, &format!("trying to change symbol state of '{}' with a package ID that conflicts with an existing one", name));
                    return Err(TableError::IdMismatch {
                        name: name.clone(),
                        new: id.id(),
                        existing: ResourceId::new(existing, 0, 0).id(),
                    });
                }
            } else {
                package.id = Some(id.package_id());
            }
        }
        let type_ = package.find_or_create_type(name.type_);
        if let Some(id) = id {
            if let Some(existing) = type_.id {
                if existing != id.type_id() {
                    diag.error(&symbol.source, &format!("trying to change symbol state of '{}' with a type ID that conflicts with an existing one", name));
                    return Err(TableError::IdMismatch {
                        name: name.clone(),
                        new: id.id(),
                        existing: ResourceId::new(0, existing, 0).id(),
                    });
                }
            } else {
                type_.id = Some(id.type_id());
            }
        }
        // A published entry also publishes its type: `setSymbolStateImpl`
        // raises the type's own visibility to Public whenever the incoming
        // entry state is Public, since the monotonicity rule never lets
        // this downgrade a type that was already public.
        if symbol.state == SymbolState::Public && type_.symbol.state.can_transition_to(SymbolState::Public) {
            type_.symbol.state = SymbolState::Public;
        }
        let entry = type_.find_or_create_entry(&name.entry);
        if let Some(id) = id {
            if let Some(existing) = entry.id {
                if existing != id.entry_id() {
                    diag.error(&symbol.source, &format!("trying to change symbol state of '{}' with an entry ID that conflicts with an existing one", name));
                    return Err(TableError::IdMismatch {
                        name: name.clone(),
                        new: id.id(),
                        existing: existing as u32,
                    });
                }
            } else {
                entry.id = Some(id.entry_id());
            }
        }

        // A downgrade attempt is silently ignored: the call still succeeds
        // and the existing (more visible) symbol state is left untouched.
        if !entry.symbol.state.can_transition_to(symbol.state) {
            return Ok(());
        }
        entry.symbol = symbol;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::StderrDiagnostics;
    use crate::value::{BinaryPrimitive, DataType, Item};

    fn name(entry: &str) -> ResourceName {
        ResourceName::new("com.example.app", ResourceType::String, entry)
    }

    fn value(n: u32) -> Value {
        Value::Item(Item::BinaryPrimitive(BinaryPrimitive {
            data_type: DataType::IntDec,
            data: n,
        }))
    }

    #[test]
    fn add_resource_creates_full_hierarchy() {
        let mut table = ResourceTable::new();
        let mut diag = StderrDiagnostics;
        table
            .add_resource(
                &name("app_name"),
                None,
                &ConfigDescription::default(),
                "",
                value(1),
                Source::unknown(),
                false,
                &mut diag,
            )
            .unwrap();

        let entry = table.find_resource(&name("app_name")).unwrap();
        assert_eq!(entry.values().len(), 1);
    }

    #[test]
    fn add_resource_rejects_invalid_name() {
        let mut table = ResourceTable::new();
        let mut diag = StderrDiagnostics;
        let bad_name = ResourceName::new("com.example.app", ResourceType::String, "bad name!");
        let result = table.add_resource(
            &bad_name,
            None,
            &ConfigDescription::default(),
            "",
            value(1),
            Source::unknown(),
            false,
            &mut diag,
        );
        assert!(matches!(result, Err(TableError::InvalidName(_))));
    }

    #[test]
    fn add_resource_conflict_without_override_errors() {
        let mut table = ResourceTable::new();
        let mut diag = StderrDiagnostics;
        table
            .add_resource(
                &name("app_name"),
                None,
                &ConfigDescription::default(),
                "",
                value(1),
                Source::unknown(),
                false,
                &mut diag,
            )
            .unwrap();
        let result = table.add_resource(
            &name("app_name"),
            None,
            &ConfigDescription::default(),
            "",
            value(2),
            Source::unknown(),
            false,
            &mut diag,
        );
        assert!(matches!(result, Err(TableError::Conflict(_))));
    }

    #[test]
    fn add_resource_conflict_with_override_replaces() {
        let mut table = ResourceTable::new();
        let mut diag = StderrDiagnostics;
        table
            .add_resource(
                &name("app_name"),
                None,
                &ConfigDescription::default(),
                "",
                value(1),
                Source::unknown(),
                false,
                &mut diag,
            )
            .unwrap();
        table
            .add_resource(
                &name("app_name"),
                None,
                &ConfigDescription::default(),
                "",
                value(2),
                Source::unknown(),
                true,
                &mut diag,
            )
            .unwrap();
        let entry = table.find_resource(&name("app_name")).unwrap();
        assert_eq!(entry.values().len(), 1);
        assert_eq!(entry.values()[0].value, value(2));
    }

    #[test]
    fn id_mismatch_is_rejected() {
        let mut table = ResourceTable::new();
        let mut diag = StderrDiagnostics;
        let id_a = ResourceId::new(0x7f, 0x01, 0x0001);
        let id_b = ResourceId::new(0x7e, 0x01, 0x0001);
        table
            .add_resource(
                &name("app_name"),
                Some(id_a),
                &ConfigDescription::default(),
                "",
                value(1),
                Source::unknown(),
                false,
                &mut diag,
            )
            .unwrap();
        let result = table.add_resource(
            &name("other"),
            Some(id_b),
            &ConfigDescription::default(),
            "",
            value(1),
            Source::unknown(),
            false,
            &mut diag,
        );
        assert!(matches!(result, Err(TableError::IdMismatch { .. })));
    }

    #[test]
    fn types_stay_sorted_by_ordinal() {
        let mut table = ResourceTable::new();
        let package = table.find_or_create_package("com.example.app");
        package.find_or_create_type(ResourceType::Drawable);
        package.find_or_create_type(ResourceType::Attr);
        package.find_or_create_type(ResourceType::String);
        let ordinals: Vec<_> = package.types().iter().map(|t| t.type_).collect();
        let mut sorted = ordinals.clone();
        sorted.sort();
        assert_eq!(ordinals, sorted);
    }

    #[test]
    fn publishing_an_entry_also_publishes_its_type() {
        let mut table = ResourceTable::new();
        let mut diag = StderrDiagnostics;
        table
            .set_symbol_state(
                &name("app_name"),
                None,
                Symbol::new(SymbolState::Public, Source::unknown()),
                false,
                &mut diag,
            )
            .unwrap();

        let package = table.find_package("com.example.app").unwrap();
        let type_ = package.find_type(ResourceType::String).unwrap();
        assert_eq!(type_.symbol.state, SymbolState::Public);
    }

    #[test]
    fn downgrading_a_public_symbol_is_silently_ignored() {
        let mut table = ResourceTable::new();
        let mut diag = StderrDiagnostics;
        table
            .set_symbol_state(
                &name("app_name"),
                None,
                Symbol::new(SymbolState::Public, Source::unknown()),
                false,
                &mut diag,
            )
            .unwrap();

        table
            .set_symbol_state(
                &name("app_name"),
                None,
                Symbol::new(SymbolState::Private, Source::unknown()),
                false,
                &mut diag,
            )
            .unwrap();

        let entry = table
            .find_resource(&name("app_name"))
            .unwrap();
        assert_eq!(entry.symbol.state, SymbolState::Public);
    }

    #[test]
    fn set_symbol_state_rejects_conflicting_package_id() {
        let mut table = ResourceTable::new();
        let mut diag = StderrDiagnostics;
        table
            .set_symbol_state(
                &name("app_name"),
                Some(ResourceId::new(0x7f, 0x01, 0x0001)),
                Symbol::new(SymbolState::Public, Source::unknown()),
                false,
                &mut diag,
            )
            .unwrap();

        let result = table.set_symbol_state(
            &name("app_name"),
            Some(ResourceId::new(0x01, 0x01, 0x0001)),
            Symbol::new(SymbolState::Public, Source::unknown()),
            false,
            &mut diag,
        );
        assert!(matches!(result, Err(TableError::IdMismatch { .. })));
    }
}

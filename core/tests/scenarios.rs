//! Integration tests for the concrete scenarios in spec.md §8. Each test
//! name below refers back to the numbered scenario it covers.

use restable_core::{
    resolve_value_collision, Attribute, AttributeTypeMask, AttributeTypeMaskOpt, BinaryPrimitive,
    CollisionResult, ConfigDescription, DataType, Item, MergeError, ResourceId, ResourceName,
    ResourceTable, ResourceType, Source, StaticBuildContext, StderrDiagnostics, TableError,
    TableMerger, Value,
};

fn int_value(n: u32) -> Value {
    Value::Item(Item::BinaryPrimitive(BinaryPrimitive {
        data_type: DataType::IntDec,
        data: n,
    }))
}

/// Scenario 1: simple add and find.
#[test]
fn simple_add_and_find() {
    let mut table = ResourceTable::new();
    let mut diag = StderrDiagnostics;
    let string_ref = table.string_pool.insert("hi");

    table
        .add_resource(
            &ResourceName::new("app", ResourceType::String, "hello"),
            None,
            &ConfigDescription::default(),
            "",
            Value::Item(Item::String(string_ref)),
            Source::unknown(),
            false,
            &mut diag,
        )
        .unwrap();

    let entry = table
        .find_resource(&ResourceName::new("app", ResourceType::String, "hello"))
        .unwrap();
    assert_eq!(entry.values().len(), 1);
    assert_eq!(entry.values()[0].value.print(&table.string_pool), "\"hi\"");
}

/// Scenario 2: ID consistency — a second entry under the same type with a
/// disagreeing type byte is rejected.
#[test]
fn id_consistency_rejects_disagreeing_type_byte() {
    let mut table = ResourceTable::new();
    let mut diag = StderrDiagnostics;

    table
        .add_resource(
            &ResourceName::new("app", ResourceType::String, "hello"),
            Some(ResourceId::new(0x7f, 0x01, 0x0001)),
            &ConfigDescription::default(),
            "",
            int_value(1),
            Source::unknown(),
            false,
            &mut diag,
        )
        .unwrap();

    let result = table.add_resource(
        &ResourceName::new("app", ResourceType::String, "world"),
        Some(ResourceId::new(0x7f, 0x02, 0x0001)),
        &ConfigDescription::default(),
        "",
        int_value(1),
        Source::unknown(),
        false,
        &mut diag,
    );

    assert!(matches!(result, Err(TableError::IdMismatch { .. })));
}

/// Scenario 3: a weak `USE` attribute record loses to a later strong
/// `DECL`, with no error.
#[test]
fn weak_use_record_loses_to_strong_decl() {
    let mut table = ResourceTable::new();
    let mut diag = StderrDiagnostics;
    let name = ResourceName::new("app", ResourceType::Attr, "foo");

    let use_record = Value::Attribute(Attribute {
        type_mask: AttributeTypeMaskOpt(AttributeTypeMask::ANY),
        weak: true,
        ..Default::default()
    });
    table
        .add_resource(&name, None, &ConfigDescription::default(), "", use_record, Source::unknown(), false, &mut diag)
        .unwrap();

    let decl = Value::Attribute(Attribute {
        type_mask: AttributeTypeMaskOpt(AttributeTypeMask::REFERENCE | AttributeTypeMask::STRING),
        weak: false,
        ..Default::default()
    });
    table
        .add_resource(&name, None, &ConfigDescription::default(), "", decl, Source::unknown(), false, &mut diag)
        .unwrap();

    let entry = table.find_resource(&name).unwrap();
    let stored = entry.values()[0].value.as_attribute().unwrap();
    assert_eq!(
        stored.type_mask.0,
        AttributeTypeMask::REFERENCE | AttributeTypeMask::STRING
    );
}

/// Scenario 4: two non-weak DECLs with different formats conflict.
#[test]
fn two_decls_with_different_formats_conflict() {
    let mut table = ResourceTable::new();
    let mut diag = StderrDiagnostics;
    let name = ResourceName::new("app", ResourceType::Attr, "foo");

    let first = Value::Attribute(Attribute {
        type_mask: AttributeTypeMaskOpt(AttributeTypeMask::REFERENCE),
        weak: false,
        ..Default::default()
    });
    table
        .add_resource(&name, None, &ConfigDescription::default(), "", first, Source::unknown(), false, &mut diag)
        .unwrap();

    let second = Value::Attribute(Attribute {
        type_mask: AttributeTypeMaskOpt(AttributeTypeMask::STRING),
        weak: false,
        ..Default::default()
    });
    let result = table.add_resource(&name, None, &ConfigDescription::default(), "", second, Source::unknown(), false, &mut diag);

    assert!(matches!(result, Err(TableError::Conflict(_))));
}

/// Scenario 5: merging a library package under a mangled name.
#[test]
fn merge_with_mangling_prefixes_entries() {
    let mut master = ResourceTable::new();
    let ctx = StaticBuildContext::new("app", Some(0x7f));
    let mut diag = StderrDiagnostics;

    let mut lib = ResourceTable::new();
    let s = lib.string_pool.insert("hi");
    lib.add_resource(
        &ResourceName::new("lib", ResourceType::String, "hello"),
        None,
        &ConfigDescription::default(),
        "",
        Value::Item(Item::String(s)),
        Source::unknown(),
        false,
        &mut diag,
    )
    .unwrap();

    let mut merger = TableMerger::new(&mut master, &ctx).unwrap();
    merger.merge_and_mangle(&mut master, &lib, "lib", false, &mut diag).unwrap();

    let entry = master
        .find_resource(&ResourceName::new("app", ResourceType::String, "lib$hello"))
        .unwrap();
    assert_eq!(entry.values()[0].value.print(&master.string_pool), "\"hi\"");
    assert_eq!(merger.merged_packages(), &["lib".to_string()]);
}

/// Collision resolver laws (spec.md §8): spot-checked directly, since the
/// full table is exercised via the scenarios above.
#[test]
fn collision_resolver_laws() {
    let weak = Value::Item(Item::Id);
    let strong = int_value(1);
    assert_eq!(resolve_value_collision(&weak, &strong), CollisionResult::TakeNew);
    assert_eq!(resolve_value_collision(&strong, &weak), CollisionResult::KeepOriginal);
    assert_eq!(resolve_value_collision(&strong, &int_value(2)), CollisionResult::Conflict);
}

/// Merging two static libraries that each publish a conflicting public ID
/// for the same type is an error, not a silent override.
#[test]
fn merge_rejects_conflicting_public_type_ids() {
    let mut master = ResourceTable::new();
    let ctx = StaticBuildContext::new("app", Some(0x7f));
    let mut diag = StderrDiagnostics;

    {
        let package = master.find_or_create_package("app");
        let type_ = package.find_or_create_type(ResourceType::String);
        type_.id = Some(0x02);
        type_.symbol.state = restable_core::SymbolState::Public;
    }

    let mut lib = ResourceTable::new();
    {
        let package = lib.find_or_create_package("app");
        let type_ = package.find_or_create_type(ResourceType::String);
        type_.id = Some(0x03);
        type_.symbol.state = restable_core::SymbolState::Public;
    }

    let mut merger = TableMerger::new(&mut master, &ctx).unwrap();
    let result = merger.merge(&mut master, &lib, false, &mut diag);
    assert!(matches!(result, Err(MergeError::PublicIdTypeConflict { .. })));
}

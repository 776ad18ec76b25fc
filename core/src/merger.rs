//! Table merger (component F): folds one `ResourceTable` into another,
//! optionally mangling entry names so a merged-in package's resources
//! can't collide with the master table's own.
//!
//! Grounded in `original_source/link/TableMerger.cpp`. `merge` handles the
//! common case (a table whose package already matches the compilation
//! package); `merge_and_mangle` is for static-library dependencies, whose
//! resources get folded in under a mangled name so `@lib:string/app_name`
//! and the app's own `app_name` can coexist. File-backed values
//! (`FileReference`) are never copied here — `clone_and_mangle` only
//! rewrites the *path* a reference will eventually point to and queues the
//! actual file copy as a [`FileToMerge`] for an external collaborator to
//! carry out, matching the spec's file-I/O non-goal.

use crate::collision::{resolve_value_collision, CollisionResult};
use crate::diagnostics::{BuildContext, Diagnostics};
use crate::errors::MergeError;
use crate::identifier::{ResourceName, ResourceType};
use crate::mangle::mangle_entry;
use crate::source::Source;
use crate::string_pool::StringPool;
use crate::table::{ResourceTable, ResourceTablePackage};
use crate::value::{FileReference, Item, Value};

/// A file-backed value whose logical path changed during a mangled merge.
/// The merger never touches the filesystem; a front end drains this queue
/// and copies `old_path` to `new_path` itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileToMerge {
    pub old_path: String,
    pub new_path: String,
}

/// Splits a resource file path into `(prefix, stem, suffix)`, e.g.
/// `"res/drawable/icon.png"` into `("res/drawable/", "icon", ".png")`.
/// Mirrors `extractResFilePathParts`.
fn extract_path_parts(path: &str) -> (&str, &str, &str) {
    let (prefix, filename) = match path.rfind('/') {
        Some(idx) => (&path[..=idx], &path[idx + 1..]),
        None => ("", path),
    };
    match filename.rfind('.') {
        Some(idx) => (prefix, &filename[..idx], &filename[idx..]),
        None => (prefix, filename, ""),
    }
}

fn mangle_file_path(package: &str, path: &str) -> String {
    let (prefix, stem, suffix) = extract_path_parts(path);
    format!("{}{}{}", prefix, mangle_entry(package, stem), suffix)
}

/// Drives one or more merges into a shared master table.
pub struct TableMerger<'ctx> {
    context: &'ctx dyn BuildContext,
    merged_packages: Vec<String>,
    files_to_merge: Vec<FileToMerge>,
}

impl<'ctx> TableMerger<'ctx> {
    pub fn new(master: &mut ResourceTable, context: &'ctx dyn BuildContext) -> Result<Self, crate::errors::TableError> {
        master.create_package(context.compilation_package(), context.package_id())?;
        Ok(TableMerger {
            context,
            merged_packages: Vec::new(),
            files_to_merge: Vec::new(),
        })
    }

    /// Packages merged so far under a mangled name.
    pub fn merged_packages(&self) -> &[String] {
        &self.merged_packages
    }

    /// Drains the queue of file-reference path rewrites collected by
    /// mangled merges.
    pub fn take_files_to_merge(&mut self) -> Vec<FileToMerge> {
        std::mem::take(&mut self.files_to_merge)
    }

    /// `TableMerger::merge`: merges every package in `other` whose name
    /// matches the compilation package (or is empty, i.e. anonymous)
    /// straight into master, with no name mangling.
    pub fn merge(
        &mut self,
        master: &mut ResourceTable,
        other: &ResourceTable,
        override_existing: bool,
        diag: &mut dyn Diagnostics,
    ) -> Result<(), MergeError> {
        let compilation_package = self.context.compilation_package().to_string();
        for src_package in other.packages() {
            if !src_package.name.is_empty() && src_package.name != compilation_package {
                continue;
            }
            if let (Some(desired), Some(actual)) = (self.context.package_id(), src_package.id) {
                if desired != 0 && actual != desired {
                    diag.warn(
                        &Source::unknown(),
                        &format!(
                            "package '{}' has ID {:#04x} but the compilation package ID is {:#04x}; skipping",
                            src_package.name, actual, desired
                        ),
                    );
                    continue;
                }
            }
            self.do_merge(master, other, src_package, false, override_existing, diag)?;
        }
        Ok(())
    }

    /// `TableMerger::mergeAndMangle`: merges the package named
    /// `package_name` out of `other`, mangling its entry names unless that
    /// name happens to equal the compilation package.
    pub fn merge_and_mangle(
        &mut self,
        master: &mut ResourceTable,
        other: &ResourceTable,
        package_name: &str,
        override_existing: bool,
        diag: &mut dyn Diagnostics,
    ) -> Result<(), MergeError> {
        let compilation_package = self.context.compilation_package().to_string();
        let mangle = package_name != compilation_package;
        for src_package in other.packages() {
            if src_package.name != package_name {
                continue;
            }
            self.do_merge(master, other, src_package, mangle, override_existing, diag)?;
            if mangle {
                self.merged_packages.push(package_name.to_string());
            }
        }
        Ok(())
    }

    fn do_merge(
        &mut self,
        master: &mut ResourceTable,
        other: &ResourceTable,
        src_package: &ResourceTablePackage,
        mangle: bool,
        override_existing: bool,
        diag: &mut dyn Diagnostics,
    ) -> Result<(), MergeError> {
        let master_package_name = self.context.compilation_package().to_string();

        for src_type in src_package.types() {
            let dst_type = master
                .find_or_create_package(&master_package_name)
                .find_or_create_type(src_type.type_);

            if src_type.symbol.is_public() {
                if let (true, Some(existing), Some(incoming)) =
                    (dst_type.symbol.is_public(), dst_type.id, src_type.id)
                {
                    if existing != incoming {
                        return Err(MergeError::PublicIdTypeConflict {
                            id: incoming as u32,
                            type_: src_type.type_.to_string(),
                        });
                    }
                }
                if dst_type.symbol.state.can_transition_to(src_type.symbol.state) {
                    dst_type.symbol = src_type.symbol.clone();
                }
                if let Some(incoming) = src_type.id {
                    dst_type.id.get_or_insert(incoming);
                }
            } else if let (None, Some(incoming)) = (dst_type.id, src_type.id) {
                dst_type.id = Some(incoming);
            }

            for src_entry in src_type.entries() {
                let entry_name = if mangle {
                    mangle_entry(&src_package.name, &src_entry.name)
                } else {
                    src_entry.name.clone()
                };

                let resource_name =
                    ResourceName::new(master_package_name.clone(), src_type.type_, entry_name.clone());

                let dst_type = master
                    .find_or_create_package(&master_package_name)
                    .find_or_create_type(src_type.type_);
                let dst_entry = dst_type.find_or_create_entry(&entry_name);

                match (dst_entry.id, src_entry.id) {
                    (Some(existing), Some(incoming)) if existing != incoming => {
                        return Err(MergeError::PublicIdConflict {
                            id: incoming as u32,
                            name: resource_name.clone(),
                        });
                    }
                    (None, Some(incoming)) => dst_entry.id = Some(incoming),
                    _ => {}
                }

                if dst_entry.symbol.state.can_transition_to(src_entry.symbol.state)
                    && src_entry.symbol.state > dst_entry.symbol.state
                {
                    dst_entry.symbol = src_entry.symbol.clone();
                }

                for src_value in src_entry.values() {
                    let cloned = clone_and_mangle(
                        &mut master.string_pool,
                        &other.string_pool,
                        &src_value.value,
                        mangle.then_some(src_package.name.as_str()),
                        &mut self.files_to_merge,
                    );

                    let dst_type = master
                        .find_or_create_package(&master_package_name)
                        .find_or_create_type(src_type.type_);
                    let dst_entry = dst_type.find_or_create_entry(&entry_name);
                    let (created, slot) = dst_entry.find_or_create_value(&src_value.config, &src_value.product);
                    if created {
                        slot.value = cloned;
                        slot.source = src_value.source.clone();
                        continue;
                    }

                    match resolve_value_collision(&slot.value, &cloned) {
                        CollisionResult::KeepOriginal => {
                            diag.note(&src_value.source, &format!("keeping existing value for '{}'", resource_name));
                        }
                        CollisionResult::TakeNew => {
                            slot.value = cloned;
                            slot.source = src_value.source.clone();
                        }
                        CollisionResult::Conflict if override_existing => {
                            slot.value = cloned;
                            slot.source = src_value.source.clone();
                        }
                        CollisionResult::Conflict => {
                            diag.error(&src_value.source, &format!("duplicate value for resource '{}' while merging", resource_name));
                            return Err(MergeError::Table(crate::errors::TableError::Conflict(resource_name)));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// `TableMerger::clone`/`cloneAndMangle`: re-interns any string references
/// the value holds into the master pool, and, for a mangled merge,
/// rewrites a `FileReference`'s path and records the rewrite so a caller
/// can copy the underlying file afterward.
fn clone_and_mangle(
    dst_pool: &mut StringPool,
    src_pool: &StringPool,
    value: &Value,
    mangle_package: Option<&str>,
    files_to_merge: &mut Vec<FileToMerge>,
) -> Value {
    let Some(package) = mangle_package else {
        return value.clone_value(dst_pool, src_pool);
    };

    if let Value::Item(Item::FileReference(FileReference { path })) = value {
        let old_path = src_pool.get_str(*path).unwrap_or("").to_string();
        let new_path = mangle_file_path(package, &old_path);
        files_to_merge.push(FileToMerge {
            old_path: old_path.clone(),
            new_path: new_path.clone(),
        });
        return Value::Item(Item::FileReference(FileReference {
            path: dst_pool.insert(new_path),
        }));
    }

    value.clone_value(dst_pool, src_pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigDescription;
    use crate::diagnostics::{StaticBuildContext, StderrDiagnostics};
    use crate::value::{BinaryPrimitive, DataType};

    fn name(pkg: &str, entry: &str) -> ResourceName {
        ResourceName::new(pkg, ResourceType::String, entry)
    }

    fn int_value(n: u32) -> Value {
        Value::Item(Item::BinaryPrimitive(BinaryPrimitive {
            data_type: DataType::IntDec,
            data: n,
        }))
    }

    #[test]
    fn merge_copies_matching_package() {
        let mut master = ResourceTable::new();
        let ctx = StaticBuildContext::new("com.app", Some(0x7f));
        let mut diag = StderrDiagnostics;

        let mut other = ResourceTable::new();
        other
            .add_resource(
                &name("com.app", "app_name"),
                None,
                &ConfigDescription::default(),
                "",
                int_value(1),
                Source::unknown(),
                false,
                &mut diag,
            )
            .unwrap();

        let mut merger = TableMerger::new(&mut master, &ctx).unwrap();
        merger.merge(&mut master, &other, false, &mut diag).unwrap();

        assert!(master.find_resource(&name("com.app", "app_name")).is_some());
    }

    #[test]
    fn merge_and_mangle_renames_entries() {
        let mut master = ResourceTable::new();
        let ctx = StaticBuildContext::new("com.app", Some(0x7f));
        let mut diag = StderrDiagnostics;

        let mut lib = ResourceTable::new();
        lib.add_resource(
            &name("com.lib", "app_name"),
            None,
            &ConfigDescription::default(),
            "",
            int_value(1),
            Source::unknown(),
            false,
            &mut diag,
        )
        .unwrap();

        let mut merger = TableMerger::new(&mut master, &ctx).unwrap();
        merger
            .merge_and_mangle(&mut master, &lib, "com.lib", false, &mut diag)
            .unwrap();

        assert!(master
            .find_resource(&name("com.app", "com.lib$app_name"))
            .is_some());
        assert_eq!(merger.merged_packages(), &["com.lib".to_string()]);
    }

    #[test]
    fn mangled_file_reference_is_rewritten_and_queued() {
        let mut master = ResourceTable::new();
        let ctx = StaticBuildContext::new("com.app", Some(0x7f));
        let mut diag = StderrDiagnostics;

        let mut lib = ResourceTable::new();
        let path_ref = lib.string_pool.insert("res/drawable/icon.png");
        lib.add_resource(
            &ResourceName::new("com.lib", ResourceType::Drawable, "icon"),
            None,
            &ConfigDescription::default(),
            "",
            Value::Item(Item::FileReference(FileReference { path: path_ref })),
            Source::unknown(),
            false,
            &mut diag,
        )
        .unwrap();

        let mut merger = TableMerger::new(&mut master, &ctx).unwrap();
        merger
            .merge_and_mangle(&mut master, &lib, "com.lib", false, &mut diag)
            .unwrap();

        let files = merger.take_files_to_merge();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].old_path, "res/drawable/icon.png");
        assert_eq!(files[0].new_path, "res/drawable/com.lib$icon.png");
    }

    #[test]
    fn extract_path_parts_splits_prefix_stem_suffix() {
        assert_eq!(
            extract_path_parts("res/drawable/icon.png"),
            ("res/drawable/", "icon", ".png")
        );
        assert_eq!(extract_path_parts("icon"), ("", "icon", ""));
    }

    #[test]
    fn merging_a_public_type_adopts_its_id_and_visibility() {
        let mut master = ResourceTable::new();
        let ctx = StaticBuildContext::new("com.app", Some(0x7f));
        let mut diag = StderrDiagnostics;

        let mut lib = ResourceTable::new();
        lib.add_resource(
            &name("com.app", "app_name"),
            None,
            &ConfigDescription::default(),
            "",
            int_value(1),
            Source::unknown(),
            false,
            &mut diag,
        )
        .unwrap();
        {
            let package = lib.find_or_create_package("com.app");
            let type_ = package.find_or_create_type(ResourceType::String);
            type_.id = Some(0x02);
            type_.symbol.state = crate::symbol::SymbolState::Public;
        }

        let mut merger = TableMerger::new(&mut master, &ctx).unwrap();
        merger.merge(&mut master, &lib, false, &mut diag).unwrap();

        let package = master.find_package("com.app").unwrap();
        let type_ = package.find_type(ResourceType::String).unwrap();
        assert_eq!(type_.id, Some(0x02));
        assert_eq!(type_.symbol.state, crate::symbol::SymbolState::Public);
    }
}

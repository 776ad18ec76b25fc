//! Entry name mangling, used when merging a table into a different
//! compilation package under a name that isn't the target package's own.
//!
//! Grounded in `original_source/link/TableMerger.cpp`'s
//! `NameMangler::mangleEntry`/`unmangleEntry`: a mangled entry name embeds
//! the originating package so that, e.g., `com.lib:string/app_name` merged
//! into `com.app` becomes `com.app:string/com.lib$app_name` without
//! colliding with `com.app`'s own `app_name`.

/// Combines a package name and entry name into a mangled entry name.
pub fn mangle_entry(package: &str, entry: &str) -> String {
    format!("{}${}", package, entry)
}

/// Splits a mangled entry name back into `(package, entry)`, if it is one.
/// An entry name with no `$` is not mangled.
pub fn unmangle_entry(mangled: &str) -> Option<(&str, &str)> {
    mangled.split_once('$')
}

pub fn is_mangled(name: &str) -> bool {
    name.contains('$')
}

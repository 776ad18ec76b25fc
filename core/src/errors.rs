//! Error types for `restable-core`.

use thiserror::Error;

use crate::identifier::ResourceName;

/// Failures raised while adding a resource, or a file, to a [`crate::table::ResourceTable`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("resource name '{0}' has invalid characters")]
    InvalidName(String),

    #[error("trying to add resource '{name}' with ID {new:#010x} but existing ID is {existing:#010x}")]
    IdMismatch {
        name: ResourceName,
        new: u32,
        existing: u32,
    },

    #[error("trying to create package '{package}' with ID {new:#04x} but existing ID is {existing:#04x}")]
    PackageIdMismatch {
        package: String,
        new: u8,
        existing: u8,
    },

    #[error("can't add resource '{0}': conflicts with an existing, stronger-priority value")]
    Conflict(ResourceName),

    #[error("symbol state for '{name}' cannot be downgraded from public")]
    PublicDowngrade { name: ResourceName },
}

/// Failures raised while merging one table into another.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("public resource ID {id:#010x} for type '{type_}' already assigned to a different type")]
    PublicIdTypeConflict { id: u32, type_: String },

    #[error("duplicate public resource ID {id:#010x} for '{name}'")]
    PublicIdConflict { id: u32, name: ResourceName },

    #[error("resource '{0}' has a private symbol and cannot be merged without mangling")]
    PrivateSymbol(ResourceName),
}

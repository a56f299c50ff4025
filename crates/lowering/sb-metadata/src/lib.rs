//! Symbol graph construction
//!
//! Turns parsed compilation units into the symbol graph of a
//! [`sb_model::ScriptModel`]:
//! - [`CoreLibrary`] installs the imported `System` namespace with the
//!   intrinsic types every program can reference
//! - [`MetadataBuilder`] declares the application's namespaces, types,
//!   members and parameters, merges partial classes and links base types,
//!   overrides and interface implementations

mod builder;
mod core_library;
mod validate;

pub use builder::{CONSTRUCTOR_NAME, INDEXER_NAME, MetadataBuilder, VALUE_PARAMETER_NAME};
pub use core_library::{CoreLibrary, MetadataImporter};
pub use validate::field_declarator;

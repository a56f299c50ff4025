//! Name resolution for Sable
//!
//! Lowering of a member body keeps a [`LocalSymbolTable`] holding the
//! stack of lexical scopes entered so far. Names are resolved by
//! [`find_symbol`], which searches
//! - the active scope chain, innermost first
//! - the members of the enclosing type and its bases
//! - the types of the enclosing namespaces, the imported namespaces and
//!   the global namespace
//!
//! Type references written in declarations resolve through
//! [`resolve_type_name`].

pub mod lookup;
pub mod table;

pub use lookup::{Resolved, find_symbol, resolve_type_name};
pub use table::LocalSymbolTable;

//! Output naming for the symbol graph and lowered bodies
//!
//! A [`SymbolTransformer`] decides what every emitted symbol is called in
//! the generated script. [`SymbolSetTransformer`] walks the application
//! types in inheritance order and records the decisions on the graph;
//! [`ImplementationTransformer`] then applies the same strategy to the
//! locals of every lowered body.
//!
//! Two strategies exist: [`SymbolInternalizer`] keeps source names and
//! checks them for collisions, [`SymbolObfuscator`] packs everything it may
//! rename into short identifiers.

mod implementation;
mod internalizer;
mod names;
mod obfuscator;
mod set;
mod transformer;

pub use implementation::ImplementationTransformer;
pub use internalizer::SymbolInternalizer;
pub use names::{NameGenerator, RESERVED_WORDS};
pub use obfuscator::{SymbolObfuscator, keeps_name, keeps_type_name};
pub use set::SymbolSetTransformer;
pub use transformer::SymbolTransformer;

#[cfg(test)]
mod test_support;

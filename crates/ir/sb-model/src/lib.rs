//! Program model shared by every compiler stage
//!
//! The [`ScriptModel`] owns the symbol graph for a whole program, the
//! lowered body of every member and the script-level metadata. Symbols
//! live in an arena and refer to each other by [`SymbolId`]; only the
//! parent-to-child lists express ownership.

pub mod dump;
pub mod ir;
pub mod metadata;
pub mod model;
pub mod scope;
pub mod symbols;

pub use dump::{dump_implementation, write_implementation};
pub use ir::{
    BinaryOp, BodyPart, CatchBlock, Expression, ExpressionKind, ImplementationKey, LiteralValue,
    Statement, SymbolImplementation, UnaryOp, VariableInitializer,
};
pub use metadata::{RUNTIME_MODULE_NAME, ScriptDependency, ScriptMetadata};
pub use model::{ResourceTable, ScriptModel};
pub use scope::{LocalId, LocalSymbol, ScopeEntry, ScopeId, ScopeKind, ScopeTree, SymbolScope};
pub use symbols::{
    IntrinsicType, MemberData, MemberKind, NamespaceData, NamingHints, ParameterData, Symbol,
    SymbolFlags, SymbolFilter, SymbolId, SymbolKind, TypeData, TypeKind,
};

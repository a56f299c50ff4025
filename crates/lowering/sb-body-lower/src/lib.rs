//! Body lowering: parse-tree bodies to semantic statements and expressions
//!
//! [`ImplementationBuilder`] lowers one member body at a time, keeping a
//! [`sb_resolve::LocalSymbolTable`] for the scopes of that body.
//! [`StatementBuilder`] and [`ExpressionBuilder`] walk the statements and
//! expressions, resolving names, overloads and member accesses against the
//! symbol graph. [`CodeBuilder`] drives lowering for every member of the
//! program and reports failures without stopping at the first one.

mod code;
mod context;
mod expression;
mod implementation;
mod overload;
mod statement;

pub use code::CodeBuilder;
pub use context::BodyContext;
pub use expression::ExpressionBuilder;
pub use implementation::{ImplementationBuilder, THIS_IDENTIFIER, CAPTURED_THIS_IDENTIFIER};
pub use statement::StatementBuilder;

//! Index-addressed storage for the symbol graph, scope trees and locals
//!
//! Tables hand out `Idx<T>` handles; cross-links between symbols and scopes
//! are stored as handles, never as references.

pub use la_arena::{Arena, Idx};

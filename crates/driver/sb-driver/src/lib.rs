//! Compilation driver
//!
//! Runs the compiler stages over a set of parsed compilation units:
//! graph construction, the type-name conflict check, body lowering and
//! output naming, stopping at the first stage that reports an error. The
//! named model is finally handed to a [`ScriptGenerator`], if one is given.

mod compiler;
mod conflicts;
mod error;
mod generator;
mod options;

pub use compiler::{Compilation, Compiler};
pub use conflicts::check_type_names;
pub use error::DriverError;
pub use generator::ScriptGenerator;
pub use options::CompilerOptions;

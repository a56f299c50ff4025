//! Naming strategy interface

use sb_diagnostics::Diagnostic;
use sb_model::{ScriptModel, SymbolId};

/// Decides the output name of each emitted symbol
///
/// Every method returns the new name, or `None` to keep the symbol's
/// script name. Callers visit types so that a type's base classes and
/// interfaces, and their members, are named before the type itself.
pub trait SymbolTransformer {
    /// Called once with the whole graph before any symbol is visited
    fn prepare(&mut self, _model: &ScriptModel) {}

    /// Output name of an application type
    fn transform_type(&mut self, model: &ScriptModel, ty: SymbolId) -> Option<String>;

    /// Output name of a member of an application type
    ///
    /// # Errors
    ///
    /// Returns a diagnostic when the member cannot be named without a
    /// collision.
    fn transform_member(
        &mut self,
        model: &ScriptModel,
        member: SymbolId,
    ) -> Result<Option<String>, Diagnostic>;

    /// Output name of a member's formal parameter
    fn transform_parameter(&mut self, model: &ScriptModel, parameter: SymbolId) -> Option<String>;

    /// Name for the body-local at `position` in its scope chain
    ///
    /// Positions count parameters and locals of enclosing scopes first.
    fn transform_local(&mut self, position: usize) -> Option<String>;
}

//! Hand-off to script generation

use sb_diagnostics::Diagnostic;
use sb_model::ScriptModel;

/// Writes the generated script for a fully named model
///
/// Generation runs only when every earlier stage succeeded, so every
/// emitted symbol has its final output name and every body is lowered.
pub trait ScriptGenerator {
    /// Generate the script
    ///
    /// # Errors
    ///
    /// Returns the diagnostics describing why generation failed.
    fn generate(&mut self, model: &ScriptModel) -> Result<(), Vec<Diagnostic>>;
}

//! Whole-graph naming walk

use crate::transformer::SymbolTransformer;
use rustc_hash::FxHashSet;
use sb_diagnostics::ErrorReporter;
use sb_model::{ScriptModel, SymbolId, TypeKind};

/// Applies a [`SymbolTransformer`] to every emitted symbol of the program
///
/// Imported types and delegates keep their identity and are not visited.
/// Symbols that already carry a generated name are left alone, so running
/// the walk again over a named graph changes nothing.
pub struct SymbolSetTransformer<'t, T: SymbolTransformer> {
    transformer: &'t mut T,
}

impl<'t, T: SymbolTransformer> SymbolSetTransformer<'t, T> {
    /// Walk driven by `transformer`
    pub fn new(transformer: &'t mut T) -> Self {
        Self { transformer }
    }

    /// Name every application type, member and parameter
    ///
    /// With `use_inheritance_order`, base classes and interfaces are
    /// visited before the types deriving from them; otherwise declaration
    /// order is used. Returns the symbols that received a name.
    pub fn transform_symbol_set<R: ErrorReporter>(
        &mut self,
        model: &mut ScriptModel,
        reporter: &mut R,
        use_inheritance_order: bool,
    ) -> Vec<SymbolId> {
        let _span = tracing::info_span!("transform_symbols").entered();
        self.transformer.prepare(model);

        let types = if use_inheritance_order {
            inheritance_order(model)
        } else {
            model
                .types()
                .into_iter()
                .filter(|ty| !model.is_secondary_partial(*ty))
                .collect()
        };

        let mut transformed = Vec::new();
        for ty in types {
            if !is_emitted(model, ty) {
                continue;
            }
            if model.symbol(ty).generated_name.is_none() {
                if let Some(name) = self.transformer.transform_type(model, ty) {
                    tracing::debug!(ty = %model.full_name(ty), %name, "type named");
                    model.set_generated_name(ty, name);
                    transformed.push(ty);
                }
            }

            for member in model.members(ty).to_vec() {
                if model.symbol(member).generated_name.is_none() {
                    match self.transformer.transform_member(model, member) {
                        Ok(Some(name)) => {
                            tracing::debug!(member = %model.full_name(member), %name, "member named");
                            model.set_generated_name(member, name);
                            transformed.push(member);
                        }
                        Ok(None) => {}
                        Err(diagnostic) => reporter.report(diagnostic),
                    }
                }

                for parameter in model.parameters(member).to_vec() {
                    if model.symbol(parameter).generated_name.is_some() {
                        continue;
                    }
                    if let Some(name) = self.transformer.transform_parameter(model, parameter) {
                        model.set_generated_name(parameter, name);
                        transformed.push(parameter);
                    }
                }
            }
        }

        // Partial fragments are emitted as one type
        for ty in model.types() {
            if !model.is_secondary_partial(ty) || model.symbol(ty).generated_name.is_some() {
                continue;
            }
            let primary = model.primary_of(ty);
            if let Some(name) = model.symbol(primary).generated_name.clone() {
                model.set_generated_name(ty, name);
                transformed.push(ty);
            }
        }

        tracing::debug!(count = transformed.len(), "symbols named");
        transformed
    }
}

/// Whether a type gets an output identity of its own
fn is_emitted(model: &ScriptModel, ty: SymbolId) -> bool {
    model
        .type_data(ty)
        .is_some_and(|data| data.is_application && data.kind != TypeKind::Delegate)
}

/// Primary types with every base class and interface ahead of its dependents
fn inheritance_order(model: &ScriptModel) -> Vec<SymbolId> {
    let mut order = Vec::new();
    let mut visited = FxHashSet::default();
    for ty in model.types() {
        visit(model, model.primary_of(ty), &mut visited, &mut order);
    }
    order
}

fn visit(model: &ScriptModel, ty: SymbolId, visited: &mut FxHashSet<SymbolId>, order: &mut Vec<SymbolId>) {
    if !visited.insert(ty) {
        return;
    }
    if let Some(data) = model.type_data(ty) {
        let bases: Vec<SymbolId> = data
            .base_class
            .into_iter()
            .chain(data.interfaces.iter().copied())
            .collect();
        for base in bases {
            visit(model, model.primary_of(base), visited, order);
        }
    }
    order.push(ty);
}

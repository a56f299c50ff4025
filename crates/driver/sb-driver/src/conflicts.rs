//! Type-name conflict check

use rustc_hash::FxHashMap;
use sb_diagnostics::{CompileError, Diagnostic, ErrorReporter};
use sb_model::{ScriptModel, SymbolId, TypeKind};
use sb_rename::keeps_type_name;

/// Report application types that would be emitted under the same name
///
/// Namespaces are merged in the generated script, so two types collide
/// when their script names match regardless of namespace. Delegates and
/// secondary partial fragments are never emitted on their own and are
/// skipped. When `minimize` is set, types that will receive a synthetic
/// name cannot collide and are skipped too.
pub fn check_type_names<R: ErrorReporter>(
    model: &ScriptModel,
    types: &[SymbolId],
    minimize: bool,
    reporter: &mut R,
) {
    let mut claimed: FxHashMap<&str, SymbolId> = FxHashMap::default();
    for &ty in types {
        let Some(data) = model.type_data(ty) else {
            continue;
        };
        if !data.is_application || data.kind == TypeKind::Delegate || model.is_secondary_partial(ty) {
            continue;
        }
        if minimize && !keeps_type_name(model, ty) {
            continue;
        }

        let name = model.script_name(ty);
        match claimed.get(name) {
            Some(&other) => reporter.report(Diagnostic::at(
                CompileError::ConflictingTypeName {
                    name: model.full_name(ty),
                    other: model.full_name(other),
                },
                model.symbol(ty).span,
            )),
            None => {
                claimed.insert(name, ty);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_diagnostics::DiagnosticBag;
    use sb_metadata::{CoreLibrary, MetadataBuilder, MetadataImporter};
    use sb_syntax::{CompilationUnit, Hints, Modifiers, NamespaceDecl, TypeDecl};

    fn declare(units: &[CompilationUnit]) -> (ScriptModel, Vec<SymbolId>) {
        let mut model = ScriptModel::default();
        let mut bag = DiagnosticBag::new();
        CoreLibrary.import(&mut model);
        let types = MetadataBuilder::new(&mut model, &mut bag).build(units);
        assert!(!bag.has_errors(), "{:?}", bag.diagnostics());
        (model, types)
    }

    fn widgets(modifiers: Modifiers) -> Vec<CompilationUnit> {
        vec![
            CompilationUnit::with_namespace(NamespaceDecl::new(
                "App",
                vec![TypeDecl::class("Widget").with_modifiers(modifiers)],
            )),
            CompilationUnit::with_namespace(NamespaceDecl::new(
                "Other",
                vec![TypeDecl::class("Widget").with_modifiers(modifiers)],
            )),
        ]
    }

    #[test]
    fn test_same_script_name_in_two_namespaces_conflicts() {
        let (model, types) = declare(&widgets(Modifiers::default()));
        let mut bag = DiagnosticBag::new();
        check_type_names(&model, &types, false, &mut bag);

        assert_eq!(bag.len(), 1);
        assert_eq!(
            bag.diagnostics()[0].error,
            CompileError::ConflictingTypeName {
                name: "Other.Widget".to_string(),
                other: "App.Widget".to_string(),
            }
        );
    }

    #[test]
    fn test_types_renamed_when_minimizing_cannot_conflict() {
        let (model, types) = declare(&widgets(Modifiers::default()));
        let mut bag = DiagnosticBag::new();
        check_type_names(&model, &types, true, &mut bag);
        assert!(!bag.has_errors());

        let (model, types) = declare(&widgets(Modifiers::default().public()));
        let mut bag = DiagnosticBag::new();
        check_type_names(&model, &types, true, &mut bag);
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn test_script_name_hints_are_compared() {
        let unit = CompilationUnit::with_namespace(NamespaceDecl::new(
            "App",
            vec![
                TypeDecl::class("Button"),
                TypeDecl::class("Toggle").with_hints(Hints {
                    script_name: Some("Button".to_string()),
                    ..Hints::default()
                }),
                TypeDecl::delegate("Handler"),
                TypeDecl::delegate("Handler2").with_hints(Hints {
                    script_name: Some("Handler".to_string()),
                    ..Hints::default()
                }),
            ],
        ));
        let (model, types) = declare(&[unit]);
        let mut bag = DiagnosticBag::new();
        check_type_names(&model, &types, false, &mut bag);

        assert_eq!(bag.len(), 1);
        assert_eq!(
            bag.diagnostics()[0].error,
            CompileError::ConflictingTypeName {
                name: "App.Toggle".to_string(),
                other: "App.Button".to_string(),
            }
        );
    }
}

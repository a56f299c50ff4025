//! Keep source names, reject collisions

use crate::transformer::SymbolTransformer;
use rustc_hash::FxHashMap;
use sb_diagnostics::{CompileError, Diagnostic};
use sb_model::{MemberKind, ScriptModel, SymbolId};
use sb_syntax::MemberDecl;

/// Naming strategy for readable output
///
/// Every symbol is emitted under its script name. Two members of one type
/// sharing an output name are rejected, unless they are overloads of which
/// at most one has a body: the bodiless ones only describe call shapes.
#[derive(Debug, Default)]
pub struct SymbolInternalizer {
    emitted: FxHashMap<(SymbolId, String), Vec<SymbolId>>,
}

impl SymbolInternalizer {
    /// Strategy with no members seen yet
    pub fn new() -> Self {
        Self::default()
    }
}

impl SymbolTransformer for SymbolInternalizer {
    fn transform_type(&mut self, model: &ScriptModel, ty: SymbolId) -> Option<String> {
        Some(model.script_name(ty).to_string())
    }

    fn transform_member(
        &mut self,
        model: &ScriptModel,
        member: SymbolId,
    ) -> Result<Option<String>, Diagnostic> {
        let name = model.script_name(member).to_string();
        let Some(owner) = model.containing_type(member) else {
            return Ok(Some(name));
        };

        let group = self.emitted.entry((owner, name.clone())).or_default();
        group.push(member);
        if group.len() > 1 && !is_overload_group(model, group) {
            return Err(Diagnostic::at(
                CompileError::DuplicateMemberName {
                    type_name: model.full_name(owner),
                    member: name,
                },
                model.symbol(member).span,
            ));
        }
        Ok(Some(name))
    }

    fn transform_parameter(&mut self, model: &ScriptModel, parameter: SymbolId) -> Option<String> {
        Some(model.script_name(parameter).to_string())
    }

    fn transform_local(&mut self, _position: usize) -> Option<String> {
        None
    }
}

/// Same-kind callables with at most one implementation
fn is_overload_group(model: &ScriptModel, group: &[SymbolId]) -> bool {
    let kinds: Vec<Option<MemberKind>> = group
        .iter()
        .map(|member| model.member_data(*member).map(|data| data.kind))
        .collect();
    let callable = matches!(
        kinds[0],
        Some(MemberKind::Method | MemberKind::Constructor)
    );
    if !callable || kinds.iter().any(|kind| *kind != kinds[0]) {
        return false;
    }
    group.iter().filter(|member| has_body(model, **member)).count() <= 1
}

fn has_body(model: &ScriptModel, member: SymbolId) -> bool {
    let Some(decl) = model.member_data(member).and_then(|data| data.parse_context.as_deref()) else {
        return false;
    };
    match decl {
        MemberDecl::Method(method) => method.body.is_some(),
        MemberDecl::Constructor(constructor) => constructor.body.is_some(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{build, find_member};
    use crate::{SymbolInternalizer, SymbolSetTransformer};
    use sb_diagnostics::{CompileError, DiagnosticBag, ErrorReporter};
    use sb_syntax::{FieldDecl, Hints, MethodDecl, PropertyDecl, TypeDecl};

    #[test]
    fn test_names_follow_hints_or_source() {
        let (mut model, types) = build(vec![
            TypeDecl::class("Widget")
                .with_member(FieldDecl::new("count", "int"))
                .with_member(MethodDecl::new("Render", "void").with_hints(Hints {
                    script_name: Some("render".to_string()),
                    ..Hints::default()
                })),
        ]);
        let mut bag = DiagnosticBag::new();
        let mut internalizer = SymbolInternalizer::new();
        SymbolSetTransformer::new(&mut internalizer).transform_symbol_set(&mut model, &mut bag, true);
        assert!(!bag.has_errors(), "{:?}", bag.diagnostics());

        let widget = types[0];
        assert_eq!(model.output_name(widget), "Widget");
        assert_eq!(model.output_name(find_member(&model, widget, "count")), "count");
        assert_eq!(model.output_name(find_member(&model, widget, "Render")), "render");
    }

    #[test]
    fn test_field_and_method_with_same_name_collide() {
        let (mut model, _) = build(vec![
            TypeDecl::class("Widget")
                .with_member(FieldDecl::new("size", "int"))
                .with_member(PropertyDecl::new("Size", "int").with_getter(Vec::new()))
                .with_member(MethodDecl::new("Grow", "void").with_hints(Hints {
                    script_name: Some("size".to_string()),
                    ..Hints::default()
                })),
        ]);
        let mut bag = DiagnosticBag::new();
        let mut internalizer = SymbolInternalizer::new();
        SymbolSetTransformer::new(&mut internalizer).transform_symbol_set(&mut model, &mut bag, true);

        assert_eq!(bag.len(), 1);
        assert_eq!(
            bag.diagnostics()[0].error,
            CompileError::DuplicateMemberName {
                type_name: "App.Widget".to_string(),
                member: "size".to_string(),
            }
        );
    }

    #[test]
    fn test_overloads_with_one_body_are_allowed() {
        let (mut model, _) = build(vec![
            TypeDecl::class("Logger")
                .with_member(MethodDecl::new("Log", "void").with_parameter("message", "string"))
                .with_member(
                    MethodDecl::new("Log", "void")
                        .with_parameter("message", "string")
                        .with_parameter("level", "int")
                        .without_body(),
                ),
        ]);
        let mut bag = DiagnosticBag::new();
        let mut internalizer = SymbolInternalizer::new();
        SymbolSetTransformer::new(&mut internalizer).transform_symbol_set(&mut model, &mut bag, true);
        assert!(!bag.has_errors(), "{:?}", bag.diagnostics());
    }

    #[test]
    fn test_overloads_with_two_bodies_collide() {
        let (mut model, _) = build(vec![
            TypeDecl::class("Logger")
                .with_member(MethodDecl::new("Log", "void").with_parameter("message", "string"))
                .with_member(MethodDecl::new("Log", "void").with_parameter("code", "int")),
        ]);
        let mut bag = DiagnosticBag::new();
        let mut internalizer = SymbolInternalizer::new();
        SymbolSetTransformer::new(&mut internalizer).transform_symbol_set(&mut model, &mut bag, true);
        assert!(matches!(
            bag.diagnostics()[0].error,
            CompileError::DuplicateMemberName { .. }
        ));
    }
}

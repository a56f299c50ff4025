//! Renaming of body-local identifiers

use crate::transformer::SymbolTransformer;
use sb_model::{ScopeEntry, ScopeId, ScopeTree, ScriptModel};

/// Renames the locals of every lowered body
///
/// Must be given the same transformer that named the symbol set, so that
/// positional local names line up with the already assigned parameter
/// names. Bodies without a scope tree (plain field initializers and
/// anonymous methods, whose locals live in the enclosing body) are skipped.
pub struct ImplementationTransformer<'t, T: SymbolTransformer> {
    transformer: &'t mut T,
}

impl<'t, T: SymbolTransformer> ImplementationTransformer<'t, T> {
    /// Rename through `transformer`
    pub fn new(transformer: &'t mut T) -> Self {
        Self { transformer }
    }

    /// Rename the locals of every body; returns how many bodies were visited
    pub fn transform_implementations(&mut self, model: &mut ScriptModel) -> usize {
        let _span = tracing::info_span!("transform_implementations").entered();
        let mut visited = 0;
        for key in model.implementation_keys() {
            let Some(mut implementation) = model.take_implementation(key) else {
                continue;
            };
            if let Some(tree) = implementation.scope.as_mut() {
                let root = tree.root();
                let mut visible = Vec::new();
                self.transform_scope(model, tree, root, 0, &mut visible);
                visited += 1;
                tracing::debug!(member = %model.full_name(key.member), part = ?key.part, "locals renamed");
            }
            model.restore_implementation(key, implementation);
        }
        visited
    }

    /// Name the entries of `scope` from `position` on, then its children
    fn transform_scope(
        &mut self,
        model: &mut ScriptModel,
        tree: &mut ScopeTree,
        scope: ScopeId,
        mut position: usize,
        visible: &mut Vec<String>,
    ) {
        let mark = visible.len();
        for entry in tree.scope(scope).entries.clone() {
            match entry {
                ScopeEntry::Parameter(parameter) => {
                    if model.symbol(parameter).generated_name.is_some() {
                        position += 1;
                    } else if let Some(name) = self.next_name(&mut position, visible) {
                        model.set_generated_name(parameter, name);
                    }
                    visible.push(model.output_name(parameter).to_string());
                }
                ScopeEntry::Local(local) => {
                    if tree.local(local).generated_name.is_some() {
                        position += 1;
                    } else if let Some(name) = self.next_name(&mut position, visible) {
                        tree.local_mut(local).generated_name = Some(name);
                    }
                    let symbol = tree.local(local);
                    let name = match &symbol.generated_name {
                        Some(name) => name.clone(),
                        None => model.text(symbol.name).to_string(),
                    };
                    visible.push(name);
                }
            }
        }

        for child in tree.scope(scope).children.clone() {
            self.transform_scope(model, tree, child, position, visible);
        }
        visible.truncate(mark);
    }

    /// Next positional name not shadowing a visible one
    fn next_name(&mut self, position: &mut usize, visible: &[String]) -> Option<String> {
        loop {
            let name = self.transformer.transform_local(*position)?;
            *position += 1;
            if !visible.contains(&name) {
                return Some(name);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{build, find_member};
    use crate::{SymbolInternalizer, SymbolObfuscator, SymbolSetTransformer};
    use expect_test::expect;
    use sb_diagnostics::{DiagnosticBag, ErrorReporter};
    use sb_model::{ImplementationKey, dump_implementation};
    use sb_syntax::{BinaryOp, Expr, FieldDecl, MethodDecl, ParameterDecl, Stmt, TypeDecl};

    fn sum_method() -> TypeDecl {
        TypeDecl::class("Totals").with_member(
            MethodDecl::new("Sum", "int")
                .with_parameter("limit", "int")
                .with_body(vec![
                    Stmt::local("int", "total", Some(Expr::int(0))),
                    Stmt::block(vec![
                        Stmt::local("int", "doubled", Some(Expr::binary(
                            BinaryOp::Mul,
                            Expr::name("limit"),
                            Expr::int(2),
                        ))),
                        Stmt::expr(Expr::compound_assign(
                            BinaryOp::Add,
                            Expr::name("total"),
                            Expr::name("doubled"),
                        )),
                    ]),
                    Stmt::local("int", "last", Some(Expr::name("total"))),
                    Stmt::ret(Some(Expr::name("last"))),
                ]),
        )
    }

    #[test]
    fn test_locals_follow_parameters_and_outer_scopes() {
        let (mut model, types) = build(vec![sum_method()]);
        let mut bag = DiagnosticBag::new();
        let mut obfuscator = SymbolObfuscator::new();
        SymbolSetTransformer::new(&mut obfuscator).transform_symbol_set(&mut model, &mut bag, true);
        let visited = ImplementationTransformer::new(&mut obfuscator).transform_implementations(&mut model);
        assert!(!bag.has_errors(), "{:?}", bag.diagnostics());
        assert_eq!(visited, 1);

        let sum = find_member(&model, types[0], "Sum");
        let implementation = model.implementation(ImplementationKey::body(sum)).unwrap();
        expect![[r#"
            var b = 0;
            {
                var d = a * 2;
                b += d;
            }
            var c = b;
            return c;
        "#]]
        .assert_eq(&dump_implementation(&model, implementation));
    }

    #[test]
    fn test_anonymous_method_parameters_do_not_shadow_captures() {
        let (mut model, types) = build(vec![
            TypeDecl::class("Timer")
                .with_member(FieldDecl::new("ticks", "int"))
                .with_member(MethodDecl::new("Start", "void").with_parameter("step", "int").with_body(vec![
                    Stmt::expr(Expr::call(
                        Expr::member(Expr::name("Script"), "SetTimeout"),
                        vec![
                            Expr::anonymous_method(
                                vec![ParameterDecl::new("elapsed", "int")],
                                vec![Stmt::expr(Expr::compound_assign(
                                    BinaryOp::Add,
                                    Expr::name("elapsed"),
                                    Expr::name("step"),
                                ))],
                            ),
                            Expr::int(100),
                        ],
                    )),
                ])),
        ]);
        let mut bag = DiagnosticBag::new();
        let mut obfuscator = SymbolObfuscator::new();
        SymbolSetTransformer::new(&mut obfuscator).transform_symbol_set(&mut model, &mut bag, true);
        ImplementationTransformer::new(&mut obfuscator).transform_implementations(&mut model);

        let start = find_member(&model, types[0], "Start");
        let implementation = model.implementation(ImplementationKey::body(start)).unwrap();
        expect![[r#"
            Script.SetTimeout(function(b) {
                b += a;
            }, 100);
        "#]]
        .assert_eq(&dump_implementation(&model, implementation));
    }

    #[test]
    fn test_internalizer_leaves_locals_alone() {
        let (mut model, types) = build(vec![sum_method()]);
        let mut bag = DiagnosticBag::new();
        let mut internalizer = SymbolInternalizer::new();
        SymbolSetTransformer::new(&mut internalizer).transform_symbol_set(&mut model, &mut bag, true);
        ImplementationTransformer::new(&mut internalizer).transform_implementations(&mut model);

        let sum = find_member(&model, types[0], "Sum");
        let implementation = model.implementation(ImplementationKey::body(sum)).unwrap();
        expect![[r#"
            var total = 0;
            {
                var doubled = limit * 2;
                total += doubled;
            }
            var last = total;
            return last;
        "#]]
        .assert_eq(&dump_implementation(&model, implementation));
    }
}

//! The compilation pipeline

use crate::conflicts::check_type_names;
use crate::error::DriverError;
use crate::generator::ScriptGenerator;
use crate::options::CompilerOptions;
use sb_body_lower::CodeBuilder;
use sb_diagnostics::ErrorReporter;
use sb_metadata::{CoreLibrary, MetadataBuilder, MetadataImporter};
use sb_model::{ScriptModel, SymbolId};
use sb_rename::{
    ImplementationTransformer, SymbolInternalizer, SymbolObfuscator, SymbolSetTransformer,
};
use sb_syntax::CompilationUnit;

/// Result of a successful compilation
#[derive(Debug)]
pub struct Compilation {
    /// The named and lowered program
    pub model: ScriptModel,
    /// Primary application types in declaration order
    pub types: Vec<SymbolId>,
}

/// Runs every stage over one program
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    options: CompilerOptions,
}

impl Compiler {
    /// Compiler configured by `options`
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Options in effect
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compile `units` without generating a script
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Aborted`] naming the first stage that
    /// reported a diagnostic; the diagnostics themselves are in `reporter`.
    pub fn compile<R: ErrorReporter>(
        &self,
        units: &[CompilationUnit],
        reporter: &mut R,
    ) -> Result<Compilation, DriverError> {
        self.run(units, reporter, None)
    }

    /// Compile `units` and hand the result to `generator`
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Aborted`] naming the first stage that
    /// reported a diagnostic, generation included.
    pub fn compile_with<R: ErrorReporter>(
        &self,
        units: &[CompilationUnit],
        reporter: &mut R,
        generator: &mut dyn ScriptGenerator,
    ) -> Result<Compilation, DriverError> {
        self.run(units, reporter, Some(generator))
    }

    fn run<R: ErrorReporter>(
        &self,
        units: &[CompilationUnit],
        reporter: &mut R,
        generator: Option<&mut dyn ScriptGenerator>,
    ) -> Result<Compilation, DriverError> {
        let _span = tracing::info_span!(
            "compile",
            script = %self.options.script_name,
            minimize = self.options.minimize
        )
        .entered();
        tracing::debug!(defines = ?self.options.defines, units = units.len(), "compiling");

        let mut model = ScriptModel::default();
        CoreLibrary.import(&mut model);

        let types = MetadataBuilder::new(&mut model, reporter).build(units);
        model.metadata = self.options.metadata();
        model.dependencies = self.options.dependencies.clone();
        model.resources = self.options.resource_table();
        ensure_clean(reporter, "metadata")?;

        {
            let _stage = tracing::info_span!("check_types").entered();
            check_type_names(&model, &types, self.options.minimize, reporter);
        }
        ensure_clean(reporter, "type check")?;

        CodeBuilder::new(&mut model, reporter).build(&types);
        ensure_clean(reporter, "lowering")?;

        if self.options.minimize {
            let mut obfuscator = SymbolObfuscator::new();
            SymbolSetTransformer::new(&mut obfuscator).transform_symbol_set(&mut model, reporter, true);
            ensure_clean(reporter, "naming")?;
            ImplementationTransformer::new(&mut obfuscator).transform_implementations(&mut model);
        } else {
            let mut internalizer = SymbolInternalizer::new();
            SymbolSetTransformer::new(&mut internalizer).transform_symbol_set(&mut model, reporter, true);
            ensure_clean(reporter, "naming")?;
        }

        if let Some(generator) = generator {
            let _stage = tracing::info_span!("generate").entered();
            if let Err(diagnostics) = generator.generate(&model) {
                for diagnostic in diagnostics {
                    reporter.report(diagnostic);
                }
            }
            ensure_clean(reporter, "generation")?;
        }

        tracing::info!(types = types.len(), "compilation finished");
        Ok(Compilation { model, types })
    }
}

/// Stop the pipeline once anything was reported
fn ensure_clean<R: ErrorReporter>(reporter: &R, stage: &'static str) -> Result<(), DriverError> {
    if reporter.has_errors() {
        tracing::warn!(stage, "stopping after errors");
        return Err(DriverError::Aborted { stage });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_diagnostics::{CompileError, Diagnostic, DiagnosticBag};
    use sb_model::ImplementationKey;
    use sb_syntax::{Expr, FieldDecl, MethodDecl, Modifiers, NamespaceDecl, Stmt, TypeDecl};

    fn unit(types: Vec<TypeDecl>) -> CompilationUnit {
        CompilationUnit::with_namespace(NamespaceDecl::new("App", types))
    }

    fn counter() -> TypeDecl {
        TypeDecl::class("Counter")
            .with_member(FieldDecl::new("count", "int"))
            .with_member(
                MethodDecl::new("Increment", "void")
                    .with_modifiers(Modifiers::default().public())
                    .with_body(vec![Stmt::expr(Expr::compound_assign(
                        sb_syntax::BinaryOp::Add,
                        Expr::member(Expr::this(), "count"),
                        Expr::int(1),
                    ))]),
            )
    }

    #[derive(Default)]
    struct Recorder {
        names: Vec<String>,
        fail: bool,
    }

    impl ScriptGenerator for Recorder {
        fn generate(&mut self, model: &ScriptModel) -> Result<(), Vec<Diagnostic>> {
            if self.fail {
                return Err(vec![Diagnostic::general(CompileError::General {
                    message: "output directory is read-only".to_string(),
                })]);
            }
            for ty in model.types() {
                if model.type_data(ty).is_some_and(|data| data.is_application) {
                    self.names.push(model.output_name(ty).to_string());
                }
            }
            Ok(())
        }
    }

    #[test]
    fn test_default_pipeline_keeps_names_and_lowers_bodies() {
        let mut bag = DiagnosticBag::new();
        let compilation = Compiler::default().compile(&[unit(vec![counter()])], &mut bag).unwrap();
        let model = &compilation.model;

        let counter = compilation.types[0];
        assert_eq!(model.symbol(counter).generated_name.as_deref(), Some("Counter"));
        let increment = model.members(counter)[1];
        assert!(model.implementation(ImplementationKey::body(increment)).is_some());
        assert_eq!(model.metadata.script_name, "script");
    }

    #[test]
    fn test_minimized_pipeline_renames_private_symbols() {
        let options = CompilerOptions {
            minimize: true,
            ..CompilerOptions::default()
        };
        let mut bag = DiagnosticBag::new();
        let compilation = Compiler::new(options).compile(&[unit(vec![counter()])], &mut bag).unwrap();
        let model = &compilation.model;

        let counter = compilation.types[0];
        assert_eq!(model.output_name(counter), "$a");
        assert_eq!(model.output_name(model.members(counter)[0]), "a");
        assert_eq!(model.output_name(model.members(counter)[1]), "b");
    }

    #[test]
    fn test_options_are_copied_into_the_model() {
        let options = CompilerOptions::from_toml_str(
            r#"
            script_name = "counter"
            copyright = "(c) Sable"

            [[dependencies]]
            name = "ss"
            "#,
        )
        .unwrap();
        let mut bag = DiagnosticBag::new();
        let compilation = Compiler::new(options).compile(&[unit(vec![counter()])], &mut bag).unwrap();

        assert_eq!(compilation.model.metadata.script_name, "counter");
        assert_eq!(compilation.model.metadata.copyright.as_deref(), Some("(c) Sable"));
        assert_eq!(compilation.model.dependencies[0].module_name(), "ss");
    }

    #[test]
    fn test_metadata_errors_stop_before_lowering() {
        let mut bag = DiagnosticBag::new();
        let broken = TypeDecl::class("Broken")
            .extends("Missing")
            .with_member(MethodDecl::new("Run", "void"));
        let error = Compiler::default().compile(&[unit(vec![broken])], &mut bag).unwrap_err();

        assert!(matches!(error, DriverError::Aborted { stage: "metadata" }));
        assert!(matches!(
            bag.diagnostics()[0].error,
            CompileError::UnresolvedType { .. }
        ));
    }

    #[test]
    fn test_lowering_errors_stop_before_naming() {
        let mut bag = DiagnosticBag::new();
        let broken = TypeDecl::class("Broken").with_member(
            MethodDecl::new("Run", "void").with_body(vec![Stmt::expr(Expr::name("missing"))]),
        );
        let error = Compiler::default().compile(&[unit(vec![broken])], &mut bag).unwrap_err();
        assert!(matches!(error, DriverError::Aborted { stage: "lowering" }));
    }

    #[test]
    fn test_generator_sees_final_names() {
        let mut bag = DiagnosticBag::new();
        let mut recorder = Recorder::default();
        Compiler::default()
            .compile_with(&[unit(vec![counter()])], &mut bag, &mut recorder)
            .unwrap();
        assert_eq!(recorder.names, vec!["Counter".to_string()]);
    }

    #[test]
    fn test_generator_failures_are_reported() {
        let mut bag = DiagnosticBag::new();
        let mut recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let error = Compiler::default()
            .compile_with(&[unit(vec![counter()])], &mut bag, &mut recorder)
            .unwrap_err();
        assert!(matches!(error, DriverError::Aborted { stage: "generation" }));
        assert_eq!(bag.len(), 1);
    }
}

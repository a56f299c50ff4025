//! Integration test utilities for the Sable compiler

use anyhow::{Context, Result};
use sb_diagnostics::DiagnosticBag;
use sb_driver::{Compilation, Compiler, CompilerOptions, DriverError};
use sb_model::{ImplementationKey, ScriptModel, SymbolId, dump_implementation};
use sb_syntax::{CompilationUnit, NamespaceDecl, TypeDecl};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Outcome of compiling a fixture: the result and everything reported
pub struct Outcome {
    /// Pipeline result
    pub result: Result<Compilation, DriverError>,
    /// Diagnostics reported by any stage
    pub diagnostics: DiagnosticBag,
}

impl Outcome {
    /// The compilation, panicking with the diagnostics when it failed
    ///
    /// # Panics
    ///
    /// Panics if the pipeline stopped.
    #[must_use]
    pub fn expect_success(self) -> Compilation {
        match self.result {
            Ok(compilation) => compilation,
            Err(error) => panic!("{error}: {:?}", self.diagnostics.diagnostics()),
        }
    }
}

/// A program under test
#[derive(Debug, Default, Deserialize)]
pub struct Fixture {
    /// Compilation units
    pub units: Vec<CompilationUnit>,
}

impl Fixture {
    /// Creates an empty fixture
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a unit declaring `types` in `namespace`
    #[must_use]
    pub fn namespace(mut self, namespace: &str, types: Vec<TypeDecl>) -> Self {
        self.units
            .push(CompilationUnit::with_namespace(NamespaceDecl::new(namespace, types)));
        self
    }

    /// Loads `test-projects/<name>/tree.json`
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not a parse tree
    pub fn load(name: &str) -> Result<Self> {
        let path = project_dir().join(name).join("tree.json");
        Self::from_file(&path)
    }

    /// Loads a parse tree from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing or is not a parse tree
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse fixture: {}", path.display()))
    }

    /// Runs the pipeline with `options`
    #[must_use]
    pub fn compile_with(&self, options: CompilerOptions) -> Outcome {
        let mut diagnostics = DiagnosticBag::new();
        let result = Compiler::new(options).compile(&self.units, &mut diagnostics);
        Outcome { result, diagnostics }
    }

    /// Runs the pipeline with default options
    #[must_use]
    pub fn compile(&self) -> Outcome {
        self.compile_with(CompilerOptions::default())
    }

    /// Runs the pipeline with minimized naming
    #[must_use]
    pub fn compile_minimized(&self) -> Outcome {
        self.compile_with(CompilerOptions {
            minimize: true,
            ..CompilerOptions::default()
        })
    }
}

/// Directory holding the JSON test projects
#[must_use]
pub fn project_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("test-projects")
}

/// Primary type whose full name is `full_name`
///
/// # Panics
///
/// Panics if no such type was declared.
#[must_use]
pub fn find_type(compilation: &Compilation, full_name: &str) -> SymbolId {
    let model = &compilation.model;
    compilation
        .types
        .iter()
        .copied()
        .find(|ty| model.full_name(*ty) == full_name)
        .unwrap_or_else(|| panic!("type {full_name} not declared"))
}

/// Every member of `ty` whose source name is `name`
#[must_use]
pub fn members_named(model: &ScriptModel, ty: SymbolId, name: &str) -> Vec<SymbolId> {
    model
        .members(ty)
        .iter()
        .copied()
        .filter(|member| model.name(*member) == name)
        .collect()
}

/// The single member of `ty` named `name`
///
/// # Panics
///
/// Panics unless exactly one member has that name.
#[must_use]
pub fn find_member(model: &ScriptModel, ty: SymbolId, name: &str) -> SymbolId {
    match members_named(model, ty, name).as_slice() {
        [member] => *member,
        found => panic!("expected one member '{name}', found {}", found.len()),
    }
}

/// IR dump of a lowered body, if there is one
#[must_use]
pub fn dump(model: &ScriptModel, key: ImplementationKey) -> Option<String> {
    model
        .implementation(key)
        .map(|implementation| dump_implementation(model, implementation))
}

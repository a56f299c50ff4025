//! Small programs for the renaming tests

use sb_body_lower::CodeBuilder;
use sb_diagnostics::{DiagnosticBag, ErrorReporter};
use sb_metadata::{CoreLibrary, MetadataBuilder, MetadataImporter};
use sb_model::{ScriptModel, SymbolId};
use sb_syntax::{CompilationUnit, NamespaceDecl, TypeDecl};

/// Build and lower `types` in namespace `App`
pub fn build(types: Vec<TypeDecl>) -> (ScriptModel, Vec<SymbolId>) {
    let mut model = ScriptModel::default();
    let mut bag = DiagnosticBag::new();
    CoreLibrary.import(&mut model);
    let unit = CompilationUnit::with_namespace(NamespaceDecl::new("App", types));
    let declared = MetadataBuilder::new(&mut model, &mut bag).build(&[unit]);
    CodeBuilder::new(&mut model, &mut bag).build(&declared);
    assert!(!bag.has_errors(), "{:?}", bag.diagnostics());
    (model, declared)
}

/// First member of `ty` with source name `name`
pub fn find_member(model: &ScriptModel, ty: SymbolId, name: &str) -> SymbolId {
    let name = model.intern(name);
    model
        .members(ty)
        .iter()
        .copied()
        .find(|member| model.symbol(*member).name == name)
        .unwrap()
}

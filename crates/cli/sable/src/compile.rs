//! `sable compile`

use crate::report::Report;
use anyhow::{Context, Result};
use sb_diagnostics::DiagnosticBag;
use sb_driver::{Compiler, CompilerOptions};
use sb_span::SourceMap;
use sb_syntax::CompilationUnit;
use serde::Deserialize;
use std::path::Path;

/// Parser output: the compilation units and the files they came from
///
/// `files[i]` is the path of the unit whose file id is `i`.
#[derive(Debug, Deserialize)]
pub struct ParseTree {
    #[serde(default)]
    pub files: Vec<String>,
    pub units: Vec<CompilationUnit>,
}

impl ParseTree {
    /// Source map naming every listed file
    pub fn source_map(&self) -> SourceMap {
        let mut map = SourceMap::new();
        for file in &self.files {
            map.register(file.as_str());
        }
        map
    }
}

pub fn compile(
    input: &Path,
    config: Option<&Path>,
    minimize: bool,
    out: Option<&Path>,
) -> Result<()> {
    let mut options = match config {
        Some(path) => CompilerOptions::load(path)
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => CompilerOptions::default(),
    };
    options.minimize |= minimize;
    let minimized = options.minimize;

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read parse tree: {}", input.display()))?;
    let tree: ParseTree = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse parse tree: {}", input.display()))?;

    let mut bag = DiagnosticBag::new();
    let compilation = match Compiler::new(options).compile(&tree.units, &mut bag) {
        Ok(compilation) => compilation,
        Err(error) => {
            let sources = tree.source_map();
            for diagnostic in bag.diagnostics() {
                let report = miette::Report::new(diagnostic.error.clone());
                match diagnostic.location {
                    Some(location) => eprintln!("{}: {report:?}", sources.describe(location)),
                    None => eprintln!("{report:?}"),
                }
            }
            return Err(error).with_context(|| format!("{} error(s) in {}", bag.len(), input.display()));
        }
    };

    let report = Report::build(&compilation, minimized);
    let json = serde_json::to_string_pretty(&report)?;
    match out {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Failed to write report: {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNTER: &str = r#"{
        "files": ["counter.cs"],
        "units": [{
            "namespaces": [{
                "name": "App",
                "types": [{
                    "name": "Counter",
                    "kind": "class",
                    "members": []
                }]
            }]
        }]
    }"#;

    #[test]
    fn test_parse_tree_registers_files_in_order() {
        let tree: ParseTree = serde_json::from_str(COUNTER).unwrap();
        let map = tree.source_map();
        assert_eq!(map.path(sb_span::FileId(0)), Some("counter.cs"));
        assert_eq!(tree.units.len(), 1);
    }

    #[test]
    fn test_compile_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tree.json");
        let out = dir.path().join("report.json");
        std::fs::write(&input, COUNTER).unwrap();

        compile(&input, None, true, Some(&out)).unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(report["minimized"], true);
        assert_eq!(report["types"][0]["name"], "App.Counter");
        assert_eq!(report["types"][0]["output_name"], "$a");
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let error = compile(&dir.path().join("missing.json"), None, false, None).unwrap_err();
        assert!(error.to_string().contains("Failed to read parse tree"));
    }
}

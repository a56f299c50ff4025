//! Compiler configuration

use crate::error::DriverError;
use indexmap::IndexMap;
use sb_model::{ResourceTable, ScriptDependency, ScriptMetadata};
use serde::Deserialize;
use std::path::Path;

/// Options of one compilation, usually loaded from `sable.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompilerOptions {
    /// Emit short synthetic names instead of source names
    pub minimize: bool,

    /// Name of the generated script
    pub script_name: String,

    /// Version string
    pub version: Option<String>,

    /// Description
    pub description: Option<String>,

    /// Copyright notice
    pub copyright: Option<String>,

    /// Output template, passed through to the generator
    pub template: Option<String>,

    /// Scripts the output depends on
    pub dependencies: Vec<ScriptDependency>,

    /// Named string tables
    pub resources: IndexMap<String, IndexMap<String, String>>,

    /// Conditional compilation symbols the sources were parsed with
    pub defines: Vec<String>,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            minimize: false,
            script_name: ScriptMetadata::default().script_name,
            version: None,
            description: None,
            copyright: None,
            template: None,
            dependencies: Vec::new(),
            resources: IndexMap::new(),
            defines: Vec::new(),
        }
    }
}

impl CompilerOptions {
    /// Parse options from TOML text
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Config`] when the text is not valid TOML or
    /// does not match the option schema.
    pub fn from_toml_str(text: &str) -> Result<Self, DriverError> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file
    ///
    /// # Errors
    ///
    /// Returns [`DriverError::Io`] when the file cannot be read and
    /// [`DriverError::Config`] when its contents are invalid.
    pub fn load(path: &Path) -> Result<Self, DriverError> {
        let text = std::fs::read_to_string(path).map_err(|source| DriverError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let options = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), minimize = options.minimize, "options loaded");
        Ok(options)
    }

    /// Script-level metadata described by these options
    pub fn metadata(&self) -> ScriptMetadata {
        ScriptMetadata {
            script_name: self.script_name.clone(),
            version: self.version.clone(),
            description: self.description.clone(),
            copyright: self.copyright.clone(),
            template: self.template.clone(),
        }
    }

    /// Resource tables in model form
    pub fn resource_table(&self) -> ResourceTable {
        self.resources.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_keys_take_defaults() {
        let options = CompilerOptions::from_toml_str("").unwrap();
        assert_eq!(options, CompilerOptions::default());
        assert!(!options.minimize);
        assert_eq!(options.script_name, "script");
    }

    #[test]
    fn test_full_configuration() {
        let options = CompilerOptions::from_toml_str(
            r#"
            minimize = true
            script_name = "widgets"
            version = "1.2.0"
            defines = ["DEBUG"]

            [[dependencies]]
            name = "jquery"
            identifier = "$"

            [[dependencies]]
            name = "charts"
            delay_loaded = true

            [resources.Strings]
            greeting = "Hello"
            "#,
        )
        .unwrap();

        assert!(options.minimize);
        assert_eq!(options.metadata().script_name, "widgets");
        assert_eq!(options.metadata().version.as_deref(), Some("1.2.0"));
        assert_eq!(options.dependencies.len(), 2);
        assert_eq!(options.dependencies[0].binding(), "$");
        assert!(options.dependencies[1].delay_loaded);
        assert_eq!(options.resources["Strings"]["greeting"], "Hello");
        assert_eq!(options.defines, vec!["DEBUG".to_string()]);
    }

    #[test]
    fn test_invalid_configuration_is_rejected() {
        let error = CompilerOptions::from_toml_str("minimize = \"often\"").unwrap_err();
        assert!(matches!(error, DriverError::Config(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "script_name = \"app\"").unwrap();
        writeln!(file, "minimize = true").unwrap();

        let options = CompilerOptions::load(file.path()).unwrap();
        assert_eq!(options.script_name, "app");
        assert!(options.minimize);
    }

    #[test]
    fn test_load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let error = CompilerOptions::load(&dir.path().join("missing.toml")).unwrap_err();
        assert!(matches!(error, DriverError::Io { .. }));
    }
}

//! Program-wide script metadata

use serde::{Deserialize, Serialize};

/// Module identifier of the script runtime
pub const RUNTIME_MODULE_NAME: &str = "ss";

/// Descriptive metadata of the generated script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptMetadata {
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
}

impl Default for ScriptMetadata {
    fn default() -> Self {
        Self {
            script_name: "script".to_string(),
            version: None,
            description: None,
            copyright: None,
            template: None,
        }
    }
}

/// A script the generated script depends on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDependency {
    /// Script name
    pub name: String,
    /// Identifier the dependency is bound to in generated code
    #[serde(default)]
    pub identifier: Option<String>,
    /// Load path
    #[serde(default)]
    pub path: Option<String>,
    /// Loaded on first use rather than at startup
    #[serde(default)]
    pub delay_loaded: bool,
}

impl ScriptDependency {
    /// Dependency with only a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            identifier: None,
            path: None,
            delay_loaded: false,
        }
    }

    /// Module name the dependency is required under
    ///
    /// The runtime module keeps its canonical name regardless of how the
    /// dependency was declared.
    pub fn module_name(&self) -> &str {
        if self.name == RUNTIME_MODULE_NAME {
            RUNTIME_MODULE_NAME
        } else {
            &self.name
        }
    }

    /// Identifier used in generated code, defaulting to the name
    pub fn binding(&self) -> &str {
        self.identifier.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dependency_binding_defaults_to_name() {
        let mut dependency = ScriptDependency::named("jquery");
        assert_eq!(dependency.binding(), "jquery");
        dependency.identifier = Some("$".to_string());
        assert_eq!(dependency.binding(), "$");
        assert_eq!(dependency.module_name(), "jquery");
    }

    #[test]
    fn test_runtime_module_keeps_its_name() {
        let dependency = ScriptDependency::named(RUNTIME_MODULE_NAME);
        assert_eq!(dependency.module_name(), "ss");
    }
}

//! Schema model: the parsed YAML template describing what to generate.
//!
//! One `Template` per generation run. The external parser contract is small:
//! unknown fields are ignored, missing optional fields take documented
//! defaults, and validation fails fast before any output is produced.

use std::collections::BTreeSet;
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GenError;

// ------------------------------ Defaults ---------------------------------- //

/// Package name used when the template leaves `packageName` empty.
pub const DEFAULT_PACKAGE_NAME: &str = "appconfig";
/// Config name used when the template leaves `configName` empty.
pub const DEFAULT_CONFIG_NAME: &str = "AppConfig";

/// `<base name>.<file type>`: exactly one dot, both parts non-empty.
static ENV_FILE_SHAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^.]+\.[^.]+$").unwrap());

// ------------------------------- Types ------------------------------------ //

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Template {
    #[serde(rename = "envFile")]
    pub env_file: String,
    #[serde(rename = "packageName")]
    pub package_name: String,
    #[serde(rename = "configName")]
    pub config_name: String,
    pub imports: Vec<Import>,
    pub variables: Vec<Variable>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Import {
    pub path: String,
    /// Local binding name; empty renders as a bare quoted path.
    pub alias: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Variable {
    pub name: String,
    /// Pre-normalization copy of `name`; the runtime lookup key. Populated by
    /// the normalizer, never read from the template itself.
    #[serde(rename = "rawName", skip_deserializing)]
    pub raw_name: String,
    #[serde(rename = "type")]
    pub ty: String,
    /// Literal default value, passed through as opaque text.
    pub default: String,
}

// ---------------------------- Implementation ------------------------------ //

impl Template {
    /// Load a template from disk: read, parse with YAML-path context, apply
    /// defaults, validate.
    pub fn load(path: &Path) -> Result<Self, GenError> {
        let source = std::fs::read_to_string(path).map_err(|source| GenError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;
        let mut template =
            from_yaml_with_path::<Self>(&source).map_err(|message| GenError::SchemaParse {
                path: path.to_path_buf(),
                message,
            })?;
        template.apply_defaults();
        template.validate()?;
        Ok(template)
    }

    /// Parse only; defaults and validation are separate steps.
    pub fn from_yaml(source: &str) -> Result<Self, String> {
        from_yaml_with_path(source)
    }

    /// Fill `packageName`/`configName` when the template leaves them empty.
    pub fn apply_defaults(&mut self) {
        if self.package_name.is_empty() {
            self.package_name = DEFAULT_PACKAGE_NAME.to_string();
        }
        if self.config_name.is_empty() {
            self.config_name = DEFAULT_CONFIG_NAME.to_string();
        }
    }

    /// Fail fast on schemas that would emit broken Go.
    pub fn validate(&self) -> Result<(), GenError> {
        if !ENV_FILE_SHAPE.is_match(&self.env_file) {
            return Err(GenError::EnvFileShape(self.env_file.clone()));
        }
        for import in &self.imports {
            if import.path.is_empty() {
                return Err(GenError::EmptyImportPath);
            }
        }
        let mut seen = BTreeSet::new();
        for variable in &self.variables {
            if !seen.insert(variable.name.as_str()) {
                return Err(GenError::DuplicateVariable(variable.name.clone()));
            }
        }
        Ok(())
    }

    /// `envFile` split at its single dot: (config base name, config type).
    pub fn env_file_parts(&self) -> (&str, &str) {
        // validate() guarantees the dot is present
        self.env_file
            .split_once('.')
            .unwrap_or((self.env_file.as_str(), ""))
    }
}

/// Deserialize with YAML-path context in error messages.
fn from_yaml_with_path<T: DeserializeOwned>(src: &str) -> Result<T, String> {
    let de = serde_yaml::Deserializer::from_str(src);
    match serde_path_to_error::deserialize::<_, T>(de) {
        Ok(v) => Ok(v),
        Err(err) => {
            let path = err.path().to_string();
            Err(format!("at {path}: {}", err.into_inner()))
        }
    }
}

// ------------------------------- Tests ------------------------------------ //

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
envFile: app.yaml
packageName: settings
configName: ServerConfig
imports:
  - path: time
    alias: time
variables:
  - name: max_retry_count
    type: int
    default: "3"
  - name: allowed_hosts
    type: string[]
    default: ""
"#;

    #[test]
    fn parses_full_template() {
        let t = Template::from_yaml(FULL).unwrap();
        assert_eq!(t.env_file, "app.yaml");
        assert_eq!(t.package_name, "settings");
        assert_eq!(t.config_name, "ServerConfig");
        assert_eq!(t.imports.len(), 1);
        assert_eq!(t.imports[0].path, "time");
        assert_eq!(t.variables.len(), 2);
        assert_eq!(t.variables[0].name, "max_retry_count");
        assert_eq!(t.variables[0].ty, "int");
        assert_eq!(t.variables[0].default, "3");
    }

    #[test]
    fn missing_names_take_documented_defaults() {
        let mut t = Template::from_yaml("envFile: config.yaml\n").unwrap();
        assert!(t.package_name.is_empty());
        assert!(t.config_name.is_empty());
        t.apply_defaults();
        assert_eq!(t.package_name, DEFAULT_PACKAGE_NAME);
        assert_eq!(t.config_name, DEFAULT_CONFIG_NAME);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let src = "envFile: config.yaml\nfuture_knob: true\n";
        let t = Template::from_yaml(src).unwrap();
        assert_eq!(t.env_file, "config.yaml");
    }

    #[test]
    fn parse_failure_names_the_offending_path() {
        let src = "envFile: config.yaml\nvariables:\n  - name: [not, a, string]\n";
        let err = Template::from_yaml(src).unwrap_err();
        assert!(err.contains("variables"), "path missing from: {err}");
    }

    #[test]
    fn env_file_requires_exactly_one_dot() {
        let mut t = Template::from_yaml("envFile: config.yaml\n").unwrap();
        t.apply_defaults();
        assert!(t.validate().is_ok());

        for bad in ["config", "config.prod.yaml", ".yaml", "config.", ""] {
            t.env_file = bad.to_string();
            assert!(
                matches!(t.validate(), Err(GenError::EnvFileShape(_))),
                "expected shape error for {bad:?}"
            );
        }
    }

    #[test]
    fn duplicate_variable_names_rejected() {
        let src = r#"
envFile: config.yaml
variables:
  - name: timeout
    type: int
  - name: timeout
    type: string
"#;
        let mut t = Template::from_yaml(src).unwrap();
        t.apply_defaults();
        let err = t.validate().unwrap_err();
        assert!(matches!(err, GenError::DuplicateVariable(name) if name == "timeout"));
    }

    #[test]
    fn empty_import_path_rejected() {
        let src = "envFile: config.yaml\nimports:\n  - alias: v\n";
        let mut t = Template::from_yaml(src).unwrap();
        t.apply_defaults();
        assert!(matches!(t.validate(), Err(GenError::EmptyImportPath)));
    }

    #[test]
    fn env_file_parts_split_on_the_dot() {
        let t = Template {
            env_file: "config.yaml".to_string(),
            ..Template::default()
        };
        assert_eq!(t.env_file_parts(), ("config", "yaml"));
    }
}

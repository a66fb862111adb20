//! Optional `ttnn.toml` project config (spec §6.1's `opts`, given defaults):
//! a plain `toml`-derived struct, same shape as any other manifest file. CLI
//! flags always override whatever this supplies.

use std::path::Path;

use serde::Deserialize;

use crate::api::ToNnOptions;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub allocate_entities: bool,
    #[serde(default)]
    pub explicit_strings: bool,
    #[serde(default)]
    pub type_annotations: bool,
    #[serde(default)]
    pub target_version: Option<String>,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Config, String> {
        let content = std::fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::from_str(&content)
    }

    pub fn from_str(content: &str) -> Result<Config, String> {
        toml::from_str(content).map_err(|e| format!("failed to parse ttnn.toml: {e}"))
    }

    pub fn to_nn_options(&self) -> ToNnOptions {
        ToNnOptions {
            allocate_entities: self.allocate_entities,
            explicit_strings: self.explicit_strings,
            type_annotations: self.type_annotations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_defaults_to_all_false() {
        let config = Config::from_str("").unwrap();
        assert!(!config.allocate_entities);
        assert!(!config.explicit_strings);
        assert!(!config.type_annotations);
        assert!(config.target_version.is_none());
    }

    #[test]
    fn parses_declared_fields() {
        let toml = r#"
allocate_entities = true
type_annotations = true
target_version = "1.9.0"
"#;
        let config = Config::from_str(toml).unwrap();
        assert!(config.allocate_entities);
        assert!(!config.explicit_strings);
        assert!(config.type_annotations);
        assert_eq!(config.target_version.as_deref(), Some("1.9.0"));
    }

    #[test]
    fn from_file_reads_and_parses_a_real_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ttnn.toml");
        std::fs::write(&path, "explicit_strings = true\n").unwrap();

        let config = Config::from_file(&path).unwrap();
        assert!(config.explicit_strings);
        assert!(!config.allocate_entities);
    }

    #[test]
    fn from_file_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::from_file(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.contains("failed to read"));
    }
}

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{MigrateError, Result};

/// Names and paths the migration works with.
///
/// Every field has a default, so a JSON file only needs the keys it
/// overrides:
///
/// ```json
/// { "helperName": "css", "composerName": "cx", "contextPath": "./theme.js" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    /// Helper call to migrate away from.
    pub helper_name: String,
    /// Module the helper and the style factory are imported from.
    pub helper_module: String,
    pub factory_object: String,
    pub factory_method: String,
    /// Class-list composer that replaces non-trivial helper calls.
    pub composer_name: String,
    pub composer_module: String,
    /// Body of the `//` comment put above calls whose class order needs review.
    pub precedence_comment: String,
    pub error_log_path: PathBuf,
    pub context_path: PathBuf,
    /// Replaces the source extension to name the sibling stylesheet.
    pub stylesheet_suffix: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            helper_name: "css".to_string(),
            helper_module: "aphrodite".to_string(),
            factory_object: "StyleSheet".to_string(),
            factory_method: "create".to_string(),
            composer_name: "classNames".to_string(),
            composer_module: "classnames".to_string(),
            precedence_comment: " TODO: check CSS precedence".to_string(),
            error_log_path: PathBuf::from("./errors.txt"),
            context_path: PathBuf::from("./context.example.js"),
            stylesheet_suffix: ".module.css".to_string(),
        }
    }
}

impl Config {
    /// Load overrides from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path).map_err(|source| MigrateError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        serde_json::from_str(&data).map_err(|e| MigrateError::Config {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restyle.json");
        fs::write(&path, r#"{ "composerName": "cx", "errorLogPath": "/tmp/errs.txt" }"#).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.composer_name, "cx");
        assert_eq!(config.error_log_path, PathBuf::from("/tmp/errs.txt"));
        assert_eq!(config.helper_name, "css");
        assert_eq!(config.stylesheet_suffix, ".module.css");
    }

    #[test]
    fn invalid_json_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restyle.json");
        fs::write(&path, "{ helperName: css }").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, MigrateError::Config { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = Config::load(Path::new("./no/such/restyle.json")).unwrap_err();
        assert!(matches!(err, MigrateError::Io { .. }));
    }
}

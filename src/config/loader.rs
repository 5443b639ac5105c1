//! Configuration and document loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ReconcilerConfig;
use crate::config::validation::{validate_config, ValidationError};
use crate::model::{DesiredConfig, LiveSnapshot};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Load and validate the reconciler configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ReconcilerConfig, ConfigError> {
    let content = read(path)?;
    let config: ReconcilerConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load a desired-configuration document. `.json` files are read as JSON,
/// everything else as TOML.
pub fn load_desired(path: &Path) -> Result<DesiredConfig, ConfigError> {
    let content = read(path)?;
    if is_json(path) {
        Ok(serde_json::from_str(&content)?)
    } else {
        Ok(toml::from_str(&content)?)
    }
}

/// Load a live snapshot captured as JSON.
pub fn load_snapshot(path: &Path) -> Result<LiveSnapshot, ConfigError> {
    let content = read(path)?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FieldValue;
    use std::io::Write;

    fn write_temp(suffix: &str, content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config_with_partial_sections() {
        let file = write_temp(
            ".toml",
            r#"
[defaults]
firmware = "efi"
"#,
        );
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.defaults.firmware, "efi");
        assert_eq!(config.defaults.guest_id, "other-64");
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_load_config_rejects_invalid_values() {
        let file = write_temp(
            ".toml",
            r#"
[observability]
log_level = "loud"
"#,
        );
        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/reconciler.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/reconciler.toml"));
    }

    #[test]
    fn test_load_desired_toml() {
        let file = write_temp(
            ".toml",
            r#"
name = "vm1"
num_cpus = 4
cpu_hot_add_enabled = true
firmware = "efi"

[extra_config]
"guestinfo.userdata" = "abc"
"#,
        );
        let desired = load_desired(file.path()).unwrap();
        assert_eq!(desired.get("name"), Some(&FieldValue::from("vm1")));
        assert_eq!(desired.get("num_cpus"), Some(&FieldValue::Int(4)));
        assert_eq!(desired.get("cpu_hot_add_enabled"), Some(&FieldValue::Bool(true)));
        assert_eq!(desired.extra_config.get("guestinfo.userdata").map(String::as_str), Some("abc"));
        assert!(desired.get("extra_config").is_none());
    }

    #[test]
    fn test_load_desired_json() {
        let file = write_temp(".json", r#"{"name": "vm2", "memory": 2048}"#);
        let desired = load_desired(file.path()).unwrap();
        assert_eq!(desired.get("memory"), Some(&FieldValue::Int(2048)));
        assert!(desired.extra_config.is_empty());
    }

    #[test]
    fn test_load_snapshot_json() {
        let file = write_temp(
            ".json",
            r#"{
                "name": "vm1",
                "hardware": {"numCpu": 2, "numCoresPerSocket": 1, "memoryMb": 1024},
                "extraConfig": [{"key": "a", "value": "1"}]
            }"#,
        );
        let snapshot = load_snapshot(file.path()).unwrap();
        assert_eq!(snapshot.name.as_deref(), Some("vm1"));
        assert_eq!(snapshot.extra_config.len(), 1);
    }
}

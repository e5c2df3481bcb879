use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::error::AppError;

pub const DEFAULT_BROWSE_ROOT: &str = "/storage/emulated/0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdbSettings {
    /// Path to the adb executable. Empty means "resolve `adb` from PATH".
    pub command_path: String,
}

impl Default for AdbSettings {
    fn default() -> Self {
        Self {
            command_path: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExplorerSettings {
    /// Directory opened when the caller supplies no path.
    pub browse_root: String,
}

impl Default for ExplorerSettings {
    fn default() -> Self {
        Self {
            browse_root: DEFAULT_BROWSE_ROOT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    pub log_level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub adb: AdbSettings,
    #[serde(default)]
    pub explorer: ExplorerSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("ADB_FILE_EXPLORER_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".adb_file_explorer_config.json")
}

pub fn backup_config_path() -> PathBuf {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    home.join(".adb_file_explorer_config.backup.json")
}

pub fn load_config() -> Result<AppConfig, AppError> {
    load_config_from_path(&config_path())
}

pub fn save_config(config: &AppConfig) -> Result<(), AppError> {
    save_config_to_path(config, &config_path(), &backup_config_path())
}

pub fn load_config_from_path(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| AppError::process_fault(format!("Failed to read config: {err}"), ""))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .map_err(|err| AppError::process_fault(format!("Failed to parse config: {err}"), ""))?;
    Ok(validate_config(config))
}

pub fn save_config_to_path(
    config: &AppConfig,
    path: &Path,
    backup_path: &Path,
) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if path.exists() {
        let _ = fs::copy(path, backup_path);
    }
    let payload = serde_json::to_string_pretty(config)
        .map_err(|err| AppError::process_fault(format!("Failed to serialize config: {err}"), ""))?;
    fs::write(path, payload)
        .map_err(|err| AppError::process_fault(format!("Failed to write config: {err}"), ""))?;
    Ok(())
}

fn validate_config(mut config: AppConfig) -> AppConfig {
    if config.explorer.browse_root.trim().is_empty()
        || !config.explorer.browse_root.starts_with('/')
    {
        config.explorer.browse_root = DEFAULT_BROWSE_ROOT.to_string();
    }
    if config.logging.log_level.trim().is_empty() {
        config.logging.log_level = "info".to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config_from_path(&dir.path().join("missing.json")).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.explorer.browse_root, DEFAULT_BROWSE_ROOT);
    }

    #[test]
    fn round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let backup = dir.path().join("config.backup.json");

        let mut config = AppConfig::default();
        config.adb.command_path = "/opt/platform-tools/adb".to_string();
        config.explorer.browse_root = "/sdcard/Download".to_string();
        save_config_to_path(&config, &path, &backup).unwrap();

        let loaded = load_config_from_path(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn saving_twice_keeps_a_backup() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let backup = dir.path().join("config.backup.json");

        save_config_to_path(&AppConfig::default(), &path, &backup).unwrap();
        let mut updated = AppConfig::default();
        updated.adb.command_path = "adb".to_string();
        save_config_to_path(&updated, &path, &backup).unwrap();

        assert!(backup.exists());
        let restored = load_config_from_path(&backup).unwrap();
        assert_eq!(restored, AppConfig::default());
    }

    #[test]
    fn clamps_invalid_values() {
        let config = validate_config(AppConfig {
            explorer: ExplorerSettings {
                browse_root: "relative/path".to_string(),
            },
            logging: LoggingSettings {
                log_level: "  ".to_string(),
            },
            ..AppConfig::default()
        });
        assert_eq!(config.explorer.browse_root, DEFAULT_BROWSE_ROOT);
        assert_eq!(config.logging.log_level, "info");
    }

    #[test]
    fn tolerates_missing_sections() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        fs::write(&path, r#"{"adb": {"command_path": "adb"}}"#).unwrap();
        let config = load_config_from_path(&path).unwrap();
        assert_eq!(config.adb.command_path, "adb");
        assert_eq!(config.explorer.browse_root, DEFAULT_BROWSE_ROOT);
    }
}

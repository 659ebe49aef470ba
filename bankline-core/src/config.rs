//! Configuration management
//!
//! Settings live in `settings.json` under the data directory:
//! ```json
//! {
//!   "app": { "defaultHistoryLimit": 10, "defaultAdminLimit": 20 }
//! }
//! ```
//! Missing or malformed settings fall back to defaults - a broken settings
//! file must never block banking operations.

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default = "default_history_limit")]
    default_history_limit: i64,
    #[serde(default = "default_admin_limit")]
    default_admin_limit: i64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_history_limit: default_history_limit(),
            default_admin_limit: default_admin_limit(),
        }
    }
}

fn default_history_limit() -> i64 {
    10
}

fn default_admin_limit() -> i64 {
    20
}

/// Bankline configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    /// How many history rows to show when the caller gives no limit
    pub default_history_limit: i64,
    /// Row cap for admin transaction listings when no limit is given
    pub default_admin_limit: i64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_history_limit: default_history_limit(),
            default_admin_limit: default_admin_limit(),
        }
    }
}

impl Config {
    /// Load config from the data directory
    pub fn load(data_dir: &Path) -> Result<Self> {
        let settings_path = data_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        Ok(Self {
            default_history_limit: raw.app.default_history_limit.max(1),
            default_admin_limit: raw.app.default_admin_limit.max(1),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_history_limit, 10);
        assert_eq!(config.default_admin_limit, 20);
    }

    #[test]
    fn test_load_from_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("settings.json"),
            r#"{"app": {"defaultHistoryLimit": 5, "defaultAdminLimit": 50}}"#,
        )
        .unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_history_limit, 5);
        assert_eq!(config.default_admin_limit, 50);
    }

    #[test]
    fn test_corrupt_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("settings.json"), "{not json").unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.default_history_limit, 10);
    }
}

//! Usage logging - privacy-safe structured event logging
//!
//! Appends one JSON object per line to `logs/usage.jsonl` under the data
//! directory. No customer data (balances, holder names, PINs, account
//! numbers, descriptions) is ever logged - only which command ran, whether
//! it succeeded, how long it took, and the error message on failure.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Detect the current platform
fn detect_platform() -> &'static str {
    if cfg!(target_os = "macos") {
        "macos"
    } else if cfg!(target_os = "windows") {
        "windows"
    } else if cfg!(target_os = "linux") {
        "linux"
    } else {
        "unknown"
    }
}

/// A usage event to be recorded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageEvent {
    pub command: String,
    pub success: bool,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// A log entry as written to disk
#[derive(Debug, Clone, Serialize)]
struct UsageEntry {
    timestamp: String,
    app_version: String,
    platform: &'static str,
    #[serde(flatten)]
    event: UsageEvent,
}

/// Append-only usage log
pub struct UsageLogService {
    log_path: PathBuf,
    app_version: String,
}

impl UsageLogService {
    /// Create the log directory if needed and return the service
    pub fn new(data_dir: &Path, app_version: &str) -> Result<Self> {
        let log_dir = data_dir.join("logs");
        fs::create_dir_all(&log_dir)?;
        Ok(Self {
            log_path: log_dir.join("usage.jsonl"),
            app_version: app_version.to_string(),
        })
    }

    /// Append one event. Callers should ignore errors - logging must never
    /// break a banking operation.
    pub fn log(&self, event: UsageEvent) -> Result<()> {
        let entry = UsageEntry {
            timestamp: Utc::now().to_rfc3339(),
            app_version: self.app_version.clone(),
            platform: detect_platform(),
            event,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        writeln!(file, "{}", serde_json::to_string(&entry)?)?;
        Ok(())
    }

    pub fn log_path(&self) -> &Path {
        &self.log_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_appends_json_lines() {
        let dir = tempfile::tempdir().unwrap();
        let service = UsageLogService::new(dir.path(), "0.1.0").unwrap();

        service
            .log(UsageEvent {
                command: "deposit".to_string(),
                success: true,
                duration_ms: 12,
                error: None,
            })
            .unwrap();
        service
            .log(UsageEvent {
                command: "transfer".to_string(),
                success: false,
                duration_ms: 3,
                error: Some("Insufficient funds.".to_string()),
            })
            .unwrap();

        let content = std::fs::read_to_string(service.log_path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["command"], "deposit");
        assert_eq!(first["success"], true);
        assert!(first.get("error").is_none());

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["error"], "Insufficient funds.");
    }
}

use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::clock::ShiftBoundaries;
use crate::errors::{AppError, AppResult};
use crate::utils::time::parse_required_time;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub remote_base_url: String,
    pub auth_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_shift_start")]
    pub shift_start: String,
    #[serde(default = "default_shift_end")]
    pub shift_end: String,
    pub snapshot_file: String,
}

fn default_timeout_secs() -> u64 {
    5
}
fn default_shift_start() -> String {
    "09:00".to_string()
}
fn default_shift_end() -> String {
    "17:00".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            remote_base_url: "http://localhost:8080".to_string(),
            auth_token: None,
            request_timeout_secs: default_timeout_secs(),
            shift_start: default_shift_start(),
            shift_end: default_shift_end(),
            snapshot_file: Self::snapshot_file().to_string_lossy().to_string(),
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if let Some(dir) = dirs::config_dir() {
            dir.join("attendance-engine")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".attendance-engine")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("attendance-engine.conf")
    }

    /// Return the full path of the local snapshot blob
    pub fn snapshot_file() -> PathBuf {
        Self::config_dir().join("attendance_snapshot.json")
    }

    /// Load configuration from file, or return defaults if not found or
    /// unreadable.
    pub fn load() -> Self {
        let path = Self::config_file();

        if path.exists() {
            fs::read_to_string(&path)
                .ok()
                .and_then(|content| serde_yaml::from_str(&content).ok())
                .unwrap_or_default()
        } else {
            Config::default()
        }
    }

    /// Write the configuration file, creating the directory on demand.
    pub fn save(&self) -> AppResult<()> {
        fs::create_dir_all(Self::config_dir())?;

        let yaml = serde_yaml::to_string(self).map_err(|e| AppError::Config(e.to_string()))?;
        let mut file = fs::File::create(Self::config_file())?;
        file.write_all(yaml.as_bytes())?;
        Ok(())
    }

    /// Parse the configured shift start/end times.
    pub fn shift_boundaries(&self) -> AppResult<ShiftBoundaries> {
        Ok(ShiftBoundaries {
            start: parse_required_time(&self.shift_start)?,
            end: parse_required_time(&self.shift_end)?,
        })
    }
}

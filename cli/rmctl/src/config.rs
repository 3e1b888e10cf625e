//! Configuration and session management.
//!
//! Handles:
//! - API endpoint configuration
//! - The last-chosen login role
//! - The session created by a successful login

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rm_model::{Role, User};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// Session file name.
const SESSION_FILE: &str = "session.json";

/// Get the config directory path. `RM_CONFIG_DIR` overrides the platform default.
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("RM_CONFIG_DIR") {
        return Ok(PathBuf::from(dir));
    }
    ProjectDirs::from("com", "resource-manager", "rmctl")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// API endpoint URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Role preselected for the next login.
    #[serde(default)]
    pub selected_role: Role,
}

fn default_api_url() -> String {
    std::env::var("RM_API_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            selected_role: Role::default(),
        }
    }
}

impl Config {
    /// Load config from disk, or return default.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?)
    }

    pub fn load_from(dir: &Path) -> Result<Self> {
        let path = dir.join(CONFIG_FILE);

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Get the API URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_dir()?)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        write_private(dir, CONFIG_FILE, &serde_json::to_string_pretty(self)?)
    }
}

/// An authenticated session.
///
/// Created only by a successful login and removed by logout. Commands receive
/// it explicitly through the command context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: User,

    /// Bearer token issued by the backend.
    pub token: String,

    /// Role the session was opened with.
    pub role: Role,

    pub created_at: DateTime<Utc>,
}

impl Session {
    /// Start a new session.
    pub fn start(user: User, token: String, role: Role) -> Self {
        Self {
            user,
            token,
            role,
            created_at: Utc::now(),
        }
    }

    /// Load the session from disk.
    pub fn load() -> Result<Option<Self>> {
        Self::load_from(&config_dir()?)
    }

    pub fn load_from(dir: &Path) -> Result<Option<Self>> {
        let path = dir.join(SESSION_FILE);

        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read session from {:?}", path))?;

        let session: Self = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse session from {:?}", path))?;

        Ok(Some(session))
    }

    /// Save the session to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_dir()?)
    }

    pub fn save_to(&self, dir: &Path) -> Result<()> {
        write_private(dir, SESSION_FILE, &serde_json::to_string_pretty(self)?)
    }

    /// Delete the session from disk.
    pub fn end() -> Result<()> {
        Self::end_in(&config_dir()?)
    }

    pub fn end_in(dir: &Path) -> Result<()> {
        let path = dir.join(SESSION_FILE);

        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to delete session at {:?}", path))?;
        }

        Ok(())
    }

    /// Fails unless the session was opened with `role`.
    pub fn require_role(&self, role: Role) -> Result<(), CliError> {
        if self.role == role {
            Ok(())
        } else {
            Err(CliError::Forbidden {
                required: role,
                actual: self.role,
            })
        }
    }
}

/// Writes `contents` to `dir/name`, readable only by the owner on Unix.
fn write_private(dir: &Path, name: &str, contents: &str) -> Result<()> {
    fs::create_dir_all(dir)?;
    let path = dir.join(name);

    #[cfg(unix)]
    {
        use std::io::Write;
        use std::os::unix::fs::OpenOptionsExt;

        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(&path)
            .with_context(|| format!("Failed to open {:?}", path))?;
        file.write_all(contents.as_bytes())?;
    }

    #[cfg(not(unix))]
    {
        fs::write(&path, contents).with_context(|| format!("Failed to write {:?}", path))?;
    }

    Ok(())
}

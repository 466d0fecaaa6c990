//! Configuration management.
//!
//! Handles:
//! - API endpoint configuration
//! - Location of the persisted session
//! - Private file writes shared with the session store

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

/// Configuration file name.
const CONFIG_FILE: &str = "config.json";

/// Session file name.
pub const SESSION_FILE: &str = "session.json";

/// Environment variable overriding the API base URL.
pub const API_URL_ENV: &str = "CAFE_API_URL";

/// Local development backend.
pub const DEFAULT_API_URL: &str = "http://localhost:9090/api";

/// Get the config directory path.
pub fn config_dir() -> Result<PathBuf> {
    ProjectDirs::from("com", "cafe", "cafe")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
}

/// Default location of the persisted session.
pub fn default_session_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(SESSION_FILE))
}

/// Console configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// API base URL, including the `/api` prefix.
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Load config from disk, or return default.
    pub fn load() -> Result<Self> {
        let path = config_dir()?.join(CONFIG_FILE);
        Self::load_from(&path)
    }

    /// Load config from an explicit path, or return default if it is missing.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config from {:?}", path))
    }

    /// Replace the API URL when an override (flag or env) is given.
    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        if let Some(url) = api_url.filter(|u| !u.trim().is_empty()) {
            self.api_url = url;
        }
        self
    }

    /// Get the API URL without a trailing slash.
    pub fn api_url(&self) -> &str {
        self.api_url.trim_end_matches('/')
    }

    /// Save config to disk.
    pub fn save(&self) -> Result<()> {
        let dir = config_dir()?;
        fs::create_dir_all(&dir)?;

        let contents = serde_json::to_string_pretty(self)?;
        write_private(&dir.join(CONFIG_FILE), contents.as_bytes())
            .context("Failed to write config")
    }
}

/// Replace `path` with `contents`, readable only by the current user.
///
/// The bytes go to a temporary file in the same directory which is then
/// renamed over the target, so readers see the old or the new file, never a
/// partial one.
pub(crate) fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    // Created with mode 0600 on unix.
    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(!config.api_url.is_empty());
    }

    #[test]
    fn test_api_url_override() {
        let config = Config {
            api_url: DEFAULT_API_URL.to_string(),
        }
        .with_api_url(Some("https://cafe.example.com/api/".to_string()));
        assert_eq!(config.api_url(), "https://cafe.example.com/api");

        let config = config.with_api_url(Some("  ".to_string()));
        assert_eq!(config.api_url(), "https://cafe.example.com/api");
    }

    #[test]
    fn test_load_missing_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_file_defaults_ignore_environment() {
        // The env override is applied by the CLI layer through `with_api_url`.
        std::env::set_var(API_URL_ENV, "http://env.example.com/api");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "{}").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url(), DEFAULT_API_URL);
        assert_eq!(Config::default().api_url(), DEFAULT_API_URL);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, r#"{"api_url":"http://10.0.0.5:9090/api"}"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.api_url(), "http://10.0.0.5:9090/api");
    }

    #[test]
    fn test_write_private_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        write_private(&path, b"first, and longer").unwrap();
        write_private(&path, b"second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        // Only the target remains; the temporary file was renamed over it.
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_write_private_tightens_existing_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        write_private(&path, b"{\"token\":\"abc\"}").unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}

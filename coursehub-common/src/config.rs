//! Configuration loading and root folder resolution

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Environment variable naming the data root folder
pub const ROOT_FOLDER_ENV: &str = "COURSEHUB_ROOT_FOLDER";

/// SQLite file name inside the root folder
pub const DATABASE_FILE_NAME: &str = "coursehub.db";

/// Optional settings read from `config.toml`
///
/// Every field is optional; a missing or unreadable file behaves like an
/// empty one.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct TomlConfig {
    /// Data folder holding the catalog database
    pub root_folder: Option<PathBuf>,
    /// Model used for transcript questions
    pub gemini_model: Option<String>,
}

impl TomlConfig {
    /// Parse a config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// Load the platform config file, falling back to defaults
    pub fn load() -> Self {
        let Ok(path) = config_file_path() else {
            return Self::default();
        };

        match Self::from_file(&path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config file: {}", e);
                Self::default()
            }
        }
    }
}

/// Root folder resolution, highest priority first:
/// 1. Command-line argument
/// 2. Environment variable
/// 3. TOML config file
/// 4. OS-dependent compiled default
pub fn resolve_root_folder(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    config: &TomlConfig,
) -> PathBuf {
    if let Some(path) = cli_arg {
        return path.to_path_buf();
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.is_empty() {
            return PathBuf::from(path);
        }
    }

    if let Some(path) = &config.root_folder {
        return path.clone();
    }

    default_root_folder()
}

/// Database file location for a root folder
pub fn database_path(root_folder: &Path) -> PathBuf {
    root_folder.join(DATABASE_FILE_NAME)
}

/// Get configuration file path for the platform
fn config_file_path() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // ~/.config/coursehub/config.toml first, then /etc/coursehub/config.toml
        let user_config = dirs::config_dir().map(|d| d.join("coursehub").join("config.toml"));
        let system_config = PathBuf::from("/etc/coursehub/config.toml");

        if let Some(path) = user_config {
            if path.exists() {
                return Ok(path);
            }
        }
        if system_config.exists() {
            return Ok(system_config);
        }
        return Err(Error::Config("No config file found".to_string()));
    }

    let path = dirs::config_dir()
        .map(|d| d.join("coursehub").join("config.toml"))
        .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;

    if path.exists() {
        Ok(path)
    } else {
        Err(Error::Config(format!("Config file not found: {:?}", path)))
    }
}

/// Get OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        dirs::data_local_dir()
            .map(|d| d.join("coursehub"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/coursehub"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("coursehub"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/coursehub"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("coursehub"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\coursehub"))
    } else {
        PathBuf::from("./coursehub_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_path_joins_file_name() {
        let path = database_path(Path::new("/srv/coursehub"));
        assert_eq!(path, PathBuf::from("/srv/coursehub/coursehub.db"));
    }

    #[test]
    fn test_default_root_folder_not_empty() {
        assert!(!default_root_folder().as_os_str().is_empty());
    }
}

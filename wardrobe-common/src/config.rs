//! Configuration loading and root folder resolution
//!
//! The root folder holds the service database (`wardrobe.db`). Resolution
//! priority: command-line argument, then environment variable, then TOML
//! config file, then an OS-dependent compiled default.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "WARDROBE_ROOT_FOLDER";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "wardrobe.db";

/// Resolve the root folder
pub fn resolve_root_folder(cli_arg: Option<&str>) -> PathBuf {
    // Priority 1: Command-line argument
    if let Some(path) = cli_arg {
        return PathBuf::from(path);
    }

    // Priority 2: Environment variable
    if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
        return PathBuf::from(path);
    }

    // Priority 3: TOML config file
    if let Ok(config_path) = find_config_file() {
        if let Ok(toml_content) = std::fs::read_to_string(&config_path) {
            if let Ok(config) = toml::from_str::<toml::Value>(&toml_content) {
                if let Some(root_folder) = config.get("root_folder").and_then(|v| v.as_str()) {
                    return PathBuf::from(root_folder);
                }
            }
        }
    }

    // Priority 4: OS-dependent compiled default
    default_root_folder()
}

/// Create the root folder if missing and return the database path inside it
pub fn ensure_root_folder(root: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(root)
        .map_err(|e| Error::Config(format!("Failed to create root folder {:?}: {}", root, e)))?;
    Ok(root.join(DATABASE_FILE))
}

/// Locate the platform config file (`wardrobe/config.toml`)
pub fn find_config_file() -> Result<PathBuf> {
    if cfg!(target_os = "linux") {
        // Try ~/.config/wardrobe/config.toml first, then /etc/wardrobe/config.toml
        if let Some(path) = dirs::config_dir().map(|d| d.join("wardrobe").join("config.toml")) {
            if path.exists() {
                return Ok(path);
            }
        }
        let system_config = PathBuf::from("/etc/wardrobe/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
        Err(Error::Config("No config file found".to_string()))
    } else {
        let path = dirs::config_dir()
            .map(|d| d.join("wardrobe").join("config.toml"))
            .ok_or_else(|| Error::Config("Could not determine config directory".to_string()))?;
        if path.exists() {
            Ok(path)
        } else {
            Err(Error::Config(format!("Config file not found: {:?}", path)))
        }
    }
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/wardrobe
        dirs::data_local_dir()
            .map(|d| d.join("wardrobe"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/wardrobe"))
    } else if cfg!(target_os = "macos") {
        // ~/Library/Application Support/wardrobe
        dirs::data_dir()
            .map(|d| d.join("wardrobe"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/wardrobe"))
    } else if cfg!(target_os = "windows") {
        // %LOCALAPPDATA%\wardrobe
        dirs::data_local_dir()
            .map(|d| d.join("wardrobe"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\wardrobe"))
    } else {
        PathBuf::from("./wardrobe_data")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_argument_wins() {
        let root = resolve_root_folder(Some("/tmp/custom-wardrobe"));
        assert_eq!(root, PathBuf::from("/tmp/custom-wardrobe"));
    }

    #[test]
    fn ensure_root_folder_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("nested").join("wardrobe");
        let db_path = ensure_root_folder(&root).unwrap();
        assert!(root.is_dir());
        assert_eq!(db_path, root.join(DATABASE_FILE));
    }
}

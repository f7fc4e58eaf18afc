//! Configuration loading and root folder resolution

use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Environment variable overriding the root folder location
pub const ROOT_FOLDER_ENV: &str = "TARAB_ROOT_FOLDER";

/// Environment variable overriding the HTTP listen port
pub const PORT_ENV: &str = "PORT";

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 5000;

/// Name of the SQLite database file inside the root folder
pub const DATABASE_FILE: &str = "tarab.db";

/// Root folder resolution, priority order:
/// 1. Command-line argument (highest priority)
/// 2. `TARAB_ROOT_FOLDER` environment variable
/// 3. TOML config file (`root_folder` key)
/// 4. OS-dependent compiled default (fallback)
pub struct RootFolderResolver {
    cli_arg: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(cli_arg: Option<PathBuf>) -> Self {
        Self { cli_arg }
    }

    /// Resolve the root folder, never fails (falls back to the OS default)
    pub fn resolve(&self) -> PathBuf {
        // Priority 1: Command-line argument
        if let Some(path) = &self.cli_arg {
            debug!("Root folder from command line: {}", path.display());
            return path.clone();
        }

        // Priority 2: Environment variable
        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.is_empty() {
                debug!("Root folder from {}: {}", ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        // Priority 3: TOML config file
        if let Ok(config_path) = find_config_file() {
            if let Some(path) = read_root_folder_key(&config_path) {
                debug!("Root folder from {}: {}", config_path.display(), path.display());
                return path;
            }
        }

        // Priority 4: OS-dependent compiled default
        default_root_folder()
    }
}

/// Ensures the resolved root folder exists and locates files inside it
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create the root folder directory (and parents) if missing
    pub fn ensure_directory_exists(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root_folder)?;
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    /// Path of the SQLite database inside the root folder
    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }
}

/// HTTP listen port: `PORT` environment variable, else 5000
pub fn listen_port() -> u16 {
    std::env::var(PORT_ENV)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Locate the platform config file (`tarab/config.toml` under the user config
/// dir, or `/etc/tarab/config.toml` on Linux)
fn find_config_file() -> Result<PathBuf> {
    if let Some(path) = dirs::config_dir().map(|d| d.join("tarab").join("config.toml")) {
        if path.exists() {
            return Ok(path);
        }
    }

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/tarab/config.toml");
        if system_config.exists() {
            return Ok(system_config);
        }
    }

    Err(Error::Config("No config file found".to_string()))
}

/// Read the `root_folder` key from a TOML config file, if present
fn read_root_folder_key(config_path: &Path) -> Option<PathBuf> {
    let content = std::fs::read_to_string(config_path).ok()?;
    let config = toml::from_str::<toml::Value>(&content).ok()?;
    config
        .get("root_folder")
        .and_then(|v| v.as_str())
        .map(PathBuf::from)
}

/// OS-dependent default root folder path
fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("tarab"))
        .unwrap_or_else(|| PathBuf::from("./tarab_data"))
}

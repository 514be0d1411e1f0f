//! # Application Configuration
//!
//! Settings come from an optional TOML file named by `EDUDOC_CONFIG`; every
//! field has a default so the file may be partial or absent. A handful of
//! environment variables are applied on top for container deployments.

use crate::pipeline::fonts::FontSettings;
use crate::pipeline::layout::LayoutSettings;
use log::info;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const CONFIG_ENV: &str = "EDUDOC_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value `{value}` for {name}")]
    Env { name: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Largest accepted multipart body, in bytes.
    pub upload_limit: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            upload_limit: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub data_dir: PathBuf,
    /// Database file name, relative to `data_dir`.
    pub database: String,
    /// Upload root, relative to `data_dir`.
    pub uploads: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            database: "edudoc.sqlite".to_string(),
            uploads: "uploads".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AdminSettings {
    pub username: String,
    pub password: String,
}

impl Default for AdminSettings {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub admin: AdminSettings,
    pub layout: LayoutSettings,
    pub fonts: FontSettings,
    pub logo: Option<PathBuf>,
}

impl AppConfig {
    /// Loads the file named by `EDUDOC_CONFIG` (if set) and applies the
    /// environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path))?,
            None => Self::default(),
        };
        config.apply_overrides(|name| env::var(name).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration from {}", path.display());
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }

    /// Applies overrides looked up through `lookup`. Blank values are ignored.
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(host) = get("EDUDOC_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("EDUDOC_PORT") {
            self.server.port = port.trim().parse().map_err(|_| ConfigError::Env {
                name: "EDUDOC_PORT",
                value: port,
            })?;
        }
        if let Some(dir) = get("EDUDOC_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(logo) = get("EDUDOC_LOGO") {
            self.logo = Some(PathBuf::from(logo));
        }
        if let Some(dir) = get("EDUDOC_FONT_DIR") {
            self.fonts.dir = Some(PathBuf::from(dir));
        }
        if let Some(password) = lookup("ADMIN_PASSWORD").filter(|v| !v.is_empty()) {
            self.admin.password = password;
        }
        Ok(())
    }

    pub fn database_path(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.database)
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.storage.data_dir.join(&self.storage.uploads)
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.server.host.clone(), self.server.port)
    }

    /// Creates the data directory. Upload folders belong to the file store.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.storage.data_dir)
    }
}

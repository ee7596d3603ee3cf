//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables (`KILN_STORE_PATH`, `KILN_TEMPLATE_ROOT`, ...)
//! 2. Config file (`--config-file` path, or the default location if present)
//! 3. Built-in defaults under the platform config/data dirs

use std::path::PathBuf;

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the repository snapshot file.
    pub store_path: PathBuf,

    /// Root directory template sources are resolved against.
    pub template_root: PathBuf,

    /// Root directory setup scripts are resolved against.
    pub scripts_root: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        let dirs = directories::ProjectDirs::from("com", "kiln", "kiln");
        let config_dir = dirs
            .as_ref()
            .map(|d| d.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".kiln"));
        let data_dir = dirs
            .as_ref()
            .map(|d| d.data_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".kiln"));

        Self {
            store_path: data_dir.join("store.json"),
            template_root: config_dir.join("templates"),
            scripts_root: config_dir.join("scripts"),
        }
    }
}

impl AppConfig {
    /// Load configuration, layering file and environment over defaults.
    ///
    /// `config_file` is the path the user passed via `--config-file`; when
    /// `None`, the default location is used if it exists.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let mut builder = Config::builder()
            .set_default("store_path", path_string(&defaults.store_path))?
            .set_default("template_root", path_string(&defaults.template_root))?
            .set_default("scripts_root", path_string(&defaults.scripts_root))?;

        builder = match config_file {
            Some(path) => {
                builder.add_source(File::from(path.clone()).format(FileFormat::Toml))
            }
            None => builder.add_source(
                File::from(Self::config_path())
                    .format(FileFormat::Toml)
                    .required(false),
            ),
        };

        let config = builder
            .add_source(Environment::with_prefix("KILN").separator("_"))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Path to the default configuration file.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "kiln", "kiln")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(".kiln.toml"))
    }
}

fn path_string(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

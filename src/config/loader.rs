//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (<config dir>/gradlemeta/config.toml)
//! 3. Project config (./.gradlemeta.toml)
//! 4. Environment variables (GRADLEMETA_* prefix, `__` for nesting)
//! 5. Well-known variables (GITHUB_TOKEN, PORT_CLIENT_ID, LOG_LEVEL, ...)

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{GradleMetaError, Result};

/// Environment variables mapped onto config keys
const ENV_ALIASES: &[(&str, &str)] = &[
    ("GITHUB_TOKEN", "source.token"),
    ("GITHUB_ORG", "source.organization"),
    ("PORT_CLIENT_ID", "catalog.client_id"),
    ("PORT_CLIENT_SECRET", "catalog.client_secret"),
    ("PORT_BLUEPRINT", "catalog.blueprint"),
    ("LOG_LEVEL", "logging.level"),
];

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = Self::project_config_path();
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        Self::extract(Self::merge_env(figment))
    }

    /// Load configuration from a specific file, still honoring env overrides
    pub fn load_from_file(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(GradleMetaError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path));
        Self::extract(Self::merge_env(figment))
    }

    fn merge_env(figment: Figment) -> Figment {
        // e.g. GRADLEMETA_CATALOG__CLIENT_ID -> catalog.client_id
        let mut figment = figment.merge(Env::prefixed("GRADLEMETA_").split("__"));

        // Merged as strings: Env would parse an all-digit secret into an integer
        for &(var, key) in ENV_ALIASES {
            if let Ok(value) = std::env::var(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }

        figment
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| GradleMetaError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Platform config directory for gradlemeta
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", "gradlemeta").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(".gradlemeta.toml")
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Show config file paths
    pub fn show_path() {
        println!("Configuration paths:");
        println!();

        if let Some(global) = Self::global_config_path() {
            let exists = if global.exists() { "✓" } else { "✗" };
            println!("  Global:  {} {}", exists, global.display());
        } else {
            println!("  Global:  (not available)");
        }

        let project = Self::project_config_path();
        let exists = if project.exists() { "✓" } else { "✗" };
        println!("  Project: {} {}", exists, project.display());
    }

    /// Render the effective configuration as toml, json or yaml
    pub fn render(config: &Config, format: &str) -> Result<String> {
        match format {
            "json" => Ok(serde_json::to_string_pretty(config)?),
            "yaml" => Ok(serde_yaml::to_string(config)?),
            "toml" | "text" => {
                toml::to_string_pretty(config).map_err(|e| GradleMetaError::Config(e.to_string()))
            }
            other => Err(GradleMetaError::Config(format!(
                "Unknown format '{}'. Valid values: toml, json, yaml",
                other
            ))),
        }
    }

    // =========================================================================
    // Initialization
    // =========================================================================

    /// Write a starter config file. Existing files are kept unless `force`
    pub fn init(global: bool, force: bool) -> Result<PathBuf> {
        let path = if global {
            Self::global_config_path().ok_or_else(|| {
                GradleMetaError::Config("Cannot determine global config directory".to_string())
            })?
        } else {
            Self::project_config_path()
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        if !path.exists() || force {
            fs::write(&path, Self::default_config())?;
            info!("Created config: {}", path.display());
        } else {
            info!("Config exists: {}", path.display());
        }

        Ok(path)
    }

    /// Default config file content (TOML)
    fn default_config() -> String {
        r#"# gradlemeta configuration
# Secrets are read from GITHUB_TOKEN, PORT_CLIENT_ID and PORT_CLIENT_SECRET.

[source]
api_base = "https://api.github.com"
# organization = "my-org"
# Empty list syncs every repository of the organization
repositories = []
build_files = ["build.gradle.kts", "build.gradle"]
wrapper_properties = "gradle/wrapper/gradle-wrapper.properties"

[catalog]
api_base = "https://api.getport.io/v1"
blueprint = "service"
# repository_relation = "repository"

[extraction]
# auto, groovy, kotlin, merge
dialect = "auto"
configurations = ["implementation"]

[sync]
max_retries = 0
dry_run = false

[logging]
level = "info"
"#
        .to_string()
    }
}

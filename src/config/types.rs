//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};

use crate::constants::{catalog, extraction, layout, network, source};
use crate::extractor::DialectMode;
use crate::types::{GradleMetaError, Result};

/// Log levels accepted in `logging.level` / `LOG_LEVEL`
pub const LOG_LEVELS: &[&str] = &["error", "warn", "log", "info", "debug", "trace"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Source host (where build files are read from)
    pub source: SourceConfig,

    /// Catalog service (where records are upserted)
    pub catalog: CatalogConfig,

    /// Extraction engine settings
    pub extraction: ExtractionConfig,

    /// Sync behavior
    pub sync: SyncConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `GradleMetaError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if self.source.timeout_secs == 0 || self.catalog.timeout_secs == 0 {
            return Err(GradleMetaError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.catalog.blueprint.trim().is_empty() {
            return Err(GradleMetaError::Config(
                "catalog.blueprint must not be empty".to_string(),
            ));
        }

        if self.extraction.configurations.is_empty()
            || self
                .extraction
                .configurations
                .iter()
                .any(|c| c.trim().is_empty())
        {
            return Err(GradleMetaError::Config(
                "extraction.configurations must list at least one non-empty name".to_string(),
            ));
        }

        if self.source.build_files.is_empty() {
            return Err(GradleMetaError::Config(
                "source.build_files must not be empty".to_string(),
            ));
        }

        if !LOG_LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(GradleMetaError::Config(format!(
                "Unknown log level '{}'. Valid values: {}",
                self.logging.level,
                LOG_LEVELS.join(", ")
            )));
        }

        Ok(())
    }
}

// =============================================================================
// Source Host
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// REST API base URL
    pub api_base: String,

    /// Organization whose repositories are synced
    pub organization: Option<String>,

    /// Access token. Never serialized to output
    #[serde(skip_serializing)]
    pub token: Option<String>,

    /// Repositories to sync; empty means every repository of the organization
    pub repositories: Vec<String>,

    /// Build files tried in order at the repository root
    pub build_files: Vec<String>,

    /// Wrapper properties path relative to the repository root
    pub wrapper_properties: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_base: source::DEFAULT_API_BASE.to_string(),
            organization: None,
            token: None,
            repositories: Vec::new(),
            build_files: layout::BUILD_FILES.iter().map(|s| s.to_string()).collect(),
            wrapper_properties: layout::WRAPPER_PROPERTIES.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("api_base", &self.api_base)
            .field("organization", &self.organization)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("repositories", &self.repositories)
            .field("build_files", &self.build_files)
            .field("wrapper_properties", &self.wrapper_properties)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// REST API base URL
    pub api_base: String,

    /// OAuth client id
    pub client_id: Option<String>,

    /// OAuth client secret. Never serialized to output
    #[serde(skip_serializing)]
    pub client_secret: Option<String>,

    /// Entity type that synced records are stored as
    pub blueprint: String,

    /// Relation linking each entity to its repository entity, if any
    pub repository_relation: Option<String>,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            api_base: catalog::DEFAULT_API_BASE.to_string(),
            client_id: None,
            client_secret: None,
            blueprint: catalog::DEFAULT_BLUEPRINT.to_string(),
            repository_relation: None,
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for CatalogConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogConfig")
            .field("api_base", &self.api_base)
            .field("client_id", &self.client_id)
            .field(
                "client_secret",
                &self.client_secret.as_ref().map(|_| "[REDACTED]"),
            )
            .field("blueprint", &self.blueprint)
            .field("repository_relation", &self.repository_relation)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

// =============================================================================
// Extraction
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Plugin grammar selection
    pub dialect: DialectMode,

    /// Dependency configurations to read (`implementation`, `api`, ...)
    pub configurations: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            dialect: DialectMode::Auto,
            configurations: vec![extraction::DEFAULT_CONFIGURATION.to_string()],
        }
    }
}

// =============================================================================
// Sync
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Extra attempts for retryable remote errors (0 = fail on first error)
    pub max_retries: u32,

    /// Extract and report without upserting
    pub dry_run: bool,

    /// Upsert repositories that have a wrapper but no build script
    pub include_wrapper_only: bool,
}

// =============================================================================
// Logging
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// error, warn, log, info, debug, trace
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl LoggingConfig {
    /// Level as a tracing filter directive (`log` is an alias of `info`)
    pub fn filter_directive(&self) -> String {
        match self.level.to_lowercase().as_str() {
            "log" => "info".to_string(),
            other => other.to_string(),
        }
    }
}

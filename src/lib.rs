//! gradlemeta - Gradle Build Metadata for Software Catalogs
//!
//! Reads Gradle build scripts as plain text (no Gradle evaluation), extracts
//! the declared plugins, dependencies and wrapper-pinned Gradle version, and
//! upserts one catalog entity per repository.
//!
//! ## Core Features
//!
//! - **Both DSLs**: Groovy `build.gradle` and Kotlin `build.gradle.kts`
//! - **Variable Resolution**: `$name` / `${name}` versions resolved against
//!   file-level `def` / `val` string bindings
//! - **Wrapper Pin**: Gradle version from `gradle-wrapper.properties`
//! - **Sources**: GitHub organizations or local checkouts
//! - **Catalog**: Port entity upsert with retry on transient failures
//!
//! ## Quick Start
//!
//! ```ignore
//! use gradlemeta::GradleExtractor;
//!
//! let metadata = GradleExtractor::default().extract(&build_text, Some(&wrapper_text));
//! assert!(metadata.plugins.contains_key("java"));
//! ```
//!
//! ## Modules
//!
//! - [`extractor`]: Text-level extraction engine
//! - [`scanner`]: Gradle project discovery in a local tree
//! - [`source`]: Source hosts (GitHub, local directory)
//! - [`catalog`]: Catalog clients (Port)
//! - [`sync`]: Repository-to-catalog sync pipeline
//! - [`config`]: Layered configuration

pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod extractor;
pub mod scanner;
pub mod source;
pub mod sync;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

// Configuration
pub use config::{Config, ConfigLoader};

// Error Types
pub use types::error::{ErrorCategory, GradleMetaError, RemoteError, Result};

// Engine
pub use extractor::{BuildFileKind, Dialect, DialectMode, GradleExtractor};
pub use types::BuildMetadata;

// =============================================================================
// Pipeline Re-exports
// =============================================================================

pub use catalog::{CatalogClient, PortClient};
pub use source::{GitHubSource, LocalSource, Repository, SourceHost};
pub use sync::{SyncOptions, SyncPipeline, SyncReport};

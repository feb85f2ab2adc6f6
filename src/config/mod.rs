//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (<config dir>/gradlemeta/config.toml)
//! 3. Project config (.gradlemeta.toml)
//! 4. Environment variables (GRADLEMETA_*, GITHUB_TOKEN, PORT_CLIENT_*, LOG_LEVEL)
//! 5. CLI arguments (highest priority)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;

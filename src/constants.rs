//! Global Constants
//!
//! Centralized constants for extraction markers, file layout, and remote
//! service defaults.

/// Extraction engine constants
pub mod extraction {
    /// Version reported for a plugin declared without `version`
    pub const NO_PLUGIN_VERSION: &str = "No version specified";

    /// Version reported for a dependency literal without a version segment
    pub const UNKNOWN_DEPENDENCY_VERSION: &str = "version unknown";

    /// Dependency configuration scanned when none is configured
    pub const DEFAULT_CONFIGURATION: &str = "implementation";

    /// Group prefix of the Kotlin DSL `kotlin("<module>")` plugin shorthand
    pub const KOTLIN_PLUGIN_PREFIX: &str = "org.jetbrains.kotlin.";
}

/// Repository file layout
pub mod layout {
    /// Build files tried in order; the first one present wins
    pub const BUILD_FILES: &[&str] = &["build.gradle.kts", "build.gradle"];

    /// Wrapper properties path relative to the repository root
    pub const WRAPPER_PROPERTIES: &str = "gradle/wrapper/gradle-wrapper.properties";

    /// Directories never descended into when scanning a local tree
    pub const SKIP_DIRS: &[&str] = &[".git", ".gradle", "build", "out", "node_modules"];
}

/// Source host (GitHub) constants
pub mod source {
    /// Default REST API base
    pub const DEFAULT_API_BASE: &str = "https://api.github.com";

    /// Page size for repository listings (GitHub maximum)
    pub const PAGE_SIZE: usize = 100;

    /// Media type returning raw file contents instead of base64 JSON
    pub const RAW_MEDIA_TYPE: &str = "application/vnd.github.raw+json";
}

/// Catalog (Port) constants
pub mod catalog {
    /// Default REST API base
    pub const DEFAULT_API_BASE: &str = "https://api.getport.io/v1";

    /// Default entity type for synced repositories
    pub const DEFAULT_BLUEPRINT: &str = "service";
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Base delay for exponential backoff (milliseconds)
    pub const BASE_DELAY_MS: u64 = 500;

    /// Maximum delay between retries (seconds)
    pub const MAX_DELAY_SECS: u64 = 30;

    /// User agent sent with every request (GitHub rejects requests without one)
    pub const USER_AGENT: &str = concat!("gradlemeta/", env!("CARGO_PKG_VERSION"));
}

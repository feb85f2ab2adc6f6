//! Gradle Build Metadata Extraction
//!
//! Best-effort extraction of plugins, dependencies and the wrapper's Gradle
//! version from raw build script text, in either DSL dialect.
//!
//! ## Pipeline
//!
//! 1. `Dialect::detect` picks the plugin grammar
//! 2. `extract_variables` builds the file-wide variable table
//! 3. `extract_plugins` reads the `plugins {}` block
//! 4. `DependencyExtractor` reads the `dependencies {}` block and resolves
//!    `$name` versions against the variable table
//! 5. `extract_wrapper` reads `gradle-wrapper.properties` independently
//!
//! Every stage is a pure function of its input. Missing blocks and malformed
//! declarations degrade to empty results; nothing here returns an error for
//! any input text.
//!
//! ```rust,ignore
//! use gradlemeta::extractor::GradleExtractor;
//!
//! let metadata = GradleExtractor::default().extract(build_text, Some(wrapper_text));
//! println!("{}", serde_json::to_string_pretty(&metadata)?);
//! ```

pub mod block;
pub mod dependencies;
pub mod dialect;
pub mod plugins;
pub mod variables;
pub mod wrapper;

pub use dependencies::{
    DependencyCoordinate, DependencyExtractor, ResolvedDependency, VersionToken,
    extract_dependencies,
};
pub use dialect::{Dialect, DialectMode};
pub use plugins::{PluginMatches, PluginRecord, extract_plugins};
pub use variables::{VariableTable, extract_variables};
pub use wrapper::{WrapperInfo, extract_wrapper};

use std::collections::BTreeMap;
use std::path::Path;

use crate::config::ExtractionConfig;
use crate::types::{BuildMetadata, Result};

/// Plugins and dependencies of one build script
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildScript {
    pub dialect: Option<Dialect>,
    pub variables: VariableTable,
    pub plugins: BTreeMap<String, String>,
    pub dependencies: BTreeMap<String, Option<String>>,
}

/// Kind of Gradle file, recognized by file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildFileKind {
    /// `build.gradle`
    GroovyScript,
    /// `build.gradle.kts`
    KotlinScript,
    /// `gradle-wrapper.properties`
    WrapperProperties,
}

impl BuildFileKind {
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.file_name()?.to_str()? {
            "build.gradle" => Some(BuildFileKind::GroovyScript),
            "build.gradle.kts" => Some(BuildFileKind::KotlinScript),
            "gradle-wrapper.properties" => Some(BuildFileKind::WrapperProperties),
            _ => None,
        }
    }

    pub fn is_build_script(self) -> bool {
        !matches!(self, BuildFileKind::WrapperProperties)
    }
}

/// Configured extraction engine.
///
/// Holds no per-file state; one instance can be shared across threads and
/// reused for any number of files.
#[derive(Debug, Clone, Default)]
pub struct GradleExtractor {
    dialect_mode: DialectMode,
    dependencies: DependencyExtractor,
}

impl GradleExtractor {
    pub fn new<S: AsRef<str>>(dialect_mode: DialectMode, configurations: &[S]) -> Result<Self> {
        Ok(Self {
            dialect_mode,
            dependencies: DependencyExtractor::new(configurations)?,
        })
    }

    pub fn from_config(config: &ExtractionConfig) -> Result<Self> {
        Self::new(config.dialect, &config.configurations)
    }

    pub fn with_dialect_mode(mut self, mode: DialectMode) -> Self {
        self.dialect_mode = mode;
        self
    }

    pub fn dialect_mode(&self) -> DialectMode {
        self.dialect_mode
    }

    /// Extract plugins and dependencies from one build script
    pub fn extract_build_script(&self, text: &str) -> BuildScript {
        let grammars = self.dialect_mode.grammars(text);

        let mut plugins = BTreeMap::new();
        if let Some(block) = plugins::plugins_block(text) {
            // Later grammars overwrite earlier ones on conflicting names
            for &dialect in &grammars {
                plugins::collect_plugins(block, dialect, &mut plugins);
            }
        }

        let variables = extract_variables(text);
        let dependencies = self.dependencies.extract(text, &variables);

        tracing::debug!(
            dialect = ?grammars.last(),
            plugins = plugins.len(),
            variables = variables.len(),
            dependencies = dependencies.len(),
            "Extracted build script"
        );

        BuildScript {
            dialect: grammars.last().copied(),
            variables,
            plugins,
            dependencies,
        }
    }

    /// Extract the full catalog record for one project
    pub fn extract(&self, build_text: &str, wrapper_text: Option<&str>) -> BuildMetadata {
        let script = self.extract_build_script(build_text);
        let wrapper = wrapper_text.map(extract_wrapper).unwrap_or_default();
        assemble(Some(script), wrapper)
    }
}

/// Combine the outputs of independent stages into one record.
///
/// Either side may be missing: a repository can pin a wrapper without a
/// parseable build script, and vice versa.
pub fn assemble(script: Option<BuildScript>, wrapper: WrapperInfo) -> BuildMetadata {
    let script = script.unwrap_or_default();
    BuildMetadata {
        plugins: script.plugins,
        dependencies: script.dependencies,
        gradle_version: wrapper.gradle_version,
        gradle_distribution_url: wrapper.distribution_url,
    }
}

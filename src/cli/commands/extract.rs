//! Extract Command
//!
//! Print the catalog record for one build file.
//!
//! Usage:
//!   gradlemeta extract build.gradle.kts
//!   gradlemeta extract app/build.gradle --wrapper gradle/wrapper/gradle-wrapper.properties
//!   gradlemeta extract build.gradle --dialect merge --format yaml

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::ui::Output;
use crate::config::Config;
use crate::constants::layout::WRAPPER_PROPERTIES;
use crate::extractor::{DialectMode, GradleExtractor};
use crate::types::{GradleMetaError, Result};

pub fn run(
    config: &Config,
    build_file: &Path,
    wrapper: Option<&Path>,
    dialect: Option<DialectMode>,
    format: &str,
) -> Result<()> {
    let mut extractor = GradleExtractor::from_config(&config.extraction)?;
    if let Some(mode) = dialect {
        extractor = extractor.with_dialect_mode(mode);
    }

    if !build_file.is_file() {
        return Err(GradleMetaError::BuildFileNotFound {
            repository: build_file.display().to_string(),
        });
    }
    let build_text = std::fs::read_to_string(build_file)?;

    let wrapper_path = wrapper
        .map(Path::to_path_buf)
        .or_else(|| sibling_wrapper(build_file));
    let wrapper_text = match &wrapper_path {
        Some(path) => {
            debug!("Reading wrapper properties from {}", path.display());
            Some(std::fs::read_to_string(path)?)
        }
        None => None,
    };

    let metadata = extractor.extract(&build_text, wrapper_text.as_deref());

    if format == "text" {
        Output::new().header(&build_file.display().to_string());
        Output::new().metadata(&metadata);
    } else {
        println!("{}", render(&metadata, format)?);
    }
    Ok(())
}

/// Wrapper properties next to the build file, when present
fn sibling_wrapper(build_file: &Path) -> Option<PathBuf> {
    let dir = match build_file.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let candidate = dir.join(WRAPPER_PROPERTIES);
    candidate.is_file().then_some(candidate)
}

/// Serialize a record as json or yaml
pub fn render<T: serde::Serialize>(value: &T, format: &str) -> Result<String> {
    match format {
        "json" => Ok(serde_json::to_string_pretty(value)?),
        "yaml" => Ok(serde_yaml::to_string(value)?),
        other => Err(GradleMetaError::Config(format!(
            "Unknown format '{}'. Valid values: json, yaml, text",
            other
        ))),
    }
}

//! Scan Command
//!
//! Extract every Gradle project under a local directory.
//!
//! Usage:
//!   gradlemeta scan [PATH] [--exclude GLOB]... [-f json]

use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

use super::extract::render;
use crate::cli::ui::Output;
use crate::config::Config;
use crate::extractor::GradleExtractor;
use crate::scanner::{GradleProject, ProjectScanner};
use crate::types::{BuildMetadata, Result};

pub fn run(config: &Config, root: &Path, exclude: Vec<String>, format: &str) -> Result<()> {
    let extractor = GradleExtractor::from_config(&config.extraction)?;
    let projects = ProjectScanner::new(root).with_exclude(exclude).scan()?;
    let records = extract_projects(&extractor, root, &projects);

    if format != "text" {
        println!("{}", render(&records, format)?);
        return Ok(());
    }

    let output = Output::new();
    if records.is_empty() {
        output.warning(&format!("No Gradle projects found in {}", root.display()));
        return Ok(());
    }
    for (dir, metadata) in &records {
        output.header(dir);
        output.metadata(metadata);
    }
    output.success(&format!("Scanned {} Gradle projects", records.len()));
    Ok(())
}

/// Records keyed by project directory relative to `root` (`.` for the root)
fn extract_projects(
    extractor: &GradleExtractor,
    root: &Path,
    projects: &[GradleProject],
) -> BTreeMap<String, BuildMetadata> {
    let mut records = BTreeMap::new();

    for project in projects {
        let Some(build_file) = &project.build_file else {
            continue;
        };
        let build_text = match std::fs::read_to_string(build_file) {
            Ok(text) => text,
            Err(e) => {
                warn!("Skipping {}: {}", build_file.display(), e);
                continue;
            }
        };
        let wrapper_text = project
            .wrapper
            .as_ref()
            .and_then(|p| std::fs::read_to_string(p).ok());

        let key = match project.dir.strip_prefix(root) {
            Ok(rel) if rel.as_os_str().is_empty() => ".".to_string(),
            Ok(rel) => rel.display().to_string(),
            Err(_) => project.dir.display().to_string(),
        };
        records.insert(key, extractor.extract(&build_text, wrapper_text.as_deref()));
    }

    records
}

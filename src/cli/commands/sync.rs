//! Sync Command
//!
//! Extract every target repository and upsert the records into the catalog.
//!
//! Usage:
//!   gradlemeta sync                      # all repositories of source.organization
//!   gradlemeta sync --repo billing --repo ledger
//!   gradlemeta sync --local ~/src --dry-run -f json

use std::path::PathBuf;
use std::sync::Arc;

use super::extract::render;
use crate::catalog::PortClient;
use crate::cli::ui::Output;
use crate::config::Config;
use crate::extractor::GradleExtractor;
use crate::source::{GitHubSource, LocalSource, SourceHost};
use crate::sync::{SyncOptions, SyncPipeline, SyncReport, SyncStatus};
use crate::types::{GradleMetaError, Result};

/// Command-line overrides for a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncArgs {
    pub repositories: Vec<String>,
    pub local: Option<PathBuf>,
    pub dry_run: bool,
    pub format: String,
}

pub async fn run(config: &Config, args: SyncArgs) -> Result<()> {
    let source: Arc<dyn SourceHost> = match &args.local {
        Some(root) => Arc::new(LocalSource::new(root)),
        None => Arc::new(GitHubSource::new(&config.source)?),
    };

    let mut options = SyncOptions::from_config(config);
    options.dry_run |= args.dry_run;

    let extractor = GradleExtractor::from_config(&config.extraction)?;
    let mut pipeline = SyncPipeline::new(source, extractor, options.clone());
    if !options.dry_run {
        pipeline = pipeline.with_catalog(Arc::new(PortClient::new(&config.catalog)?));
    }

    let names = if args.repositories.is_empty() {
        config.source.repositories.clone()
    } else {
        args.repositories
    };

    let report = pipeline.run(&names).await?;
    print_report(&report, &args.format)?;

    if report.has_failures() {
        let failed: Vec<_> = report
            .repositories
            .iter()
            .filter(|r| r.status == SyncStatus::Failed)
            .map(|r| r.repository.as_str())
            .collect();
        return Err(GradleMetaError::Sync {
            repository: failed.join(", "),
            reason: format!(
                "{} of {} repositories failed",
                report.failed(),
                report.repositories.len()
            ),
        });
    }
    Ok(())
}

fn print_report(report: &SyncReport, format: &str) -> Result<()> {
    if format != "text" {
        println!("{}", render(report, format)?);
        return Ok(());
    }

    let output = Output::new();
    output.header("Gradle metadata sync");
    for entry in &report.repositories {
        output.repository(entry);
    }
    output.sync_summary(report);
    Ok(())
}

use console::style;

use crate::sync::{RepositoryReport, SyncReport, SyncStatus};
use crate::types::BuildMetadata;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    pub fn header(&self, message: &str) {
        println!("\n{}", style(message).bold().underlined());
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Human-readable rendering of one extracted record
    pub fn metadata(&self, metadata: &BuildMetadata) {
        self.section("Plugins");
        if metadata.plugins.is_empty() {
            println!("  {}", style("(none)").dim());
        }
        for (name, version) in &metadata.plugins {
            println!("  {}  {}", style(name).cyan(), version);
        }

        self.section("Dependencies");
        if metadata.dependencies.is_empty() {
            println!("  {}", style("(none)").dim());
        }
        for (coordinate, version) in &metadata.dependencies {
            match version {
                Some(v) => println!("  {}  {}", style(coordinate).cyan(), v),
                None => println!(
                    "  {}  {}",
                    style(coordinate).cyan(),
                    style("unresolved").yellow()
                ),
            }
        }

        self.section("Gradle");
        println!(
            "  version       {}",
            metadata.gradle_version.as_deref().unwrap_or("-")
        );
        println!(
            "  distribution  {}",
            metadata.gradle_distribution_url.as_deref().unwrap_or("-")
        );
    }

    pub fn repository(&self, entry: &RepositoryReport) {
        let marker = match entry.status {
            SyncStatus::Synced => style("✓").green(),
            SyncStatus::DryRun => style("○").blue(),
            SyncStatus::Skipped => style("-").dim(),
            SyncStatus::Failed => style("✗").red(),
        };
        let detail = match (&entry.build_file, &entry.detail) {
            (_, Some(detail)) => detail.clone(),
            (Some(file), None) => file.clone(),
            (None, None) => String::new(),
        };
        println!(
            "{} {:<32} {:<8} {}",
            marker,
            entry.repository,
            entry.status.to_string(),
            style(detail).dim()
        );
    }

    pub fn sync_summary(&self, report: &SyncReport) {
        self.section("Summary");
        println!("  Synced:  {}", report.synced());
        println!("  Skipped: {}", report.skipped());
        println!("  Failed:  {}", report.failed());
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

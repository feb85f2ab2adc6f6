use serde::Serialize;

use crate::types::BuildMetadata;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Extracted and upserted
    Synced,
    /// Extracted, upsert suppressed
    DryRun,
    /// Nothing to extract
    Skipped,
    Failed,
}

impl std::fmt::Display for SyncStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Synced => write!(f, "synced"),
            Self::DryRun => write!(f, "dry-run"),
            Self::Skipped => write!(f, "skipped"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Result for a single repository
#[derive(Debug, Clone, Serialize)]
pub struct RepositoryReport {
    pub repository: String,
    pub status: SyncStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<BuildMetadata>,
    /// Skip reason or error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl RepositoryReport {
    pub fn extracted(
        repository: &str,
        status: SyncStatus,
        build_file: Option<String>,
        metadata: BuildMetadata,
    ) -> Self {
        Self {
            repository: repository.to_string(),
            status,
            build_file,
            metadata: Some(metadata),
            detail: None,
        }
    }

    pub fn skipped(repository: &str, reason: impl Into<String>) -> Self {
        Self {
            repository: repository.to_string(),
            status: SyncStatus::Skipped,
            build_file: None,
            metadata: None,
            detail: Some(reason.into()),
        }
    }

    pub fn failed(repository: &str, error: impl Into<String>) -> Self {
        Self {
            repository: repository.to_string(),
            status: SyncStatus::Failed,
            build_file: None,
            metadata: None,
            detail: Some(error.into()),
        }
    }
}

/// Outcome of one sync run, in processing order
#[derive(Debug, Clone, Default, Serialize)]
pub struct SyncReport {
    pub repositories: Vec<RepositoryReport>,
}

impl SyncReport {
    pub fn push(&mut self, entry: RepositoryReport) {
        self.repositories.push(entry);
    }

    fn count(&self, status: SyncStatus) -> usize {
        self.repositories
            .iter()
            .filter(|r| r.status == status)
            .count()
    }

    /// Repositories extracted, whether or not the upsert was suppressed
    pub fn synced(&self) -> usize {
        self.count(SyncStatus::Synced) + self.count(SyncStatus::DryRun)
    }

    pub fn skipped(&self) -> usize {
        self.count(SyncStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(SyncStatus::Failed)
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }
}

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

use super::{Repository, SourceHost};
use crate::types::{ErrorCategory, GradleMetaError, Result};

const SERVICE: &str = "local";

/// A directory whose immediate subdirectories are repositories
#[derive(Debug, Clone)]
pub struct LocalSource {
    root: PathBuf,
}

impl LocalSource {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn repository_from_dir(&self, dir: &Path) -> Option<Repository> {
        let name = dir.file_name()?.to_str()?.to_string();
        let mut repo = Repository::new(name, dir.to_string_lossy());
        repo.url = Some(format!("file://{}", dir.display()));
        Some(repo)
    }
}

/// Reject paths that would escape the repository directory
fn is_relative_inside(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[async_trait]
impl SourceHost for LocalSource {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let mut entries = tokio::fs::read_dir(&self.root).await?;
        let mut repos = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let hidden = entry.file_name().to_string_lossy().starts_with('.');
            if hidden || !entry.file_type().await?.is_dir() {
                continue;
            }
            if let Some(repo) = self.repository_from_dir(&path) {
                repos.push(repo);
            }
        }

        repos.sort_by(|a, b| a.name.cmp(&b.name));
        debug!("Found {} local repositories in {}", repos.len(), self.root.display());
        Ok(repos)
    }

    async fn repository(&self, name: &str) -> Result<Repository> {
        let dir = self.root.join(name);
        if !is_relative_inside(Path::new(name)) || !dir.is_dir() {
            return Err(GradleMetaError::remote(
                ErrorCategory::NotFound,
                SERVICE,
                format!("Repository not found: {}", dir.display()),
            ));
        }
        self.repository_from_dir(&dir).ok_or_else(|| {
            GradleMetaError::remote(
                ErrorCategory::BadRequest,
                SERVICE,
                format!("Invalid repository name: {}", name),
            )
        })
    }

    async fn read_file(&self, repo: &Repository, path: &str) -> Result<Option<String>> {
        if !is_relative_inside(Path::new(path)) {
            return Err(GradleMetaError::remote(
                ErrorCategory::BadRequest,
                SERVICE,
                format!("Path escapes repository: {}", path),
            ));
        }

        let file = Path::new(&repo.full_name).join(path);
        match tokio::fs::read_to_string(&file).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

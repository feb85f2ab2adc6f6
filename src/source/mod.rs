//! Source Hosts
//!
//! Where build files come from. A host lists repositories and reads single
//! files by path; it never interprets them.
//!
//! - [`GitHubSource`]: repositories of a GitHub organization over REST
//! - [`LocalSource`]: a directory of checked-out repositories

mod github;
mod local;

pub use github::GitHubSource;
pub use local::LocalSource;

use async_trait::async_trait;
use serde::Serialize;

use crate::types::Result;

/// One repository on a source host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Repository {
    /// Short name, used as the catalog identifier
    pub name: String,
    /// `owner/name` on hosted sources, the directory path locally
    pub full_name: String,
    pub default_branch: Option<String>,
    pub archived: bool,
    pub url: Option<String>,
}

impl Repository {
    pub fn new(name: impl Into<String>, full_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            full_name: full_name.into(),
            default_branch: None,
            archived: false,
            url: None,
        }
    }
}

/// Read access to repositories holding Gradle builds
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Host name for logging and error attribution
    fn name(&self) -> &str;

    /// Every active (non-archived) repository
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    /// Look up one repository by short name
    async fn repository(&self, name: &str) -> Result<Repository>;

    /// File content at `path` on the default branch; `None` when absent
    async fn read_file(&self, repo: &Repository, path: &str) -> Result<Option<String>>;
}

//! GitHub REST source host.
//!
//! Reads files through the contents API with the raw media type, so build
//! scripts arrive as plain text rather than base64 JSON.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};
use url::Url;

use super::{Repository, SourceHost};
use crate::config::SourceConfig;
use crate::constants::network;
use crate::constants::source::{PAGE_SIZE, RAW_MEDIA_TYPE};
use crate::types::{ErrorCategory, ErrorClassifier, GradleMetaError, Result};

const SERVICE: &str = "github";
const API_VERSION: &str = "2022-11-28";

/// Repositories of one GitHub organization
pub struct GitHubSource {
    /// Token stored securely - never exposed in logs or debug output
    token: Option<SecretString>,
    api_base: Url,
    organization: String,
    client: reqwest::Client,
}

impl std::fmt::Debug for GitHubSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubSource")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .field("api_base", &self.api_base.as_str())
            .field("organization", &self.organization)
            .finish()
    }
}

impl GitHubSource {
    pub fn new(config: &SourceConfig) -> Result<Self> {
        let organization = config.organization.clone().ok_or_else(|| {
            GradleMetaError::Config(
                "GitHub organization not set. Set GITHUB_ORG or source.organization".to_string(),
            )
        })?;

        let api_base = Url::parse(&config.api_base).map_err(|e| {
            GradleMetaError::Config(format!("Invalid source.api_base '{}': {}", config.api_base, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                GradleMetaError::remote(
                    ErrorCategory::Unknown,
                    SERVICE,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            token: config.token.clone().map(SecretString::from),
            api_base,
            organization,
            client,
        })
    }

    /// API URL for the given path segments; segments are percent-encoded
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GradleMetaError::Config(format!(
                    "source.api_base cannot be a base URL: {}",
                    self.api_base
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn repos_url(&self, page: usize) -> Result<Url> {
        let mut url = self.endpoint(["orgs", self.organization.as_str(), "repos"])?;
        url.query_pairs_mut()
            .append_pair("per_page", &PAGE_SIZE.to_string())
            .append_pair("page", &page.to_string());
        Ok(url)
    }

    fn contents_url(&self, repo: &Repository, path: &str) -> Result<Url> {
        let (owner, name) = repo
            .full_name
            .split_once('/')
            .unwrap_or((self.organization.as_str(), repo.name.as_str()));
        let segments = ["repos", owner, name, "contents"]
            .into_iter()
            .chain(path.split('/').filter(|s| !s.is_empty()));
        self.endpoint(segments)
    }

    async fn get(&self, url: Url, accept: &str) -> Result<reqwest::Response> {
        debug!("GET {}", url);
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, accept)
            .header(USER_AGENT, network::USER_AGENT)
            .header("X-GitHub-Api-Version", API_VERSION);

        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()));
        }

        request
            .send()
            .await
            .map_err(|e| ErrorClassifier::classify_reqwest(&e, SERVICE).into())
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, url: Url) -> Result<T> {
        let response = self.get(url, "application/vnd.github+json").await?;
        let response = check_status(response).await?;
        response
            .json()
            .await
            .map_err(|e| ErrorClassifier::classify_reqwest(&e, SERVICE).into())
    }
}

/// Turn a non-success response into a classified error
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.message)
        .unwrap_or(body);
    Err(ErrorClassifier::classify_http_status(status.as_u16(), &message, SERVICE).into())
}

#[async_trait]
impl SourceHost for GitHubSource {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let mut repos = Vec::new();
        let mut page = 1;

        loop {
            let batch: Vec<RepoResponse> = self.get_json(self.repos_url(page)?).await?;
            let count = batch.len();
            repos.extend(
                batch
                    .into_iter()
                    .filter(|r| !r.archived)
                    .map(Repository::from),
            );
            if count < PAGE_SIZE {
                break;
            }
            page += 1;
        }

        info!(
            "Listed {} active repositories in {}",
            repos.len(),
            self.organization
        );
        Ok(repos)
    }

    async fn repository(&self, name: &str) -> Result<Repository> {
        let url = self.endpoint(["repos", self.organization.as_str(), name])?;
        let repo: RepoResponse = self.get_json(url).await?;
        Ok(repo.into())
    }

    async fn read_file(&self, repo: &Repository, path: &str) -> Result<Option<String>> {
        let response = self.get(self.contents_url(repo, path)?, RAW_MEDIA_TYPE).await?;
        if response.status() == StatusCode::NOT_FOUND {
            debug!("{} not found in {}", path, repo.full_name);
            return Ok(None);
        }
        let response = check_status(response).await?;
        let content = response
            .text()
            .await
            .map_err(|e| GradleMetaError::from(ErrorClassifier::classify_reqwest(&e, SERVICE)))?;
        Ok(Some(content))
    }
}

// =============================================================================
// API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct RepoResponse {
    name: String,
    full_name: String,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    archived: bool,
    #[serde(default)]
    html_url: Option<String>,
}

impl From<RepoResponse> for Repository {
    fn from(r: RepoResponse) -> Self {
        Self {
            name: r.name,
            full_name: r.full_name,
            default_branch: r.default_branch,
            archived: r.archived,
            url: r.html_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SourceConfig {
        SourceConfig {
            organization: Some("acme".to_string()),
            token: Some("ghp_secret".to_string()),
            ..SourceConfig::default()
        }
    }

    #[test]
    fn test_requires_organization() {
        let err = GitHubSource::new(&SourceConfig::default()).unwrap_err();
        assert!(matches!(err, GradleMetaError::Config(_)));
    }

    #[test]
    fn test_repos_url() {
        let source = GitHubSource::new(&config()).unwrap();
        assert_eq!(
            source.repos_url(2).unwrap().as_str(),
            "https://api.github.com/orgs/acme/repos?per_page=100&page=2"
        );
    }

    #[test]
    fn test_contents_url_with_enterprise_base() {
        let mut config = config();
        config.api_base = "https://ghe.example.com/api/v3/".to_string();
        let source = GitHubSource::new(&config).unwrap();
        let repo = Repository::new("billing", "acme/billing");

        assert_eq!(
            source
                .contents_url(&repo, "gradle/wrapper/gradle-wrapper.properties")
                .unwrap()
                .as_str(),
            "https://ghe.example.com/api/v3/repos/acme/billing/contents/gradle/wrapper/gradle-wrapper.properties"
        );
    }

    #[test]
    fn test_repo_response_mapping() {
        let json = r#"{
            "name": "billing",
            "full_name": "acme/billing",
            "default_branch": "main",
            "archived": false,
            "html_url": "https://github.com/acme/billing",
            "private": true
        }"#;
        let repo: Repository = serde_json::from_str::<RepoResponse>(json).unwrap().into();
        assert_eq!(repo.name, "billing");
        assert_eq!(repo.default_branch.as_deref(), Some("main"));
        assert!(!repo.archived);
    }

    #[test]
    fn test_debug_redacts_token() {
        let source = GitHubSource::new(&config()).unwrap();
        let debug = format!("{:?}", source);
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}

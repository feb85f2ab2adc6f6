//! Catalog Sync Pipeline
//!
//! For each target repository: read the first build script present and the
//! wrapper properties, run the extractor, and upsert one catalog entity named
//! after the repository. Repositories are processed one at a time and each
//! remote call is awaited before the next.
//!
//! ## Failure policy
//!
//! - Authentication errors abort the run (every later call would fail too)
//! - Any other error is recorded against its repository and the run continues
//! - Retryable errors (rate limit, network, transient) are retried with
//!   exponential backoff up to `sync.max_retries` times

mod report;

pub use report::{RepositoryReport, SyncReport, SyncStatus};

use backon::{ExponentialBuilder, Retryable};
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::catalog::CatalogClient;
use crate::config::Config;
use crate::constants::network;
use crate::extractor::{GradleExtractor, assemble, extract_wrapper};
use crate::source::{Repository, SourceHost};
use crate::types::{BuildMetadata, ErrorCategory, GradleMetaError, Result};

/// Sync behavior, resolved from configuration
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub blueprint: String,
    pub repository_relation: Option<String>,
    pub build_files: Vec<String>,
    pub wrapper_properties: String,
    pub max_retries: u32,
    pub retry_delay: Duration,
    pub dry_run: bool,
    pub include_wrapper_only: bool,
}

impl SyncOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            blueprint: config.catalog.blueprint.clone(),
            repository_relation: config.catalog.repository_relation.clone(),
            build_files: config.source.build_files.clone(),
            wrapper_properties: config.source.wrapper_properties.clone(),
            max_retries: config.sync.max_retries,
            retry_delay: Duration::from_millis(network::BASE_DELAY_MS),
            dry_run: config.sync.dry_run,
            include_wrapper_only: config.sync.include_wrapper_only,
        }
    }
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// What happened to one repository when it did not fail
enum Outcome {
    Extracted {
        build_file: Option<String>,
        metadata: BuildMetadata,
    },
    Skipped(String),
}

pub struct SyncPipeline {
    source: Arc<dyn SourceHost>,
    catalog: Option<Arc<dyn CatalogClient>>,
    extractor: GradleExtractor,
    options: SyncOptions,
}

impl SyncPipeline {
    pub fn new(source: Arc<dyn SourceHost>, extractor: GradleExtractor, options: SyncOptions) -> Self {
        Self {
            source,
            catalog: None,
            extractor,
            options,
        }
    }

    /// Without a catalog the pipeline only extracts, as in a dry run
    pub fn with_catalog(mut self, catalog: Arc<dyn CatalogClient>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    fn upserts_enabled(&self) -> bool {
        !self.options.dry_run && self.catalog.is_some()
    }

    /// Sync the named repositories, or every repository when `names` is empty
    pub async fn run(&self, names: &[String]) -> Result<SyncReport> {
        let mut report = SyncReport::default();

        let repositories = if names.is_empty() {
            self.retry(|| self.source.list_repositories()).await?
        } else {
            let mut repos = Vec::with_capacity(names.len());
            for name in names {
                match self.retry(|| self.source.repository(name)).await {
                    Ok(repo) => repos.push(repo),
                    Err(e) if is_fatal(&e) => return Err(e),
                    Err(e) => {
                        warn!("Cannot resolve repository {}: {}", name, e);
                        report.push(RepositoryReport::failed(name, e.to_string()));
                    }
                }
            }
            repos
        };

        info!(
            "Syncing {} repositories from {} (dry run: {})",
            repositories.len(),
            self.source.name(),
            !self.upserts_enabled()
        );

        for repo in &repositories {
            match self.sync_repository(repo).await {
                Ok(Outcome::Extracted {
                    build_file,
                    metadata,
                }) => {
                    let status = if self.upserts_enabled() {
                        SyncStatus::Synced
                    } else {
                        SyncStatus::DryRun
                    };
                    report.push(RepositoryReport::extracted(
                        &repo.name, status, build_file, metadata,
                    ));
                }
                Ok(Outcome::Skipped(reason)) => {
                    info!("Skipping {}: {}", repo.name, reason);
                    report.push(RepositoryReport::skipped(&repo.name, reason));
                }
                Err(e) if is_fatal(&e) => return Err(e),
                Err(e) => {
                    warn!("Failed to sync {}: {}", repo.name, e);
                    report.push(RepositoryReport::failed(&repo.name, e.to_string()));
                }
            }
        }

        info!(
            "Sync finished: {} synced, {} skipped, {} failed",
            report.synced(),
            report.skipped(),
            report.failed()
        );
        Ok(report)
    }

    async fn sync_repository(&self, repo: &Repository) -> Result<Outcome> {
        let build = self.read_build_file(repo).await?;
        let wrapper_text = self
            .retry(|| self.source.read_file(repo, &self.options.wrapper_properties))
            .await?;
        let wrapper = wrapper_text.as_deref().map(extract_wrapper).unwrap_or_default();

        let (build_file, script) = match build {
            Some((path, text)) => (Some(path), Some(self.extractor.extract_build_script(&text))),
            None if self.options.include_wrapper_only && !wrapper.is_empty() => (None, None),
            None => return Ok(Outcome::Skipped("no Gradle build file".to_string())),
        };

        let metadata = assemble(script, wrapper);
        let unresolved: Vec<_> = metadata.unresolved_dependencies().collect();
        if !unresolved.is_empty() {
            warn!(
                "{} has dependencies with unresolved versions: {}",
                repo.name,
                unresolved.join(", ")
            );
        }
        debug!(
            repository = %repo.name,
            plugins = metadata.plugins.len(),
            dependencies = metadata.dependencies.len(),
            gradle_version = ?metadata.gradle_version,
            "Extracted metadata"
        );

        if let Some(catalog) = self.catalog.as_ref().filter(|_| !self.options.dry_run) {
            let relations = self.relations(repo);
            self.retry(|| {
                catalog.upsert_entity(
                    &self.options.blueprint,
                    &repo.name,
                    &metadata,
                    relations.as_ref(),
                )
            })
            .await?;
        }

        Ok(Outcome::Extracted {
            build_file,
            metadata,
        })
    }

    /// First configured build file that exists, with its content
    async fn read_build_file(&self, repo: &Repository) -> Result<Option<(String, String)>> {
        for path in &self.options.build_files {
            if let Some(text) = self.retry(|| self.source.read_file(repo, path)).await? {
                debug!("Using {} for {}", path, repo.name);
                return Ok(Some((path.clone(), text)));
            }
        }
        Ok(None)
    }

    fn relations(&self, repo: &Repository) -> Option<BTreeMap<String, String>> {
        self.options
            .repository_relation
            .as_ref()
            .map(|relation| BTreeMap::from([(relation.clone(), repo.name.clone())]))
    }

    /// Run `call`, retrying retryable errors with exponential backoff
    async fn retry<T, F, Fut>(&self, call: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.options.retry_delay)
            .with_max_delay(Duration::from_secs(network::MAX_DELAY_SECS))
            .with_max_times(self.options.max_retries as usize);

        call.retry(backoff)
            .when(|e: &GradleMetaError| e.is_retryable())
            .notify(|e: &GradleMetaError, delay: Duration| {
                warn!("Retrying in {:?} after error: {}", delay, e);
            })
            .await
    }
}

fn is_fatal(err: &GradleMetaError) -> bool {
    err.category() == Some(ErrorCategory::Auth)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RemoteError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    const BUILD: &str = r#"
def springVersion = '6.1.2'
plugins {
    id 'java'
    id 'org.springframework.boot' version '3.2.1'
}
dependencies {
    implementation "org.springframework:spring-core:$springVersion"
    implementation 'com.google.guava:guava:33.0.0-jre'
}
"#;

    const WRAPPER: &str = "distributionUrl=https\\://services.gradle.org/distributions/gradle-8.5-bin.zip\n";

    #[derive(Default)]
    struct FakeSource {
        files: HashMap<String, HashMap<String, String>>,
    }

    impl FakeSource {
        fn with_file(mut self, repo: &str, path: &str, content: &str) -> Self {
            self.files
                .entry(repo.to_string())
                .or_default()
                .insert(path.to_string(), content.to_string());
            self
        }

        fn with_repo(mut self, repo: &str) -> Self {
            self.files.entry(repo.to_string()).or_default();
            self
        }
    }

    #[async_trait]
    impl SourceHost for FakeSource {
        fn name(&self) -> &str {
            "fake"
        }

        async fn list_repositories(&self) -> Result<Vec<Repository>> {
            let mut names: Vec<_> = self.files.keys().cloned().collect();
            names.sort();
            Ok(names
                .into_iter()
                .map(|n| Repository::new(n.clone(), format!("acme/{}", n)))
                .collect())
        }

        async fn repository(&self, name: &str) -> Result<Repository> {
            if self.files.contains_key(name) {
                Ok(Repository::new(name, format!("acme/{}", name)))
            } else {
                Err(GradleMetaError::remote(ErrorCategory::NotFound, "fake", name))
            }
        }

        async fn read_file(&self, repo: &Repository, path: &str) -> Result<Option<String>> {
            Ok(self
                .files
                .get(&repo.name)
                .and_then(|files| files.get(path))
                .cloned())
        }
    }

    type Upsert = (String, String, BuildMetadata, Option<BTreeMap<String, String>>);

    #[derive(Default)]
    struct FakeCatalog {
        upserts: Mutex<Vec<Upsert>>,
        /// Errors returned before calls start succeeding
        failures: Mutex<Vec<ErrorCategory>>,
        calls: AtomicU32,
    }

    impl FakeCatalog {
        fn failing(categories: Vec<ErrorCategory>) -> Self {
            Self {
                failures: Mutex::new(categories),
                ..Self::default()
            }
        }

        fn upserts(&self) -> Vec<Upsert> {
            self.upserts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CatalogClient for FakeCatalog {
        fn name(&self) -> &str {
            "fake"
        }

        async fn upsert_entity(
            &self,
            blueprint: &str,
            identifier: &str,
            properties: &BuildMetadata,
            relations: Option<&BTreeMap<String, String>>,
        ) -> Result<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let failure = {
                let mut failures = self.failures.lock().unwrap();
                (!failures.is_empty()).then(|| failures.remove(0))
            };
            if let Some(category) = failure {
                return Err(RemoteError::new(category, "fake", "injected").into());
            }
            self.upserts.lock().unwrap().push((
                blueprint.to_string(),
                identifier.to_string(),
                properties.clone(),
                relations.cloned(),
            ));
            Ok(())
        }
    }

    fn options() -> SyncOptions {
        SyncOptions {
            retry_delay: Duration::from_millis(1),
            ..SyncOptions::default()
        }
    }

    fn pipeline(source: FakeSource, catalog: Arc<FakeCatalog>, options: SyncOptions) -> SyncPipeline {
        SyncPipeline::new(Arc::new(source), GradleExtractor::default(), options)
            .with_catalog(catalog)
    }

    #[tokio::test]
    async fn test_upserts_one_entity_per_repository() {
        let source = FakeSource::default()
            .with_file("billing", "build.gradle", BUILD)
            .with_file("billing", "gradle/wrapper/gradle-wrapper.properties", WRAPPER)
            .with_file("docs", "README.md", "# docs");
        let catalog = Arc::new(FakeCatalog::default());

        let report = pipeline(source, catalog.clone(), options())
            .run(&[])
            .await
            .unwrap();

        assert_eq!(report.synced(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 0);

        let upserts = catalog.upserts();
        assert_eq!(upserts.len(), 1);
        let (blueprint, identifier, metadata, relations) = &upserts[0];
        assert_eq!(blueprint, "service");
        assert_eq!(identifier, "billing");
        assert_eq!(metadata.plugins["java"], "No version specified");
        assert_eq!(
            metadata.dependencies["org.springframework:spring-core"].as_deref(),
            Some("6.1.2")
        );
        assert_eq!(metadata.gradle_version.as_deref(), Some("8.5"));
        assert!(relations.is_none());
    }

    #[tokio::test]
    async fn test_kotlin_script_preferred() {
        let source = FakeSource::default()
            .with_file("api", "build.gradle.kts", "plugins {\n    id(\"application\")\n}\n")
            .with_file("api", "build.gradle", BUILD);
        let catalog = Arc::new(FakeCatalog::default());

        let report = pipeline(source, catalog.clone(), options())
            .run(&[])
            .await
            .unwrap();

        assert_eq!(report.repositories[0].build_file.as_deref(), Some("build.gradle.kts"));
        let (_, _, metadata, _) = &catalog.upserts()[0];
        assert!(metadata.plugins.contains_key("application"));
        assert!(!metadata.plugins.contains_key("java"));
    }

    #[tokio::test]
    async fn test_dry_run_skips_upsert() {
        let source = FakeSource::default().with_file("billing", "build.gradle", BUILD);
        let catalog = Arc::new(FakeCatalog::default());
        let options = SyncOptions {
            dry_run: true,
            ..options()
        };

        let report = pipeline(source, catalog.clone(), options)
            .run(&[])
            .await
            .unwrap();

        assert!(catalog.upserts().is_empty());
        assert_eq!(report.repositories[0].status, SyncStatus::DryRun);
        assert!(report.repositories[0].metadata.is_some());
    }

    #[tokio::test]
    async fn test_unresolved_version_still_synced() {
        let build = "dependencies {\n    implementation \"com.acme:core:$coreVersion\"\n}\n";
        let source = FakeSource::default().with_file("billing", "build.gradle", build);
        let catalog = Arc::new(FakeCatalog::default());

        let report = pipeline(source, catalog.clone(), options())
            .run(&[])
            .await
            .unwrap();

        assert_eq!(report.synced(), 1);
        let (_, _, metadata, _) = &catalog.upserts()[0];
        assert_eq!(metadata.dependencies["com.acme:core"], None);
        let unresolved: Vec<_> = metadata.unresolved_dependencies().collect();
        assert_eq!(unresolved, vec!["com.acme:core"]);
    }

    #[tokio::test]
    async fn test_wrapper_only_repository() {
        let source = FakeSource::default().with_file(
            "tools",
            "gradle/wrapper/gradle-wrapper.properties",
            WRAPPER,
        );

        let catalog = Arc::new(FakeCatalog::default());
        let report = pipeline(source, catalog.clone(), options())
            .run(&[])
            .await
            .unwrap();
        assert_eq!(report.skipped(), 1);

        let source = FakeSource::default().with_file(
            "tools",
            "gradle/wrapper/gradle-wrapper.properties",
            WRAPPER,
        );
        let options = SyncOptions {
            include_wrapper_only: true,
            ..options()
        };
        let report = pipeline(source, catalog.clone(), options)
            .run(&[])
            .await
            .unwrap();
        assert_eq!(report.synced(), 1);
        let (_, _, metadata, _) = &catalog.upserts()[0];
        assert!(metadata.plugins.is_empty());
        assert_eq!(metadata.gradle_version.as_deref(), Some("8.5"));
    }

    #[tokio::test]
    async fn test_named_repositories_and_relations() {
        let source = FakeSource::default()
            .with_file("billing", "build.gradle", BUILD)
            .with_file("ledger", "build.gradle", BUILD);
        let catalog = Arc::new(FakeCatalog::default());
        let options = SyncOptions {
            repository_relation: Some("repository".to_string()),
            ..options()
        };

        let names = vec!["ledger".to_string(), "missing".to_string()];
        let report = pipeline(source, catalog.clone(), options)
            .run(&names)
            .await
            .unwrap();

        assert_eq!(report.synced(), 1);
        assert_eq!(report.failed(), 1);
        let upserts = catalog.upserts();
        assert_eq!(upserts[0].1, "ledger");
        assert_eq!(
            upserts[0].3.as_ref().unwrap()["repository"],
            "ledger".to_string()
        );
    }

    #[tokio::test]
    async fn test_transient_error_retried() {
        let source = FakeSource::default().with_file("billing", "build.gradle", BUILD);
        let catalog = Arc::new(FakeCatalog::failing(vec![
            ErrorCategory::Transient,
            ErrorCategory::RateLimit,
        ]));
        let options = SyncOptions {
            max_retries: 2,
            ..options()
        };

        let report = pipeline(source, catalog.clone(), options)
            .run(&[])
            .await
            .unwrap();

        assert_eq!(report.synced(), 1);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_no_retry_by_default() {
        let source = FakeSource::default()
            .with_file("billing", "build.gradle", BUILD)
            .with_file("ledger", "build.gradle", BUILD);
        let catalog = Arc::new(FakeCatalog::failing(vec![ErrorCategory::Transient]));

        let report = pipeline(source, catalog.clone(), options())
            .run(&[])
            .await
            .unwrap();

        assert_eq!(report.failed(), 1);
        assert_eq!(report.synced(), 1);
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_auth_error_aborts() {
        let source = FakeSource::default()
            .with_file("billing", "build.gradle", BUILD)
            .with_file("ledger", "build.gradle", BUILD);
        let catalog = Arc::new(FakeCatalog::failing(vec![ErrorCategory::Auth]));
        let options = SyncOptions {
            max_retries: 3,
            ..options()
        };

        let err = pipeline(source, catalog.clone(), options)
            .run(&[])
            .await
            .unwrap_err();

        assert_eq!(err.category(), Some(ErrorCategory::Auth));
        assert_eq!(catalog.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_without_catalog_only_extracts() {
        let source = FakeSource::default()
            .with_repo("empty")
            .with_file("billing", "build.gradle", BUILD);

        let report = SyncPipeline::new(Arc::new(source), GradleExtractor::default(), options())
            .run(&[])
            .await
            .unwrap();

        assert_eq!(report.repositories.len(), 2);
        assert_eq!(report.repositories[0].status, SyncStatus::DryRun);
        assert_eq!(report.repositories[1].status, SyncStatus::Skipped);
    }
}

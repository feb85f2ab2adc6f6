//! Port REST catalog client.
//!
//! Authenticates with client credentials and caches the access token for the
//! lifetime of the client. An authentication failure drops the cached token
//! so the next call fetches a fresh one.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info};
use url::Url;

use super::CatalogClient;
use crate::config::CatalogConfig;
use crate::constants::network;
use crate::types::{BuildMetadata, ErrorCategory, ErrorClassifier, GradleMetaError, Result};

const SERVICE: &str = "port";

pub struct PortClient {
    client_id: String,
    /// Client secret stored securely - never exposed in logs or debug output
    client_secret: SecretString,
    api_base: Url,
    access_token: Mutex<Option<SecretString>>,
    client: reqwest::Client,
}

impl std::fmt::Debug for PortClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortClient")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

impl PortClient {
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let (Some(client_id), Some(client_secret)) =
            (config.client_id.clone(), config.client_secret.clone())
        else {
            return Err(GradleMetaError::Config(
                "Port credentials not found. Set PORT_CLIENT_ID and PORT_CLIENT_SECRET".to_string(),
            ));
        };

        let api_base = Url::parse(&config.api_base).map_err(|e| {
            GradleMetaError::Config(format!(
                "Invalid catalog.api_base '{}': {}",
                config.api_base, e
            ))
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
            client_id,
            client_secret: SecretString::from(client_secret),
            api_base,
            access_token: Mutex::new(None),
            client,
        })
    }

    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| {
                GradleMetaError::Config(format!(
                    "catalog.api_base cannot be a base URL: {}",
                    self.api_base
                ))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn entities_url(&self, blueprint: &str) -> Result<Url> {
        let mut url = self.endpoint(["blueprints", blueprint, "entities"])?;
        url.query_pairs_mut()
            .append_pair("upsert", "true")
            .append_pair("merge", "true");
        Ok(url)
    }

    /// Cached access token, fetched on first use
    async fn access_token(&self) -> Result<SecretString> {
        let mut cached = self.access_token.lock().await;
        if let Some(token) = cached.as_ref() {
            return Ok(SecretString::from(token.expose_secret().to_string()));
        }

        debug!("Requesting Port access token");
        let request = TokenRequest {
            client_id: &self.client_id,
            client_secret: self.client_secret.expose_secret(),
        };
        let response = self
            .client
            .post(self.endpoint(["auth", "access_token"])?)
            .header(USER_AGENT, network::USER_AGENT)
            .json(&request)
            .send()
            .await
            .map_err(|e| GradleMetaError::from(ErrorClassifier::classify_reqwest(&e, SERVICE)))?;

        let body: TokenResponse = check_status(response)
            .await?
            .json()
            .await
            .map_err(|e| GradleMetaError::from(ErrorClassifier::classify_reqwest(&e, SERVICE)))?;

        *cached = Some(SecretString::from(body.access_token.clone()));
        Ok(SecretString::from(body.access_token))
    }

    async fn invalidate_token(&self) {
        *self.access_token.lock().await = None;
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
        .ok()
        .and_then(|b| b.message)
        .unwrap_or(body);
    Err(ErrorClassifier::classify_http_status(status.as_u16(), &message, SERVICE).into())
}

#[async_trait]
impl CatalogClient for PortClient {
    fn name(&self) -> &str {
        SERVICE
    }

    async fn upsert_entity(
        &self,
        blueprint: &str,
        identifier: &str,
        properties: &BuildMetadata,
        relations: Option<&BTreeMap<String, String>>,
    ) -> Result<()> {
        let token = self.access_token().await?;
        let entity = EntityRequest {
            identifier,
            title: identifier,
            properties,
            relations,
        };

        let response = self
            .client
            .post(self.entities_url(blueprint)?)
            .header(AUTHORIZATION, format!("Bearer {}", token.expose_secret()))
            .header(USER_AGENT, network::USER_AGENT)
            .json(&entity)
            .send()
            .await
            .map_err(|e| GradleMetaError::from(ErrorClassifier::classify_reqwest(&e, SERVICE)))?;

        if let Err(e) = check_status(response).await {
            if e.category() == Some(ErrorCategory::Auth) {
                self.invalidate_token().await;
            }
            return Err(e);
        }

        info!("Upserted {}/{}", blueprint, identifier);
        Ok(())
    }
}

// =============================================================================
// API Types
// =============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TokenRequest<'a> {
    client_id: &'a str,
    client_secret: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct EntityRequest<'a> {
    identifier: &'a str,
    title: &'a str,
    properties: &'a BuildMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    relations: Option<&'a BTreeMap<String, String>>,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: Option<String>,
}

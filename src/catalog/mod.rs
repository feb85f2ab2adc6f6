//! Catalog Clients
//!
//! Destination of extracted records. An upsert creates the entity or replaces
//! its properties when the identifier already exists.

mod port;

pub use port::PortClient;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::types::{BuildMetadata, Result};

#[async_trait]
pub trait CatalogClient: Send + Sync {
    fn name(&self) -> &str;

    /// Create or replace the entity `identifier` of type `blueprint`
    async fn upsert_entity(
        &self,
        blueprint: &str,
        identifier: &str,
        properties: &BuildMetadata,
        relations: Option<&BTreeMap<String, String>>,
    ) -> Result<()>;
}

pub mod error;
pub mod metadata;

pub use error::{ErrorCategory, ErrorClassifier, GradleMetaError, RemoteError, Result};
pub use metadata::BuildMetadata;

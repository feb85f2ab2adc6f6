//! Local Gradle project discovery

mod project_scanner;

pub use project_scanner::{GradleProject, ProjectScanner};

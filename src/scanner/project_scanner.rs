use ignore::WalkBuilder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::layout::{SKIP_DIRS, WRAPPER_PROPERTIES};
use crate::extractor::BuildFileKind;
use crate::types::Result;

/// Default maximum build file size (1MB)
const DEFAULT_MAX_FILE_SIZE: u64 = 1_048_576;

/// Finds Gradle projects (directories holding a build script) in a local tree
pub struct ProjectScanner {
    root: PathBuf,
    exclude: Vec<String>,
    max_file_size: u64,
}

impl ProjectScanner {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let exclude = SKIP_DIRS.iter().map(|d| format!("**/{}/**", d)).collect();
        Self {
            root: root.as_ref().to_path_buf(),
            exclude,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    pub fn with_exclude(mut self, patterns: Vec<String>) -> Self {
        self.exclude.extend(patterns);
        self
    }

    pub fn with_max_file_size(mut self, size: u64) -> Self {
        self.max_file_size = size;
        self
    }

    /// Every project under the root, ordered by directory.
    ///
    /// A directory holding both scripts uses `build.gradle.kts`. A project
    /// without its own wrapper inherits the nearest ancestor's, as subprojects
    /// of a multi-project build do.
    pub fn scan(&self) -> Result<Vec<GradleProject>> {
        let mut projects: BTreeMap<PathBuf, GradleProject> = BTreeMap::new();

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build();

        for entry in walker.filter_map(|e| e.ok()) {
            let path = entry.path();

            if !path.is_file() || self.should_exclude(path) || !self.check_size(path) {
                continue;
            }

            let Some(kind) = BuildFileKind::from_path(path) else {
                continue;
            };
            if !kind.is_build_script() {
                continue;
            }
            let Some(dir) = path.parent() else {
                continue;
            };

            let project = projects
                .entry(dir.to_path_buf())
                .or_insert_with(|| GradleProject::new(dir));
            let prefer = kind == BuildFileKind::KotlinScript
                || project.build_file.is_none();
            if prefer {
                project.build_file = Some(path.to_path_buf());
            }
        }

        for project in projects.values_mut() {
            project.wrapper = self.find_wrapper(&project.dir);
        }

        Ok(projects.into_values().collect())
    }

    /// Wrapper properties of `dir` or its nearest ancestor within the root
    fn find_wrapper(&self, dir: &Path) -> Option<PathBuf> {
        let mut current = Some(dir);
        while let Some(candidate) = current {
            let wrapper = candidate.join(WRAPPER_PROPERTIES);
            if wrapper.is_file() {
                return Some(wrapper);
            }
            if candidate == self.root {
                break;
            }
            current = candidate.parent().filter(|p| p.starts_with(&self.root));
        }
        None
    }

    /// Patterns apply below the root, so a root under `build/` still scans
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();

        self.exclude.iter().any(|pattern| {
            glob::Pattern::new(pattern)
                .map(|p| p.matches(&path_str))
                .unwrap_or(false)
        })
    }

    fn check_size(&self, path: &Path) -> bool {
        path.metadata()
            .map(|m| m.len() <= self.max_file_size)
            .unwrap_or(false)
    }
}

/// A directory with a Gradle build script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradleProject {
    pub dir: PathBuf,
    pub build_file: Option<PathBuf>,
    pub wrapper: Option<PathBuf>,
}

impl GradleProject {
    fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            build_file: None,
            wrapper: None,
        }
    }
}

use globset::GlobSet;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::config::AnalyzerConfig;
use crate::error::{AnalyzerError, Result};

/// Files selected for scanning
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Discovery {
    /// Sorted candidate paths
    pub files: Vec<PathBuf>,
    /// Source files dropped by exclude globs or the size limit
    pub skipped: usize,
}

/// Finds source files under a root, which may itself be a single file
pub struct SourceFinder<'c> {
    root: PathBuf,
    config: &'c AnalyzerConfig,
}

impl<'c> SourceFinder<'c> {
    pub fn new(root: impl AsRef<Path>, config: &'c AnalyzerConfig) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            config,
        }
    }

    pub fn find(&self) -> Result<Discovery> {
        if !self.root.exists() {
            return Err(AnalyzerError::invalid_path(format!(
                "{} is not valid",
                self.root.display()
            )));
        }

        if self.root.is_file() {
            if !self.config.matches_extension(&self.root) {
                return Err(AnalyzerError::invalid_path(format!(
                    "{} is not a valid {} file",
                    self.root.display(),
                    self.config.extension
                )));
            }
            return Ok(Discovery {
                files: vec![self.root.clone()],
                skipped: 0,
            });
        }

        let excludes = self.config.exclude_set()?;
        let mut discovery = Discovery::default();
        let candidates = if self.config.respect_gitignore {
            self.walk_gitignore_aware()
        } else {
            self.walk_all()
        };

        for (path, len) in candidates {
            if !self.config.matches_extension(&path) {
                continue;
            }
            if self.is_excluded(&path, &excludes) {
                log::debug!("Excluded {}", path.display());
                discovery.skipped += 1;
                continue;
            }
            if let (Some(limit), Some(len)) = (self.config.max_file_bytes, len) {
                if len > limit {
                    log::debug!(
                        "Skipping large file {} ({} bytes > {})",
                        path.display(),
                        len,
                        limit
                    );
                    discovery.skipped += 1;
                    continue;
                }
            }
            discovery.files.push(path);
        }

        discovery.files.sort();
        log::info!(
            "Found {} source files under {} ({} skipped)",
            discovery.files.len(),
            self.root.display(),
            discovery.skipped
        );
        Ok(discovery)
    }

    /// Every regular file, hidden ones included
    fn walk_all(&self) -> Vec<(PathBuf, Option<u64>)> {
        let mut files = Vec::new();
        for result in WalkDir::new(&self.root).follow_links(self.config.follow_links) {
            match result {
                Ok(entry) => {
                    if !entry.file_type().is_file() {
                        continue;
                    }
                    let len = entry.metadata().ok().map(|meta| meta.len());
                    files.push((entry.into_path(), len));
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }
        files
    }

    /// Honors .gitignore, .ignore and .git/info/exclude, even outside a repository
    fn walk_gitignore_aware(&self) -> Vec<(PathBuf, Option<u64>)> {
        let mut files = Vec::new();
        let mut builder = WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(true)
            .git_global(false)
            .git_exclude(true)
            .require_git(false)
            .follow_links(self.config.follow_links);

        for result in builder.build() {
            match result {
                Ok(entry) => {
                    let Some(file_type) = entry.file_type() else {
                        continue;
                    };
                    if !file_type.is_file() {
                        continue;
                    }
                    let len = entry.metadata().ok().map(|meta| meta.len());
                    files.push((entry.into_path(), len));
                }
                Err(e) => log::warn!("Failed to read entry: {e}"),
            }
        }
        files
    }

    fn is_excluded(&self, path: &Path, excludes: &GlobSet) -> bool {
        if excludes.is_empty() {
            return false;
        }
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let normalized = relative.to_string_lossy().replace('\\', "/");
        excludes.is_match(normalized.as_str())
    }
}

/// Discover with the given config
pub fn discover(root: impl AsRef<Path>, config: &AnalyzerConfig) -> Result<Discovery> {
    SourceFinder::new(root, config).find()
}

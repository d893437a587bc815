use crate::error::{Result, ValidatorError};
use crate::settings::to_portable;
use log::{debug, warn};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules"];

/// File extensions collected when walking directories.
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Async discovery of the HTML files named on the command line
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    /// Paths containing any of these substrings are dropped
    exclude: Vec<String>,
}

impl FileDiscovery {
    pub fn new() -> Self {
        Self {
            exclude: Vec::new(),
        }
    }

    /// Drop every path containing one of `patterns`
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude = patterns.into_iter().filter(|p| !p.is_empty()).collect();
        self
    }

    /// Expand files, directories and glob patterns into a sorted,
    /// de-duplicated list of portable paths. No inputs means the current
    /// directory.
    pub async fn discover(&self, inputs: &[String]) -> Result<Vec<String>> {
        let inputs = if inputs.is_empty() {
            vec![".".to_string()]
        } else {
            inputs.to_vec()
        };

        let mut found = BTreeSet::new();
        for input in &inputs {
            let paths = if is_glob(input) {
                self.expand_glob(input).await?
            } else {
                self.discover_files(Path::new(input)).await?
            };
            for path in paths {
                let portable = portable_path(&path);
                if !self.is_excluded(&portable) {
                    found.insert(portable);
                }
            }
        }

        debug!("discovered {} file(s) from {:?}", found.len(), inputs);
        Ok(found.into_iter().collect())
    }

    async fn expand_glob(&self, pattern: &str) -> Result<Vec<PathBuf>> {
        let entries = glob::glob(pattern).map_err(|e| {
            ValidatorError::InvalidInput(format!("Invalid glob pattern '{}': {}", pattern, e))
        })?;

        let mut files = Vec::new();
        for entry in entries {
            match entry {
                Ok(path) if path.is_dir() => files.extend(self.discover_files(&path).await?),
                Ok(path) => files.push(path),
                Err(e) => warn!("skipping unreadable glob match: {}", e),
            }
        }
        Ok(files)
    }

    /// Discover files in the given path. A file is returned as is; a
    /// directory is walked for matching extensions.
    pub async fn discover_files(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let metadata = fs::metadata(path).await?;

        if metadata.is_file() {
            return Ok(vec![path.to_path_buf()]);
        }

        let mut files = Vec::new();
        self.walk(path, &mut files).await;
        Ok(files)
    }

    fn walk<'a>(
        &'a self,
        dir: &'a Path,
        files: &'a mut Vec<PathBuf>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = ()> + Send + 'a>> {
        Box::pin(async move {
            let mut read_dir = match fs::read_dir(dir).await {
                Ok(read_dir) => read_dir,
                Err(e) => {
                    warn!("cannot read directory {}: {}", dir.display(), e);
                    return;
                }
            };

            loop {
                let entry = match read_dir.next_entry().await {
                    Ok(Some(entry)) => entry,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("error reading {}: {}", dir.display(), e);
                        break;
                    }
                };
                let entry_path = entry.path();
                let Ok(file_type) = entry.file_type().await else {
                    continue;
                };

                if file_type.is_dir() {
                    if !is_skipped_dir(&entry_path) {
                        self.walk(&entry_path, files).await;
                    }
                } else if file_type.is_file() && self.should_process(&entry_path) {
                    files.push(entry_path);
                }
            }
        })
    }

    /// Check if a file found while walking is an HTML file
    pub fn should_process(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| HTML_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude.iter().any(|pattern| path.contains(pattern.as_str()))
    }
}

impl Default for FileDiscovery {
    fn default() -> Self {
        Self::new()
    }
}

fn is_glob(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

fn is_skipped_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') || SKIPPED_DIRS.contains(&name))
}

fn portable_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    let text = text.strip_prefix("./").unwrap_or(&text);
    to_portable(text)
}

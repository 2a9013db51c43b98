//! Directory summarizer.
//!
//! Walks the traversal root depth-first in directory-listing order, keeps every
//! regular, non-hidden file the [`IgnoreFilter`] admits, and renders the result
//! as a single [`SummaryDocument`]. Ignored and reserved directories are pruned
//! before they are entered. Only [`Summarizer::write`] touches the output path.

use crate::ignore_filter::IgnoreFilter;
use crate::utils::{normalize_path, resolve_path};
use crate::writer::{FileSummary, SummaryDocument};
use anyhow::{Context, Result};
use ignore::WalkBuilder;
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Default directory, under the traversal root, that holds generated output.
/// A directory with this name is never traversed.
pub const RESERVED_OUTPUT_DIR: &str = ".instructions";

/// File name of the summary document inside the output directory.
pub const SUMMARY_FILE: &str = "summary.md";

pub struct Summarizer {
    root: PathBuf,
    output_path: PathBuf,
    filter: IgnoreFilter,
}

impl Summarizer {
    /// Creates a summarizer for `root` that writes to `output_path`, reading
    /// ignore rules from `root/.gitignore`.
    pub fn new(root: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let filter = IgnoreFilter::new(&root)?;
        Ok(Self::with_filter(root, output_path, filter))
    }

    /// Both paths are resolved (symlinks and `..` removed) so the output
    /// location is recognised wherever the walk reaches it.
    pub fn with_filter(
        root: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        filter: IgnoreFilter,
    ) -> Self {
        Self {
            root: resolve_path(&root.into()),
            output_path: resolve_output_path(&output_path.into()),
            filter,
        }
    }

    /// Collects the summaries of every admitted file under the root, in traversal order.
    pub fn collect(&self) -> Result<Vec<FileSummary>> {
        let root = self.root.clone();
        let filter = self.filter.clone();
        let output_dir = self.output_path.parent().map(Path::to_path_buf);

        let mut builder = WalkBuilder::new(&self.root);
        builder
            .standard_filters(false)
            .follow_links(false)
            .filter_entry(move |entry| {
                if entry.depth() == 0 {
                    return true;
                }

                let path = entry.path();
                let is_dir = entry.file_type().is_some_and(|t| t.is_dir());
                let rel_path = path.strip_prefix(&root).unwrap_or(path);

                if filter.is_ignored(rel_path, is_dir) {
                    debug!("Ignored: {}", rel_path.display());
                    return false;
                }
                if is_dir && is_reserved_dir(path, output_dir.as_deref()) {
                    debug!("Skipping output directory: {}", rel_path.display());
                    return false;
                }
                true
            });

        let mut summaries = Vec::new();

        for result in builder.build() {
            let entry =
                result.with_context(|| format!("Failed to walk {}", self.root.display()))?;
            let Some(file_type) = entry.file_type() else {
                continue;
            };
            if file_type.is_dir() {
                continue;
            }

            let path = entry.path();
            let name = entry.file_name().to_string_lossy();
            if is_hidden(&name) || path == self.output_path {
                continue;
            }

            let rel_path = path.strip_prefix(&self.root).unwrap_or(path);
            if file_type.is_symlink() {
                let metadata = fs::metadata(path)
                    .with_context(|| format!("Failed to stat {}", path.display()))?;
                if !metadata.is_file() {
                    debug!("Not following symlink: {}", rel_path.display());
                    continue;
                }
            } else if !file_type.is_file() {
                continue;
            }

            debug!("Summarizing file: {}", rel_path.display());
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            summaries.push(FileSummary::new(name, content));
        }

        Ok(summaries)
    }

    /// Collects the whole tree and overwrites the output path with the result.
    ///
    /// Nothing is written if any file fails to read.
    pub async fn write(&self) -> Result<SummaryDocument> {
        let document = SummaryDocument::new(self.collect()?);
        if document.is_empty() {
            warn!("No files to summarize under {}", self.root.display());
        }
        document.write_to(&self.output_path).await?;
        Ok(document)
    }
}

fn is_reserved_dir(path: &Path, output_dir: Option<&Path>) -> bool {
    path.file_name().is_some_and(|name| name == RESERVED_OUTPUT_DIR) || output_dir == Some(path)
}

/// Resolves the directory part of the output path; the file itself may not exist yet.
fn resolve_output_path(output_path: &Path) -> PathBuf {
    match output_path.file_name() {
        Some(name) => {
            let parent = output_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            resolve_path(parent).join(name)
        }
        None => normalize_path(output_path),
    }
}

/// Determines if a file name is hidden (starts with a dot)
fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

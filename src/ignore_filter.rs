//! Path exclusion for the directory summarizer.
//!
//! The filter is a single gitignore rule set anchored at the traversal root.
//! It is seeded with [`BUILTIN_IGNORES`] and extended with the lines of the
//! root `.gitignore`, in file order, so a later `!pattern` can re-admit a path
//! excluded by a built-in rule.

use anyhow::{Context, Result};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use log::{debug, warn};
use std::fs;
use std::path::Path;

/// Name of the ignore file read from the traversal root.
pub const GITIGNORE_FILE: &str = ".gitignore";

/// Rules applied to every traversal before any `.gitignore` lines.
pub const BUILTIN_IGNORES: &[&str] = &[
    ".git",
    "package-lock.json",
    "yarn.lock",
    "pnpm-lock.yaml",
    "*.lock",
    "*.js.map",
    "dist",
    "node_modules",
    ".DS_Store",
];

/// Immutable gitignore-style predicate evaluated against root-relative paths.
#[derive(Debug, Clone)]
pub struct IgnoreFilter {
    matcher: Gitignore,
}

impl IgnoreFilter {
    /// Builds the filter for `root` from the built-in rules and `root/.gitignore`.
    ///
    /// A missing or unreadable `.gitignore` leaves only the built-in rules.
    pub fn new(root: &Path) -> Result<Self> {
        let gitignore_path = root.join(GITIGNORE_FILE);
        let extra = match fs::read_to_string(&gitignore_path) {
            Ok(content) => content,
            Err(err) => {
                debug!("No usable {}: {err}", gitignore_path.display());
                String::new()
            }
        };

        Self::from_lines(root, extra.lines())
    }

    /// Builds a filter from the built-in rules followed by `lines`.
    pub fn from_lines<'a, I>(root: &Path, lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut builder = GitignoreBuilder::new(root);

        for rule in BUILTIN_IGNORES {
            builder
                .add_line(None, rule)
                .with_context(|| format!("Invalid built-in ignore rule: {rule}"))?;
        }

        for line in lines {
            if let Err(err) = builder.add_line(None, line) {
                warn!("Skipping ignore rule {line:?}: {err}");
            }
        }

        let matcher = builder
            .build()
            .with_context(|| format!("Failed to build ignore rules for {}", root.display()))?;

        Ok(Self { matcher })
    }

    /// Returns true if `relative_path` (relative to the traversal root) is excluded.
    ///
    /// Directory-only rules (`build/`) only match when `is_dir` is set.
    pub fn is_ignored(&self, relative_path: &Path, is_dir: bool) -> bool {
        self.matcher.matched(relative_path, is_dir).is_ignore()
    }
}

use crate::utils::code_fence;
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::Path;
use tokio::fs::{self, File};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Placed between consecutive file sections of a summary document.
pub const SECTION_SEPARATOR: &str = "---\n\n";

/// One admitted file, rendered as a Markdown section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileSummary {
    /// Base name of the file, used for the heading.
    pub name: String,
    /// Full decoded text of the file.
    pub content: String,
}

impl FileSummary {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    pub fn render(&self) -> String {
        let fence = code_fence(&self.content);
        format!(
            "## File: {}\n\n{fence}\n{}\n{fence}\n\n",
            self.name, self.content
        )
    }
}

/// Ordered file sections produced by one traversal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SummaryDocument {
    pub sections: Vec<FileSummary>,
}

impl SummaryDocument {
    pub fn new(sections: Vec<FileSummary>) -> Self {
        Self { sections }
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn render(&self) -> String {
        self.sections
            .iter()
            .map(FileSummary::render)
            .collect::<Vec<_>>()
            .join(SECTION_SEPARATOR)
    }

    /// Overwrites `output_path` with the rendered document, creating parent
    /// directories as needed.
    pub async fn write_to(&self, output_path: &Path) -> Result<()> {
        if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let file = File::create(output_path)
            .await
            .with_context(|| format!("Failed to create {}", output_path.display()))?;
        let mut writer = BufWriter::new(file);

        debug!(
            "Writing {} sections to {}",
            self.len(),
            output_path.display()
        );

        writer
            .write_all(self.render().as_bytes())
            .await
            .with_context(|| format!("Failed to write {}", output_path.display()))?;
        writer.flush().await.context("Failed to flush output")?;

        info!("Summaries written to {}", output_path.display());
        Ok(())
    }
}

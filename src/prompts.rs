//! Prompt templates stored as Markdown files with YAML front matter.
//!
//! ```markdown
//! ---
//! name: readme
//! description: Draft a README from the project summary
//! output: README.generated.md
//! ---
//! Write a README for this project:
//!
//! {{SUMMARY}}
//! ```

use crate::provider::OpenAiClient;
use anyhow::{Context, Result};
use log::{debug, error};
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Name of the prompts folder under the target directory.
pub const PROMPTS_DIR: &str = "prompts";
/// Token replaced with the summary document before the prompt is sent.
pub const SUMMARY_PLACEHOLDER: &str = "{{SUMMARY}}";
/// Output file used when a prompt's front matter has no `output` key.
pub const DEFAULT_PROMPT_OUTPUT: &str = "output.md";
/// Returned in place of generated text when the provider call fails.
pub const PROVIDER_ERROR_SENTINEL: &str = "Error: Unable to execute AI prompt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub name: String,
    pub description: String,
    /// Template body with front matter removed and surrounding whitespace trimmed.
    pub content: String,
    /// File name the task result is saved under, inside the output directory.
    pub output: String,
}

#[derive(Debug, Default, Deserialize)]
struct FrontMatter {
    name: Option<String>,
    description: Option<String>,
    output: Option<String>,
}

impl Prompt {
    /// Parses a prompt file; `stem` is the file name without `.md`, used when
    /// the front matter has no `name`.
    pub fn parse(stem: &str, source: &str) -> Result<Self> {
        let (meta, body) = match split_front_matter(source) {
            Some((yaml, body)) if yaml.trim().is_empty() => (FrontMatter::default(), body),
            Some((yaml, body)) => (
                serde_yaml::from_str(yaml).context("Invalid prompt front matter")?,
                body,
            ),
            None => (FrontMatter::default(), source),
        };

        Ok(Self {
            name: non_empty(meta.name).unwrap_or_else(|| stem.to_string()),
            description: meta.description.unwrap_or_default(),
            content: body.trim().to_string(),
            output: non_empty(meta.output).unwrap_or_else(|| DEFAULT_PROMPT_OUTPUT.to_string()),
        })
    }

    /// Substitutes the first [`SUMMARY_PLACEHOLDER`] with `summary`.
    pub fn render(&self, summary: &str) -> String {
        self.content.replacen(SUMMARY_PLACEHOLDER, summary, 1)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Splits `---` delimited front matter from the body. Returns `None` when the
/// source does not open with a front matter block.
fn split_front_matter(source: &str) -> Option<(&str, &str)> {
    let rest = source.strip_prefix("---")?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Loads every `*.md` file in `prompts_dir`, ordered by file name.
pub fn load_prompts(prompts_dir: &Path) -> Result<Vec<Prompt>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(prompts_dir)
        .with_context(|| format!("Failed to list {}", prompts_dir.display()))?
    {
        let path = entry
            .with_context(|| format!("Failed to list {}", prompts_dir.display()))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "md") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut prompts = Vec::with_capacity(paths.len());
    for path in paths {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read prompt {}", path.display()))?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let prompt = Prompt::parse(&stem, &source)
            .with_context(|| format!("Failed to parse prompt {}", path.display()))?;

        debug!("Loaded prompt '{}' from {}", prompt.name, path.display());
        prompts.push(prompt);
    }

    Ok(prompts)
}

/// Finds a prompt whose name matches `task`, ignoring case.
pub fn find_prompt<'a>(prompts: &'a [Prompt], task: &str) -> Option<&'a Prompt> {
    let task = task.to_lowercase();
    prompts.iter().find(|p| p.name.to_lowercase() == task)
}

/// Fills `prompt` with the summary at `summary_path` and sends it to the provider.
///
/// Failing to read the summary is an error. A failed provider call is logged
/// and yields [`PROVIDER_ERROR_SENTINEL`] instead.
pub async fn execute_prompt(
    prompt: &Prompt,
    summary_path: &Path,
    client: &OpenAiClient,
) -> Result<String> {
    let summary = tokio::fs::read_to_string(summary_path)
        .await
        .with_context(|| format!("Failed to read summary {}", summary_path.display()))?;

    let rendered = prompt.render(&summary);

    match client.generate(&rendered).await {
        Ok(text) => Ok(text),
        Err(err) => {
            error!("Error executing AI prompt '{}': {err:#}", prompt.name);
            Ok(PROVIDER_ERROR_SENTINEL.to_string())
        }
    }
}

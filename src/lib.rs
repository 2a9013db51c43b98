//! # dokkit Library
//!
//! This crate can be used to:
//!
//! - Collect the readable text files of a project into one Markdown summary
//! - Run a prompt template from the project's `prompts/` folder against that summary
//!
//! ## Usage
//!
//! ### To generate a summary:
//!
//! ```rust,no_run
//! use dokkit::{Config, run_dokkit};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     // Writes <project>/.instructions/summary.md
//!     run_dokkit(Config::new("path/to/project")).await
//! }
//! ```
//!
//! ### To summarize with explicit paths:
//!
//! ```rust,no_run
//! use dokkit::Summarizer;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let document = Summarizer::new("path/to/project", "notes/summary.md")?
//!         .write()
//!         .await?;
//!     println!("{} files summarized", document.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod ignore_filter;
pub mod prompts;
pub mod provider;
pub mod summarizer;
pub mod utils;
pub mod writer;

pub use cli::Config;
pub use config::{DokkitConfig, load_config};
pub use error::DokkitError;
pub use ignore_filter::IgnoreFilter;
pub use prompts::{Prompt, execute_prompt, find_prompt, load_prompts};
pub use provider::OpenAiClient;
pub use summarizer::Summarizer;
pub use writer::{FileSummary, SummaryDocument};

use anyhow::{Context, Result};
use log::info;
use prompts::{PROMPTS_DIR, PROVIDER_ERROR_SENTINEL};
use provider::API_KEY_ENV;
use std::path::{Path, PathBuf};
use summarizer::{RESERVED_OUTPUT_DIR, SUMMARY_FILE};
use utils::normalize_path;

/// Generates the summary, or runs `config.task` against it.
///
/// Task results are printed to stdout.
pub async fn run_dokkit(config: Config) -> Result<()> {
    let project_root = std::fs::canonicalize(&config.project_root)
        .with_context(|| format!("Cannot access {}", config.project_root.display()))?;

    let file_config = load_config(&project_root);
    let output_path = resolve_output_path(&project_root, config.output_dir.as_deref(), &file_config);

    match config.task.as_deref() {
        Some(task) => {
            let result = run_task(&config, &project_root, &output_path, task).await?;
            println!("{result}");
        }
        None => {
            generate_summary(&project_root, &output_path).await?;
        }
    }

    Ok(())
}

/// Returns the summary file path: `--output-dir`, else the config file's
/// `outputDir`, else `.instructions`, resolved against `project_root`.
pub fn resolve_output_path(
    project_root: &Path,
    output_dir: Option<&Path>,
    file_config: &DokkitConfig,
) -> PathBuf {
    let output_dir = output_dir
        .or(file_config.output_dir.as_deref())
        .map(|dir| project_root.join(dir))
        .unwrap_or_else(|| project_root.join(RESERVED_OUTPUT_DIR));

    normalize_path(&output_dir.join(SUMMARY_FILE))
}

/// Summarizes `project_root` into `output_path`.
pub async fn generate_summary(project_root: &Path, output_path: &Path) -> Result<SummaryDocument> {
    Summarizer::new(project_root, output_path)?.write().await
}

/// Runs the prompt named `task` against the summary at `output_path`.
///
/// The prompts folder, credential and prompt are checked before anything is
/// written. A missing summary is generated first. The result is saved next to
/// the summary under the prompt's `output` name unless the provider call failed.
pub async fn run_task(
    config: &Config,
    project_root: &Path,
    output_path: &Path,
    task: &str,
) -> Result<String> {
    let prompts_dir = project_root.join(PROMPTS_DIR);
    if !prompts_dir.is_dir() {
        return Err(DokkitError::PromptsDirMissing(prompts_dir).into());
    }

    let api_key = config
        .api_key
        .as_deref()
        .ok_or(DokkitError::MissingApiKey(API_KEY_ENV))?;

    let prompts = load_prompts(&prompts_dir)?;
    let prompt = find_prompt(&prompts, task)
        .ok_or_else(|| DokkitError::PromptNotFound(task.to_string()))?;

    if !output_path.exists() {
        info!("Summary not found. Generating summary first...");
        generate_summary(project_root, output_path).await?;
    }

    let mut client = OpenAiClient::new(api_key)?.with_model(&config.model);
    if let Some(base_url) = config.api_base_url.as_deref() {
        client = client.with_base_url(base_url);
    }

    info!("Running task '{}' with {}", prompt.name, client.model());
    let result = execute_prompt(prompt, output_path, &client).await?;

    if result != PROVIDER_ERROR_SENTINEL {
        let task_output = output_path
            .parent()
            .unwrap_or(project_root)
            .join(&prompt.output);
        tokio::fs::write(&task_output, &result)
            .await
            .with_context(|| format!("Failed to write {}", task_output.display()))?;
        info!("Task output written to {}", task_output.display());
    }

    Ok(result)
}

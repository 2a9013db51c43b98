use std::path::PathBuf;
use thiserror::Error;

/// Missing inputs that stop a task before any output is produced.
#[derive(Debug, Error)]
pub enum DokkitError {
    #[error(
        "Prompts directory not found at {0}. Please create a \"prompts\" folder with your markdown prompt files."
    )]
    PromptsDirMissing(PathBuf),

    #[error(
        "{0} environment variable is not set. Please set it before running a task."
    )]
    MissingApiKey(&'static str),

    #[error("No prompt found for task: {0}")]
    PromptNotFound(String),
}

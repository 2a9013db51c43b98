use crate::provider::{API_KEY_ENV, BASE_URL_ENV, DEFAULT_MODEL};
use anyhow::Result;
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;

/// Runtime settings for one invocation, resolved from arguments and environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory to summarize.
    pub project_root: PathBuf,
    /// `--output-dir`; takes precedence over `.dokkit.config.json`.
    pub output_dir: Option<PathBuf>,
    /// Prompt name to run against the summary.
    pub task: Option<String>,
    pub api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub model: String,
    pub verbosity: u8,
}

impl Config {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            output_dir: None,
            task: None,
            api_key: None,
            api_base_url: None,
            model: DEFAULT_MODEL.to_string(),
            verbosity: 0,
        }
    }
}

pub fn command() -> Command {
    Command::new("dokkit")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Summarizes a directory into one Markdown file and runs prompt tasks on it")
        .arg(
            Arg::new("directory")
                .value_name("DIRECTORY")
                .help("Directory to process (defaults to the current directory)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("output-dir")
                .short('o')
                .long("output-dir")
                .value_name("PATH")
                .help("Directory the summary is written to (default: <DIRECTORY>/.instructions)")
                .value_parser(clap::value_parser!(PathBuf)),
        )
        .arg(
            Arg::new("task")
                .long("task")
                .value_name("TASK")
                .help("Name of the prompt in <DIRECTORY>/prompts to run against the summary"),
        )
        .arg(
            Arg::new("model")
                .long("model")
                .value_name("MODEL")
                .help("Model used for tasks")
                .default_value(DEFAULT_MODEL),
        )
        .arg(
            Arg::new("api-key")
                .long("api-key")
                .value_name("KEY")
                .env(API_KEY_ENV)
                .hide_env_values(true)
                .hide(true),
        )
        .arg(
            Arg::new("api-base-url")
                .long("api-base-url")
                .value_name("URL")
                .env(BASE_URL_ENV)
                .hide(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log output (-v debug, -vv trace)")
                .action(ArgAction::Count),
        )
}

pub fn parse_args() -> Result<Config> {
    config_from_matches(&command().get_matches())
}

pub fn config_from_matches(matches: &ArgMatches) -> Result<Config> {
    let project_root = match matches.get_one::<PathBuf>("directory") {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };

    Ok(Config {
        project_root,
        output_dir: matches.get_one::<PathBuf>("output-dir").cloned(),
        task: matches.get_one::<String>("task").cloned(),
        api_key: matches
            .get_one::<String>("api-key")
            .filter(|key| !key.is_empty())
            .cloned(),
        api_base_url: matches.get_one::<String>("api-base-url").cloned(),
        model: matches
            .get_one::<String>("model")
            .cloned()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        verbosity: matches.get_count("verbose"),
    })
}

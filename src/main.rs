use anyhow::Result;
use dokkit::{cli::parse_args, run_dokkit};

#[tokio::main]
async fn main() -> Result<()> {
    let config = parse_args()?;
    init_logging(config.verbosity);
    run_dokkit(config).await
}

/// Logs go to stderr; `RUST_LOG` overrides the level chosen by `-v`.
fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

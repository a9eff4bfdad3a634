use anyhow::{Context, Result};
use clap::Parser;
use elasticstat_core::cli::{self, FeedArgs, Mode};
use elasticstat_core::conf::{Config, load_config, validate_config};
use elasticstat_core::logging::init_logging;
use elasticstat_core::shutdown::Shutdown;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "elasticstat",
    version,
    about = "Elasticsearch traffic analytics from packet captures"
)]
struct Cli {
    /// Path to an HCL config file; built-in defaults are used without one
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    feed: FeedArgs,

    #[command(subcommand)]
    mode: Mode,
}

fn main() {
    let args = Cli::parse();

    let config = match load(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {e:#}");
            std::process::exit(2);
        }
    };

    let logging = &config.logging;
    let guard = init_logging(logging.format, &logging.level, logging.dir.as_deref());

    let result = run(&args, &config);
    if let Err(e) = &result {
        let message = format!("{e:#}");
        tracing::error!(error = %message, mode = ?args.mode, "elasticstat failed");
    }

    // Flush buffered log lines before exiting.
    drop(guard);

    if result.is_err() {
        std::process::exit(1);
    }
}

fn load(args: &Cli) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => Config::default(),
    };

    args.feed.apply(&mut config);
    validate_config(&config).context("invalid command-line override")?;

    Ok(config)
}

fn run(args: &Cli, config: &Config) -> Result<()> {
    let shutdown = Shutdown::new();
    shutdown
        .install_ctrlc_handler()
        .context("failed to install the Ctrl-C handler")?;

    cli::run(args.mode, config, args.feed.input.as_deref(), &shutdown)
}

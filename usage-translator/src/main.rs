//! Usage Translator CLI - partner usage report to SQL insert files
//!
//! ```bash
//! usage-translator                          # run with built-in defaults
//! usage-translator --config translator.json # run with a config file
//! usage-translator -vv --log-format json    # trace-level JSON logs
//! ```
//!
//! `USAGE_TRANSLATOR_CONFIG` (also read from `.env`) stands in for `--config`.

use std::path::{Path, PathBuf};

use clap::Parser;
use usage_translator::logging::{init_logging, LogConfig, LogFormat};
use usage_translator::{run, PipelineError, TracingSink, TranslatorConfig};

#[derive(Parser)]
#[command(name = "usage-translator")]
#[command(about = "Translate a partner usage report into chargeable and domains SQL inserts", long_about = None)]
struct Cli {
    /// JSON configuration file; relative paths inside it resolve against its directory
    #[arg(short, long, env = "USAGE_TRANSLATOR_CONFIG")]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_logging(&LogConfig::from_verbosity(cli.verbose).with_format(cli.log_format));

    if let Err(e) = execute(cli.config.as_deref()) {
        tracing::error!(error = %e, "run failed");
        std::process::exit(1);
    }
}

fn execute(config_path: Option<&Path>) -> Result<(), PipelineError> {
    let config = match config_path {
        Some(path) => {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            TranslatorConfig::from_path(path)?.resolve_paths(base)
        }
        None => {
            tracing::info!("no config file given, using built-in defaults");
            TranslatorConfig::default()
        }
    };

    let summary = run(&config, &TracingSink)?;
    tracing::info!(
        run_id = %summary.run_id,
        chargeable = %config.chargeable_output_path.display(),
        domains = %config.domains_output_path.display(),
        "done"
    );
    Ok(())
}

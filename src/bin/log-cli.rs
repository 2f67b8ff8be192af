use std::time::Duration;

use clap::{Parser, ValueEnum};
use serde_json::Value;

use log_relay::config::{apply_env, Config, ConsoleMode};
use log_relay::{Logger, Severity};

#[derive(Parser)]
#[command(name = "log-cli")]
#[command(about = "Ship a single log entry to a collector", long_about = None)]
struct Cli {
    #[arg(short, long)]
    application: Option<String>,

    #[arg(short, long)]
    url: Option<String>,

    #[arg(short, long, value_enum, default_value_t = Level::Info)]
    severity: Level,

    /// Do not echo the entry to stdout.
    #[arg(short, long)]
    quiet: bool,

    /// Entry content; parsed as JSON when possible, otherwise sent as a string.
    content: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Info,
    Warning,
    Error,
}

impl From<Level> for Severity {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => Severity::Info,
            Level::Warning => Severity::Warning,
            Level::Error => Severity::Error,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    log_relay::observability::logging::init_tracing("log_relay=warn");

    let mut config = Config::default();
    apply_env(&mut config, |key| std::env::var(key).ok())?;
    let mut logger_config = config.logger;
    if let Some(application) = cli.application {
        logger_config.application = application;
    }
    if let Some(url) = cli.url {
        logger_config.collector_url = Some(url);
    }
    if cli.quiet {
        logger_config.console = ConsoleMode::DebugOnly;
        logger_config.debug = false;
    }

    let content = serde_json::from_str(&cli.content).unwrap_or(Value::String(cli.content));

    let logger = Logger::from_config(&logger_config)?;
    logger.log(cli.severity.into(), content)?;
    if !logger.flush(Duration::from_secs(30)) {
        eprintln!("Error: timed out waiting for delivery");
    }
    logger.shutdown();
    Ok(())
}

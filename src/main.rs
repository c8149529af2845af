use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use fxrates::cli::rates::OutputFormat;
use fxrates::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    /// API key, overrides the one in the configuration file
    #[arg(long, global = true, env = "FXRATES_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch current exchange rates
    Rates {
        /// Currency pair to fetch, may be repeated (default: pairs from config)
        #[arg(short, long = "pair", value_name = "PAIR")]
        pairs: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let overrides = fxrates::Overrides {
        config_path: cli.config_path.as_deref(),
        api_key: cli.api_key.as_deref(),
    };

    let result = match cli.command {
        Some(Commands::Setup) => match overrides.config_path {
            Some(path) => fxrates::cli::setup::setup_at_path(path),
            None => fxrates::cli::setup::setup(),
        },
        Some(Commands::Rates { pairs, format }) => {
            let pairs = pairs.into_iter().map(|p| p.to_uppercase()).collect();
            fxrates::run_command(fxrates::AppCommand::Rates { pairs, format }, &overrides).await
        }
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

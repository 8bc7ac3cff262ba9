use anyhow::Result;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fxconv::core::Currency;
use fxconv::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args)]
struct ConvertArgs {
    /// Amount to convert
    #[arg(short, long, allow_hyphen_values = true)]
    amount: String,

    /// Source currency (defaults to the configured one)
    #[arg(short, long)]
    from: Option<Currency>,

    /// Target currency (defaults to the configured one)
    #[arg(short, long)]
    to: Option<Currency>,

    /// Swap source and target before converting
    #[arg(short, long)]
    swap: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Convert an amount between two currencies
    Convert(ConvertArgs),
    /// Show the latest exchange rates
    Rates,
    /// Interactive converter with background rate refresh
    Watch,
}

impl From<ConvertArgs> for fxconv::ConvertRequest {
    fn from(args: ConvertArgs) -> fxconv::ConvertRequest {
        fxconv::ConvertRequest {
            amount: args.amount,
            from: args.from,
            to: args.to,
            swap: args.swap,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => fxconv::cli::setup::setup(),
        Some(Commands::Convert(args)) => {
            fxconv::run_command(fxconv::AppCommand::Convert(args.into()), config_path).await
        }
        Some(Commands::Rates) => fxconv::run_command(fxconv::AppCommand::Rates, config_path).await,
        Some(Commands::Watch) => fxconv::run_command(fxconv::AppCommand::Watch, config_path).await,
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

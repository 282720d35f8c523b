use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use dcasim::cli::simulate::{AxisChoice, OutputFormat};
use dcasim::core::log::init_logging;
use dcasim::core::{Asset, Horizon};

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

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Simulate a monthly purchase over recent price history
    Simulate {
        /// Asset to buy: bitcoin, ethereum or solana
        #[arg(short, long)]
        asset: Option<Asset>,

        /// Amount contributed every 30 days
        #[arg(short, long)]
        monthly: Option<f64>,

        /// Simulation length in months (1-12)
        #[arg(short = 'H', long)]
        horizon: Option<Horizon>,

        /// Dates shown on the chart
        #[arg(long, value_enum, default_value_t)]
        axis: AxisChoice,

        /// Output format
        #[arg(short, long, value_enum, default_value_t)]
        format: OutputFormat,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => dcasim::cli::setup::setup(),
        Some(Commands::Simulate {
            asset,
            monthly,
            horizon,
            axis,
            format,
        }) => {
            let args = dcasim::SimulateArgs {
                asset,
                monthly_contribution: monthly,
                horizon,
                axis,
                format,
            };
            dcasim::run_command(dcasim::AppCommand::Simulate(args), cli.config_path.as_deref())
                .await
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

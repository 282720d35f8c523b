pub mod cli;
pub mod core;
pub mod providers;

pub use crate::core::config;

use crate::cli::simulate::{AxisChoice, OutputFormat};
use crate::config::SimulationDefaults;
use crate::core::{Asset, Horizon, RequestError, SimulationRequest};
use crate::providers::coingecko::CoinGeckoProvider;
use anyhow::Result;
use tracing::{debug, info};

/// Options for a single simulation run. `None` fields fall back to the
/// configured defaults.
#[derive(Debug, Clone, Default)]
pub struct SimulateArgs {
    pub asset: Option<Asset>,
    pub monthly_contribution: Option<f64>,
    pub horizon: Option<Horizon>,
    pub axis: AxisChoice,
    pub format: OutputFormat,
}

impl SimulateArgs {
    /// Fills unset options from `defaults` and validates the result.
    pub fn to_request(
        &self,
        defaults: &SimulationDefaults,
    ) -> Result<SimulationRequest, RequestError> {
        SimulationRequest::new(
            self.asset.unwrap_or(defaults.asset),
            self.monthly_contribution
                .unwrap_or(defaults.monthly_contribution),
            self.horizon.unwrap_or(defaults.horizon_months),
        )
    }
}

pub enum AppCommand {
    Simulate(SimulateArgs),
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("dcasim starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Simulate(args) => {
            let request = args.to_request(&config.defaults)?;
            debug!(?request, "Resolved simulation request");

            let provider = CoinGeckoProvider::new(&config.providers.coingecko)?;
            cli::simulate::run(
                &provider,
                &request,
                &config.currency,
                args.axis,
                args.format,
            )
            .await
        }
    }
}

use super::chart::Chart;
use super::ui;
use crate::core::request::DAYS_PER_MONTH;
use crate::core::simulation::months_elapsed;
use crate::core::{
    Asset, DateAxis, PriceHistoryProvider, PriceSeries, SimulationInput, SimulationRequest,
    SimulationResult, simulate_with_axis,
};
use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::ValueEnum;
use comfy_table::Cell;
use serde::Serialize;
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum AxisChoice {
    /// Label points with the dates of the fetched prices
    #[default]
    Historical,
    /// Label points with consecutive days starting today
    Forward,
}

impl AxisChoice {
    pub fn to_axis(self, today: NaiveDate) -> DateAxis {
        match self {
            AxisChoice::Historical => DateAxis::Historical,
            AxisChoice::Forward => DateAxis::ForwardFrom(today),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Chart, metrics and monthly breakdown
    #[default]
    Table,
    /// The simulation result as JSON
    Json,
}

/// A finished simulation with the context needed to present it.
#[derive(Debug, Serialize)]
pub struct SimulationReport {
    pub asset: Asset,
    pub currency: String,
    pub monthly_contribution: f64,
    pub horizon_months: u32,
    #[serde(skip)]
    pub series: PriceSeries,
    pub result: SimulationResult,
}

/// Fetches the price history for `request` and runs the simulation on it.
pub async fn execute(
    provider: &(dyn PriceHistoryProvider + Send + Sync),
    request: &SimulationRequest,
    currency: &str,
    axis: DateAxis,
) -> Result<SimulationReport> {
    let days = request.horizon.days();
    info!(
        asset = %request.asset,
        days,
        monthly_contribution = request.monthly_contribution,
        "Running simulation"
    );

    let spinner = ui::new_spinner(format!(
        "Fetching {} days of {} prices",
        days, request.asset
    ));
    let fetched = provider
        .fetch_daily_prices(request.asset.api_id(), days, currency)
        .await;
    spinner.finish_and_clear();

    let series = fetched.with_context(|| {
        format!("Failed to fetch price history for {}", request.asset)
    })?;
    debug!(points = series.len(), "Fetched price history");

    let input = SimulationInput {
        monthly_contribution: request.monthly_contribution,
        series,
    };
    let result = simulate_with_axis(&input, axis)
        .with_context(|| format!("Simulation failed for {}", request.asset))?;

    Ok(SimulationReport {
        asset: request.asset,
        currency: currency.to_string(),
        monthly_contribution: request.monthly_contribution,
        horizon_months: request.horizon.months(),
        series: input.series,
        result,
    })
}

pub async fn run(
    provider: &(dyn PriceHistoryProvider + Send + Sync),
    request: &SimulationRequest,
    currency: &str,
    axis: AxisChoice,
    format: OutputFormat,
) -> Result<()> {
    let today = chrono::Local::now().date_naive();
    let report = execute(provider, request, currency, axis.to_axis(today)).await?;

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&report)
                .context("Failed to serialize simulation result")?;
            println!("{json}");
        }
        OutputFormat::Table => {
            println!("\n{}", ui::style_text(&report.title(), ui::StyleType::Title));
            println!("\n{}", Chart::for_terminal().render(&report.result, &report.currency));
            println!("\n{}", report.metrics_table());
            ui::print_separator();
            println!(
                "{}",
                ui::style_text("Monthly breakdown", ui::StyleType::Label)
            );
            println!("{}", report.breakdown_table());
        }
    }
    Ok(())
}

impl SimulationReport {
    pub fn title(&self) -> String {
        format!(
            "DCA simulation: {} ({} months, {} per month)",
            self.asset,
            self.horizon_months,
            ui::format_amount(self.monthly_contribution, &self.currency)
        )
    }

    pub fn metrics_table(&self) -> String {
        let result = &self.result;
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Total invested"),
            ui::header_cell("Final value"),
            ui::header_cell("Gain/loss"),
            ui::header_cell(&format!("Performance {}", self.asset)),
        ]);

        let gain_loss_pct = result
            .gain_loss_pct
            .map_or_else(|| ui::UNDEFINED.to_string(), ui::format_signed_pct);
        let gain_loss = format!(
            "{} ({gain_loss_pct})",
            ui::format_amount(result.gain_loss, &self.currency)
        );

        table.add_row(vec![
            ui::amount_cell(ui::format_amount(result.total_invested, &self.currency)),
            ui::amount_cell(ui::format_amount(result.final_value, &self.currency)),
            ui::signed_cell(gain_loss, result.gain_loss),
            ui::signed_cell(
                ui::format_signed_pct(result.asset_performance_pct),
                result.asset_performance_pct,
            ),
        ]);
        table.to_string()
    }

    /// One row at each contribution step plus the final point.
    pub fn breakdown_table(&self) -> String {
        let mut table = ui::new_styled_table();
        table.set_header(vec![
            ui::header_cell("Date"),
            ui::header_cell("Month"),
            ui::header_cell("Price"),
            ui::header_cell("Invested"),
            ui::header_cell("Value"),
        ]);

        for index in breakdown_indices(self.result.value_series.len()) {
            let invested = &self.result.invested_series[index];
            let value = &self.result.value_series[index];
            let price = self.series.points().get(index).map(|p| p.price);
            table.add_row(vec![
                Cell::new(value.date.to_string()),
                ui::amount_cell(months_elapsed(index).to_string()),
                ui::format_optional_cell(price, |p| ui::format_amount(p, &self.currency)),
                ui::amount_cell(ui::format_amount(invested.amount, &self.currency)),
                ui::signed_cell(
                    ui::format_amount(value.amount, &self.currency),
                    value.amount - invested.amount,
                ),
            ]);
        }
        table.to_string()
    }
}

/// Indices `0, 30, 60, ...` followed by the last index of a series of `len`.
fn breakdown_indices(len: usize) -> Vec<usize> {
    if len == 0 {
        return Vec::new();
    }
    let mut indices: Vec<usize> = (0..len).step_by(DAYS_PER_MONTH as usize).collect();
    if indices.last() != Some(&(len - 1)) {
        indices.push(len - 1);
    }
    indices
}

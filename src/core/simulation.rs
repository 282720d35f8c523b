//! Recurring-purchase simulation over a daily price series.
//!
//! Contributions are credited once every [`DAYS_PER_MONTH`] price points,
//! starting from zero at the first point. Every euro contributed so far is
//! valued with the same ratio `price(i) / price(0)`, so this is an
//! accumulation model rather than a tranche-by-tranche cost average.

use crate::core::price::PriceSeries;
use crate::core::request::DAYS_PER_MONTH;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("Price series is empty, nothing to simulate")]
    EmptySeries,

    #[error("Reference price must be positive, got {0}")]
    InvalidReferencePrice(f64),

    #[error("Monthly contribution must be a non-negative amount, got {0}")]
    InvalidContribution(f64),
}

/// Which dates label the simulated series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateAxis {
    /// The dates of the price series itself.
    #[default]
    Historical,
    /// Consecutive days starting at `start`, ignoring the price dates.
    ForwardFrom(NaiveDate),
}

#[derive(Debug, Clone)]
pub struct SimulationInput {
    pub monthly_contribution: f64,
    pub series: PriceSeries,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DatedAmount {
    pub date: NaiveDate,
    pub amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationResult {
    pub invested_series: Vec<DatedAmount>,
    pub value_series: Vec<DatedAmount>,
    pub total_invested: f64,
    pub final_value: f64,
    pub gain_loss: f64,
    /// `None` when nothing was invested and the ratio is undefined.
    pub gain_loss_pct: Option<f64>,
    pub asset_performance_pct: f64,
}

/// Number of whole contribution periods elapsed at `index`.
pub fn months_elapsed(index: usize) -> usize {
    index / DAYS_PER_MONTH as usize
}

pub fn simulate(input: &SimulationInput) -> Result<SimulationResult, SimulationError> {
    simulate_with_axis(input, DateAxis::Historical)
}

pub fn simulate_with_axis(
    input: &SimulationInput,
    axis: DateAxis,
) -> Result<SimulationResult, SimulationError> {
    let contribution = input.monthly_contribution;
    if !contribution.is_finite() || contribution < 0.0 {
        return Err(SimulationError::InvalidContribution(contribution));
    }

    let points = input.series.points();
    let (first, last) = match (points.first(), points.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(SimulationError::EmptySeries),
    };

    let reference_price = first.price;
    if !reference_price.is_finite() || reference_price <= 0.0 {
        return Err(SimulationError::InvalidReferencePrice(reference_price));
    }

    let dates: Vec<NaiveDate> = match axis {
        DateAxis::Historical => points.iter().map(|p| p.date).collect(),
        DateAxis::ForwardFrom(start) => start.iter_days().take(points.len()).collect(),
    };

    let mut invested_series = Vec::with_capacity(points.len());
    let mut value_series = Vec::with_capacity(points.len());
    for (i, (point, date)) in points.iter().zip(dates).enumerate() {
        let invested = months_elapsed(i) as f64 * contribution;
        let price_ratio = point.price / reference_price;
        invested_series.push(DatedAmount {
            date,
            amount: invested,
        });
        value_series.push(DatedAmount {
            date,
            amount: invested * price_ratio,
        });
    }

    let total_invested = invested_series.last().map_or(0.0, |d| d.amount);
    let final_value = value_series.last().map_or(0.0, |d| d.amount);
    let gain_loss = final_value - total_invested;
    let gain_loss_pct = if total_invested == 0.0 {
        None
    } else {
        Some(gain_loss / total_invested * 100.0)
    };
    let asset_performance_pct = (last.price / reference_price - 1.0) * 100.0;

    debug!(
        points = points.len(),
        total_invested, final_value, gain_loss, asset_performance_pct, "Simulation complete"
    );

    Ok(SimulationResult {
        invested_series,
        value_series,
        total_invested,
        final_value,
        gain_loss,
        gain_loss_pct,
        asset_performance_pct,
    })
}

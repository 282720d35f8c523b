//! User-facing simulation parameters and their validation

use crate::core::asset::Asset;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

/// Number of price points that stand for one month of contributions.
pub const DAYS_PER_MONTH: u32 = 30;

#[derive(Debug, Error, PartialEq)]
pub enum RequestError {
    #[error("Unknown asset: {0} (expected one of bitcoin, ethereum, solana)")]
    UnknownAsset(String),

    #[error(
        "Horizon must be between {min} and {max} months, got {0}",
        min = Horizon::MIN,
        max = Horizon::MAX
    )]
    HorizonOutOfRange(u32),

    #[error("Invalid horizon: {0}")]
    InvalidHorizon(String),

    #[error("Monthly contribution must be a non-negative amount, got {0}")]
    InvalidContribution(f64),
}

/// Simulation length in months, bounded to `[Horizon::MIN, Horizon::MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Horizon(u32);

impl Horizon {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 12;

    pub fn new(months: u32) -> Result<Self, RequestError> {
        if (Self::MIN..=Self::MAX).contains(&months) {
            Ok(Horizon(months))
        } else {
            Err(RequestError::HorizonOutOfRange(months))
        }
    }

    pub fn months(&self) -> u32 {
        self.0
    }

    /// Day count requested from the price API.
    pub fn days(&self) -> u32 {
        self.0 * DAYS_PER_MONTH
    }
}

impl Default for Horizon {
    fn default() -> Self {
        Horizon(6)
    }
}

impl TryFrom<u32> for Horizon {
    type Error = RequestError;

    fn try_from(months: u32) -> Result<Self, Self::Error> {
        Horizon::new(months)
    }
}

impl From<Horizon> for u32 {
    fn from(horizon: Horizon) -> u32 {
        horizon.0
    }
}

impl FromStr for Horizon {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let months = s
            .trim()
            .parse::<u32>()
            .map_err(|_| RequestError::InvalidHorizon(s.to_string()))?;
        Horizon::new(months)
    }
}

impl Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} months", self.0)
    }
}

/// Everything needed to fetch prices and run one simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRequest {
    pub asset: Asset,
    pub monthly_contribution: f64,
    pub horizon: Horizon,
}

impl SimulationRequest {
    pub fn new(
        asset: Asset,
        monthly_contribution: f64,
        horizon: Horizon,
    ) -> Result<Self, RequestError> {
        if !monthly_contribution.is_finite() || monthly_contribution < 0.0 {
            return Err(RequestError::InvalidContribution(monthly_contribution));
        }
        Ok(SimulationRequest {
            asset,
            monthly_contribution,
            horizon,
        })
    }
}

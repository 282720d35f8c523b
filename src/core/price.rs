//! Price history abstractions and core types

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, price: f64) -> Self {
        PricePoint { date, price }
    }
}

/// Daily prices in ascending date order, one point per date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Builds a series from arbitrary points. Points are sorted by date and,
    /// when a date repeats, the one appearing last in the input is kept.
    pub fn from_points(points: impl IntoIterator<Item = PricePoint>) -> Self {
        let mut points: Vec<PricePoint> = points.into_iter().collect();
        // Stable sort keeps input order within a date, so the last one wins below.
        points.sort_by_key(|p| p.date);
        let mut deduped: Vec<PricePoint> = Vec::with_capacity(points.len());
        for point in points {
            match deduped.last_mut() {
                Some(last) if last.date == point.date => *last = point,
                _ => deduped.push(point),
            }
        }
        PriceSeries { points: deduped }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PricePoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PricePoint> {
        self.points.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PricePoint> {
        self.points.iter()
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid price request: {0}")]
    InvalidRequest(String),

    #[error("Request error: {source} for asset: {asset_id} URL: {url}")]
    Network {
        asset_id: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error: {status} for asset: {asset_id}")]
    Status {
        asset_id: String,
        status: reqwest::StatusCode,
    },

    #[error("Failed to parse price history for {asset_id}: {message}")]
    Decode { asset_id: String, message: String },

    #[error("Invalid price {price} at timestamp {timestamp_ms} for asset: {asset_id}")]
    InvalidPrice {
        asset_id: String,
        timestamp_ms: i64,
        price: f64,
    },
}

#[async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    /// Fetches `days` daily prices for `asset_id` quoted in `currency`.
    async fn fetch_daily_prices(
        &self,
        asset_id: &str,
        days: u32,
        currency: &str,
    ) -> Result<PriceSeries, FetchError>;
}

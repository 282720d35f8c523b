use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::core::config::CoinGeckoProviderConfig;
use crate::core::price::{FetchError, PriceHistoryProvider, PricePoint, PriceSeries};
use crate::providers::util::with_retry;

const API_KEY_HEADER: &str = "x-cg-pro-api-key";

// CoinGeckoProvider implementation for PriceHistoryProvider
pub struct CoinGeckoProvider {
    base_url: String,
    api_key: Option<String>,
    retries: usize,
    retry_delay_ms: u64,
    client: reqwest::Client,
}

impl CoinGeckoProvider {
    pub fn new(config: &CoinGeckoProviderConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("dcasim/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(CoinGeckoProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            retries: config.retries,
            retry_delay_ms: config.retry_delay_ms,
            client,
        })
    }
}

#[derive(Deserialize, Debug)]
struct MarketChartResponse {
    /// `[unix_millis, price]` pairs
    prices: Vec<(f64, f64)>,
}

fn to_series(asset_id: &str, raw: &[(f64, f64)]) -> Result<PriceSeries, FetchError> {
    let mut points = Vec::with_capacity(raw.len());
    for &(timestamp, price) in raw {
        let timestamp_ms = timestamp as i64;
        if !price.is_finite() || price <= 0.0 {
            return Err(FetchError::InvalidPrice {
                asset_id: asset_id.to_string(),
                timestamp_ms,
                price,
            });
        }
        let date: NaiveDate = DateTime::from_timestamp_millis(timestamp_ms)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| FetchError::Decode {
                asset_id: asset_id.to_string(),
                message: format!("timestamp out of range: {timestamp_ms}"),
            })?;
        points.push(PricePoint::new(date, price));
    }
    Ok(PriceSeries::from_points(points))
}

#[async_trait]
impl PriceHistoryProvider for CoinGeckoProvider {
    #[instrument(
        name = "CoinGeckoPriceFetch",
        skip(self),
        fields(asset_id = %asset_id)
    )]
    async fn fetch_daily_prices(
        &self,
        asset_id: &str,
        days: u32,
        currency: &str,
    ) -> Result<PriceSeries, FetchError> {
        if days == 0 {
            return Err(FetchError::InvalidRequest(
                "day count must be at least 1".to_string(),
            ));
        }

        let url = format!(
            "{}/coins/{}/market_chart?vs_currency={}&days={}&interval=daily",
            self.base_url, asset_id, currency, days
        );
        debug!("Requesting price history from {}", url);

        let response = with_retry(
            || {
                let mut request = self.client.get(&url);
                if let Some(key) = &self.api_key {
                    request = request.header(API_KEY_HEADER, key);
                }
                request.send()
            },
            self.retries,
            self.retry_delay_ms,
        )
        .await
        .map_err(|source| FetchError::Network {
            asset_id: asset_id.to_string(),
            url: url.clone(),
            source,
        })?;

        debug!(response = ?response, "Received CoinGecko response");

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                asset_id: asset_id.to_string(),
                status,
            });
        }

        let text = response.text().await.map_err(|source| FetchError::Network {
            asset_id: asset_id.to_string(),
            url: url.clone(),
            source,
        })?;

        let data: MarketChartResponse =
            serde_json::from_str(&text).map_err(|e| FetchError::Decode {
                asset_id: asset_id.to_string(),
                message: e.to_string(),
            })?;

        let series = to_series(asset_id, &data.prices)?;
        debug!(
            raw_points = data.prices.len(),
            points = series.len(),
            "Parsed price history"
        );
        Ok(series)
    }
}

use dcasim::cli::simulate::{AxisChoice, OutputFormat};
use dcasim::core::{Asset, Horizon};
use std::fs;
use tracing::{error, info};

// Adds automatic logging to test
mod test_utils {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // 2024-03-01T00:00:00Z
    pub const START_MS: i64 = 1_709_251_200_000;
    pub const DAY_MS: i64 = 86_400_000;

    pub fn market_chart_body(prices: &[f64]) -> String {
        let pairs: Vec<String> = prices
            .iter()
            .enumerate()
            .map(|(i, price)| format!("[{}, {price}]", START_MS + i as i64 * DAY_MS))
            .collect();
        format!(
            r#"{{"prices": [{}], "market_caps": [], "total_volumes": []}}"#,
            pairs.join(", ")
        )
    }

    pub async fn create_mock_server(
        asset_id: &str,
        days: u32,
        status: u16,
        body: &str,
    ) -> MockServer {
        let mock_server = MockServer::start().await;
        let url_path = format!("/coins/{asset_id}/market_chart");

        Mock::given(method("GET"))
            .and(path(&url_path))
            .and(query_param("days", days.to_string()))
            .and(query_param("interval", "daily"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(1)
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub fn write_config(dir: &tempfile::TempDir, base_url: &str) -> std::path::PathBuf {
        let config_path = dir.path().join("config.yaml");
        let config_content = format!(
            r#"
            currency: "eur"
            providers:
              coingecko:
                base_url: {base_url}
                retries: 0
                retry_delay_ms: 0
            defaults:
              asset: ethereum
              monthly_contribution: 100.0
              horizon_months: 1
        "#
        );
        std::fs::write(&config_path, config_content).expect("Failed to write config file");
        config_path
    }
}

#[test_log::test(tokio::test)]
async fn test_full_app_flow_with_mock() {
    let prices: Vec<f64> = (0..31).map(|i| 100.0 + i as f64).collect();
    let body = test_utils::market_chart_body(&prices);
    let mock_server = test_utils::create_mock_server("ethereum", 30, 200, &body).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());

    let result = dcasim::run_command(
        dcasim::AppCommand::Simulate(dcasim::SimulateArgs::default()),
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Simulation failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_flags_override_config_defaults() {
    let body = test_utils::market_chart_body(&[20.0; 91]);
    let mock_server = test_utils::create_mock_server("solana", 90, 200, &body).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());

    let args = dcasim::SimulateArgs {
        asset: Some(Asset::Solana),
        monthly_contribution: Some(0.0),
        horizon: Some(Horizon::new(3).unwrap()),
        axis: AxisChoice::Forward,
        format: OutputFormat::Json,
    };
    let result = dcasim::run_command(
        dcasim::AppCommand::Simulate(args),
        Some(config_path.to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Simulation failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_flag_values_reach_the_simulation() {
    use dcasim::config::AppConfig;
    use dcasim::core::DateAxis;
    use dcasim::providers::coingecko::CoinGeckoProvider;

    let body = test_utils::market_chart_body(&[20.0; 91]);
    let mock_server = test_utils::create_mock_server("solana", 90, 200, &body).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());
    let config = AppConfig::load_from_path(&config_path).unwrap();

    let args = dcasim::SimulateArgs {
        asset: Some(Asset::Solana),
        monthly_contribution: Some(0.0),
        horizon: Some(Horizon::new(3).unwrap()),
        ..dcasim::SimulateArgs::default()
    };
    let request = args.to_request(&config.defaults).unwrap();
    let provider = CoinGeckoProvider::new(&config.providers.coingecko).unwrap();

    let report = dcasim::cli::simulate::execute(
        &provider,
        &request,
        &config.currency,
        DateAxis::Historical,
    )
    .await
    .unwrap();

    assert_eq!(report.asset, Asset::Solana);
    assert_eq!(report.horizon_months, 3);
    assert_eq!(report.monthly_contribution, 0.0);
    assert_eq!(report.result.total_invested, 0.0);
    assert_eq!(report.result.final_value, 0.0);
    assert_eq!(report.result.gain_loss_pct, None);
    assert_eq!(report.result.value_series.len(), 91);
}

#[test_log::test(tokio::test)]
async fn test_api_error_aborts_simulation() {
    let mock_server = test_utils::create_mock_server("ethereum", 30, 500, "").await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());

    let err = dcasim::run_command(
        dcasim::AppCommand::Simulate(dcasim::SimulateArgs::default()),
        Some(config_path.to_str().unwrap()),
    )
    .await
    .unwrap_err();
    info!(error = %err, "Simulation failed as expected");
    assert_eq!(err.to_string(), "Failed to fetch price history for Ethereum");
    assert_eq!(
        err.root_cause().to_string(),
        "HTTP error: 500 Internal Server Error for asset: ethereum"
    );
}

#[test_log::test(tokio::test)]
async fn test_empty_history_is_reported() {
    let body = test_utils::market_chart_body(&[]);
    let mock_server = test_utils::create_mock_server("ethereum", 30, 200, &body).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = test_utils::write_config(&dir, &mock_server.uri());

    let err = dcasim::run_command(
        dcasim::AppCommand::Simulate(dcasim::SimulateArgs::default()),
        Some(config_path.to_str().unwrap()),
    )
    .await
    .unwrap_err();
    assert_eq!(
        err.root_cause().to_string(),
        "Price series is empty, nothing to simulate"
    );
}

#[test_log::test(tokio::test)]
async fn test_invalid_config_file_is_reported() {
    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let config_path = dir.path().join("config.yaml");
    fs::write(&config_path, "defaults:\n  horizon_months: 48\n").unwrap();

    let err = dcasim::run_command(
        dcasim::AppCommand::Simulate(dcasim::SimulateArgs::default()),
        Some(config_path.to_str().unwrap()),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("Failed to parse config file"));
}

#[test_log::test(tokio::test)]
#[ignore = "hits the public CoinGecko API"]
async fn test_real_coingecko_api() {
    use dcasim::config::CoinGeckoProviderConfig;
    use dcasim::core::price::PriceHistoryProvider;
    use dcasim::providers::coingecko::CoinGeckoProvider;

    let provider = CoinGeckoProvider::new(&CoinGeckoProviderConfig::default()).unwrap();

    let asset = Asset::Bitcoin;
    info!(?asset, "Fetching price history from CoinGecko");

    match provider.fetch_daily_prices(asset.api_id(), 30, "eur").await {
        Ok(series) => {
            info!(points = series.len(), "Received price history");
            assert!(series.len() >= 30, "Expected at least 30 daily points");
            assert!(series.iter().all(|p| p.price > 0.0));
            assert!(
                series
                    .points()
                    .windows(2)
                    .all(|w| w[0].date < w[1].date)
            );
        }
        Err(e) => {
            error!("CoinGecko request failed: {e}\n{e:?}");
            panic!("CoinGecko request failed: {e}");
        }
    }
}

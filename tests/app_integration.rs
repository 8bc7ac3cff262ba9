use std::fs;
use tracing::info;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub async fn create_rates_mock_server(status: u16, mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v4/latest/USD"))
            .respond_with(ResponseTemplate::new(status).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    pub async fn mount_failure(mock_server: &MockServer) {
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(mock_server)
            .await;
    }

    pub fn write_config(base_url: &str) -> tempfile::NamedTempFile {
        let config_file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        let config_content = format!(
            r#"
            provider:
              base_url: {base_url}
            refresh_interval_secs: 600
            source: "USD"
            target: "PKR"
        "#
        );
        std::fs::write(config_file.path(), config_content).expect("Failed to write config file");
        config_file
    }
}

const RATES_RESPONSE: &str = r#"{
    "provider": "https://www.exchangerate-api.com",
    "base": "USD",
    "date": "2026-10-19",
    "rates": {"USD": 1, "EUR": 0.92, "GBP": 0.79, "JPY": 149.7, "AUD": 1.53, "CAD": 1.37, "PKR": 278.50}
}"#;

fn convert_request(amount: &str, swap: bool) -> fxconv::ConvertRequest {
    fxconv::ConvertRequest {
        amount: amount.to_string(),
        from: None,
        to: None,
        swap,
    }
}

#[test_log::test(tokio::test)]
async fn test_full_convert_flow_with_mock() {
    let mock_server = test_utils::create_rates_mock_server(200, RATES_RESPONSE).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert(convert_request("100", false)),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(
        result.is_ok(),
        "Convert command failed with: {:?}",
        result.err()
    );
}

#[test_log::test(tokio::test)]
async fn test_convert_once_renders_result() {
    use fxconv::cli::convert::convert_once;
    use fxconv::core::config::AppConfig;
    use fxconv::providers::ExchangeRateApiProvider;

    console::set_colors_enabled(false);
    let mock_server = test_utils::create_rates_mock_server(200, RATES_RESPONSE).await;
    let config_file = test_utils::write_config(&mock_server.uri());
    let config = AppConfig::load_from_path(config_file.path()).unwrap();
    let provider = ExchangeRateApiProvider::new(&config.provider.base_url);

    let output = convert_once(provider, &config, &convert_request("100", false))
        .await
        .unwrap();
    info!(%output, "Converted");
    assert!(output.starts_with("100.00 USD = 27850.00 PKR"));
}

#[test_log::test(tokio::test)]
async fn test_rates_flow_with_mock() {
    let mock_server = test_utils::create_rates_mock_server(200, RATES_RESPONSE).await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Rates,
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert!(result.is_ok(), "Rates command failed with: {:?}", result.err());
}

#[test_log::test(tokio::test)]
async fn test_convert_fails_when_service_errors() {
    let mock_server = test_utils::create_rates_mock_server(503, "").await;
    let config_file = test_utils::write_config(&mock_server.uri());

    let result = fxconv::run_command(
        fxconv::AppCommand::Convert(convert_request("100", false)),
        Some(config_file.path().to_str().unwrap()),
    )
    .await;
    assert_eq!(
        result.unwrap_err().to_string(),
        "Error fetching exchange rates."
    );
}

#[test_log::test(tokio::test)]
async fn test_widget_against_mock_service() {
    use fxconv::core::{Currency, FETCH_ERROR_MESSAGE};
    use fxconv::providers::ExchangeRateApiProvider;
    use std::time::Duration;

    let mock_server = test_utils::create_rates_mock_server(200, RATES_RESPONSE).await;
    let provider = ExchangeRateApiProvider::new(&mock_server.uri());
    let mut widget = fxconv::RateConverterWidget::mount_with_selection(
        provider,
        Duration::from_secs(600),
        Currency::Eur,
        Currency::Gbp,
    );

    widget.refreshed().await.unwrap();
    widget.set_amount_input("50").await;
    assert_eq!(widget.convert().await, "42.93");
    assert_eq!(widget.swap().await, "58.23");

    // Service goes down; the last good table stays in place.
    mock_server.reset().await;
    test_utils::mount_failure(&mock_server).await;
    widget.refresh_now().await.unwrap();

    let state = widget.snapshot().await;
    assert_eq!(state.error(), Some(FETCH_ERROR_MESSAGE));
    assert_eq!(state.rates().get(Currency::Pkr), Some(278.50));
    assert_eq!(widget.convert().await, "58.23");

    widget.teardown();
}

#[test]
fn test_setup_writes_loadable_config() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let path = temp_dir.path().join("config.yaml");

    fxconv::cli::setup::setup_at_path(&path).unwrap();
    assert!(fs::metadata(&path).is_ok());

    let config = fxconv::core::config::AppConfig::load_from_path(&path).unwrap();
    assert_eq!(config.refresh_interval_secs, 600);
}

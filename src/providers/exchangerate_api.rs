use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::core::{Currency, RateProvider, RateTable};

pub const DEFAULT_BASE_URL: &str = "https://api.exchangerate-api.com";

const USER_AGENT: &str = concat!("fxconv/", env!("CARGO_PKG_VERSION"));

/// Latest USD-based rates from an exchangerate-api compatible service.
pub struct ExchangeRateApiProvider {
    base_url: String,
}

impl ExchangeRateApiProvider {
    pub fn new(base_url: &str) -> Self {
        ExchangeRateApiProvider {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn latest_url(&self) -> String {
        format!("{}/v4/latest/{}", self.base_url, Currency::BASE)
    }
}

#[derive(Debug, Deserialize)]
struct LatestRatesResponse {
    base: Option<String>,
    rates: HashMap<String, f64>,
}

#[async_trait]
impl RateProvider for ExchangeRateApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self), fields(base_url = %self.base_url))]
    async fn fetch_rates(&self) -> Result<RateTable> {
        let url = self.latest_url();
        debug!("Requesting exchange rates from {}", url);

        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;
        let response = client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} URL: {}", e, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for exchange rates URL: {}",
                response.status(),
                url
            ));
        }

        let text = response.text().await?;
        let data: LatestRatesResponse = serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse exchange rates response: {}", e))?;

        if let Some(base) = data.base.as_deref()
            && !base.eq_ignore_ascii_case(Currency::BASE.code())
        {
            return Err(anyhow!(
                "Unexpected base currency: {} (expected {})",
                base,
                Currency::BASE
            ));
        }

        let table = RateTable::from_rates(data.rates, Utc::now());
        debug!(count = table.len(), "Received exchange rates");
        Ok(table)
    }
}

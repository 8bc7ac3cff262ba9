//! Exchange rate table and the provider abstraction that fills it

use super::currency::Currency;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

/// Rates quoted as units of a currency per one unit of [`Currency::BASE`].
///
/// A table is always replaced as a whole; there is no per-entry update.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<String, f64>,
    fetched_at: Option<DateTime<Utc>>,
}

impl RateTable {
    pub fn empty() -> Self {
        Self {
            rates: HashMap::new(),
            fetched_at: None,
        }
    }

    /// Builds a table from raw service data, dropping entries that are not
    /// finite and positive.
    pub fn from_rates(raw: HashMap<String, f64>, fetched_at: DateTime<Utc>) -> Self {
        let rates = raw
            .into_iter()
            .filter(|(code, rate)| {
                let valid = rate.is_finite() && *rate > 0.0;
                if !valid {
                    debug!(code = %code, rate = %rate, "Dropping invalid rate");
                }
                valid
            })
            .map(|(code, rate)| (code.to_uppercase(), rate))
            .collect();

        Self {
            rates,
            fetched_at: Some(fetched_at),
        }
    }

    pub fn get(&self, currency: Currency) -> Option<f64> {
        self.get_code(currency.code())
    }

    pub fn get_code(&self, code: &str) -> Option<f64> {
        self.rates.get(code).copied()
    }

    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::empty()
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rates(&self) -> Result<RateTable>;
}

//! Converter state and the transitions user actions and fetches apply to it

use super::convert::{self, ConversionResult};
use super::currency::Currency;
use super::rates::RateTable;
use anyhow::Result;
use tracing::{debug, warn};

pub const FETCH_ERROR_MESSAGE: &str = "Error fetching exchange rates.";

const INITIAL_DISPLAY: &str = "0.00";

/// Inputs behind the currently displayed result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayedConversion {
    pub amount: f64,
    pub source: Currency,
    pub target: Currency,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterState {
    amount: Option<f64>,
    source: Currency,
    target: Currency,
    rates: RateTable,
    converted: String,
    displayed: Option<DisplayedConversion>,
    loading: bool,
    error: Option<String>,
}

impl ConverterState {
    pub fn new(source: Currency, target: Currency) -> Self {
        Self {
            amount: None,
            source,
            target,
            rates: RateTable::empty(),
            converted: INITIAL_DISPLAY.to_string(),
            displayed: None,
            loading: false,
            error: None,
        }
    }

    pub fn amount(&self) -> Option<f64> {
        self.amount
    }

    pub fn source(&self) -> Currency {
        self.source
    }

    pub fn target(&self) -> Currency {
        self.target
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Last displayed result, `"0.00"` until a conversion succeeds.
    pub fn converted(&self) -> &str {
        &self.converted
    }

    /// What produced the displayed result, if any conversion has happened.
    pub fn displayed(&self) -> Option<&DisplayedConversion> {
        self.displayed.as_ref()
    }

    /// Rate behind the displayed result, if any conversion has happened.
    pub fn last_rate(&self) -> Option<f64> {
        self.displayed.map(|d| d.rate)
    }

    /// True when the displayed result was computed from the current amount
    /// and selection.
    pub fn is_display_current(&self) -> bool {
        self.displayed.is_some_and(|d| {
            Some(d.amount) == self.amount && d.source == self.source && d.target == self.target
        })
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Stores free-form amount text. Anything that isn't a finite number
    /// clears the amount.
    pub fn set_amount_input(&mut self, input: &str) {
        let parsed = input.trim().parse::<f64>().ok().filter(|a| a.is_finite());
        if parsed.is_none() && !input.trim().is_empty() {
            debug!(input = %input, "Ignoring non-numeric amount");
        }
        self.amount = parsed;
    }

    pub fn set_amount(&mut self, amount: Option<f64>) {
        self.amount = amount;
    }

    pub fn set_source(&mut self, source: Currency) {
        self.source = source;
    }

    pub fn set_target(&mut self, target: Currency) {
        self.target = target;
    }

    /// Updates the displayed result. Leaves it untouched when the inputs or
    /// rates can't produce a number.
    pub fn convert(&mut self) -> Option<ConversionResult> {
        let result = convert::convert(self.amount, self.source, self.target, &self.rates);
        match &result {
            Some(r) => {
                self.converted = r.display();
                self.displayed = self.amount.map(|amount| DisplayedConversion {
                    amount,
                    source: self.source,
                    target: self.target,
                    rate: r.rate,
                });
                debug!(
                    amount = ?self.amount,
                    source = %self.source,
                    target = %self.target,
                    converted = %self.converted,
                    "Converted"
                );
            }
            None => debug!(
                amount = ?self.amount,
                source = %self.source,
                target = %self.target,
                rates = self.rates.len(),
                "Nothing to convert"
            ),
        }
        result
    }

    /// Swaps source and target, then converts with the swapped pair.
    pub fn swap(&mut self) -> Option<ConversionResult> {
        std::mem::swap(&mut self.source, &mut self.target);
        self.convert()
    }

    pub fn begin_fetch(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Applies a fetch outcome. A failure keeps the previous table.
    pub fn finish_fetch(&mut self, result: Result<RateTable>) {
        match result {
            Ok(table) => {
                debug!(count = table.len(), "Replacing rate table");
                self.rates = table;
            }
            Err(e) => {
                warn!(error = %e, "Rate fetch failed");
                self.error = Some(FETCH_ERROR_MESSAGE.to_string());
            }
        }
        self.loading = false;
    }
}

impl Default for ConverterState {
    fn default() -> Self {
        Self::new(Currency::Usd, Currency::Pkr)
    }
}

//! Conversion between two supported currencies through the base-quoted table

use super::currency::Currency;
use super::rates::RateTable;

#[derive(Debug, Clone, PartialEq)]
pub struct ConversionResult {
    pub value: f64,
    pub rate: f64,
}

impl ConversionResult {
    /// Two fractional digits, rounded.
    pub fn display(&self) -> String {
        format!("{:.2}", self.value)
    }
}

/// Conversion factor from `source` to `target`.
///
/// A base-currency source uses the target's rate directly, so the table does
/// not need an entry for the base itself.
pub fn effective_rate(source: Currency, target: Currency, rates: &RateTable) -> Option<f64> {
    let target_rate = rates.get(target)?;
    let rate = if source.is_base() {
        target_rate
    } else {
        target_rate / rates.get(source)?
    };
    rate.is_finite().then_some(rate)
}

/// Converts `amount` or returns `None` when there is nothing meaningful to show.
///
/// Absent and zero amounts are both treated as "no input".
pub fn convert(
    amount: Option<f64>,
    source: Currency,
    target: Currency,
    rates: &RateTable,
) -> Option<ConversionResult> {
    let amount = amount.filter(|a| a.is_finite() && *a != 0.0)?;
    let rate = effective_rate(source, target, rates)?;
    let value = amount * rate;
    value.is_finite().then_some(ConversionResult { value, rate })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::HashMap;

    fn table(entries: &[(&str, f64)]) -> RateTable {
        let raw = entries
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect::<HashMap<_, _>>();
        RateTable::from_rates(raw, Utc::now())
    }

    fn sample_rates() -> RateTable {
        table(&[
            ("USD", 1.0),
            ("EUR", 0.92),
            ("GBP", 0.79),
            ("JPY", 149.7),
            ("AUD", 1.53),
            ("CAD", 1.37),
            ("PKR", 278.5),
        ])
    }

    #[test]
    fn test_usd_to_pkr() {
        let rates = table(&[("USD", 1.0), ("PKR", 278.50)]);
        let result = convert(Some(100.0), Currency::Usd, Currency::Pkr, &rates).unwrap();
        assert_eq!(result.display(), "27850.00");
    }

    #[test]
    fn test_eur_to_gbp_uses_cross_rate() {
        let rates = table(&[("USD", 1.0), ("EUR", 0.92), ("GBP", 0.79)]);
        let result = convert(Some(50.0), Currency::Eur, Currency::Gbp, &rates).unwrap();
        assert!((result.rate - 0.79 / 0.92).abs() < 1e-12);
        assert_eq!(result.display(), "42.93");
    }

    #[test]
    fn test_base_source_does_not_need_base_entry() {
        let rates = table(&[("EUR", 0.92)]);
        let result = convert(Some(10.0), Currency::Usd, Currency::Eur, &rates).unwrap();
        assert_eq!(result.display(), "9.20");
    }

    #[test]
    fn test_identity_conversion() {
        let rates = sample_rates();
        for currency in Currency::ALL {
            for amount in [1.0, 12.5, 999.99, 0.01] {
                let result = convert(Some(amount), currency, currency, &rates).unwrap();
                assert_eq!(result.display(), format!("{amount:.2}"));
            }
        }
    }

    #[test]
    fn test_inverse_relationship() {
        let rates = sample_rates();
        for source in Currency::ALL {
            for target in Currency::ALL {
                let forward = convert(Some(1.0), source, target, &rates).unwrap().value;
                let backward = convert(Some(1.0), target, source, &rates).unwrap().value;
                assert!(
                    (forward * backward - 1.0).abs() < 1e-9,
                    "{source}->{target}: {forward} * {backward} != 1"
                );
            }
        }
    }

    #[test]
    fn test_missing_rates_are_noop() {
        let empty = RateTable::empty();
        assert!(convert(Some(10.0), Currency::Usd, Currency::Pkr, &empty).is_none());
        assert!(convert(Some(10.0), Currency::Usd, Currency::Usd, &empty).is_none());

        let partial = table(&[("USD", 1.0), ("GBP", 0.79)]);
        assert!(convert(Some(10.0), Currency::Eur, Currency::Gbp, &partial).is_none());
        assert!(convert(Some(10.0), Currency::Gbp, Currency::Eur, &partial).is_none());
    }

    #[test]
    fn test_absent_or_zero_amount_is_noop() {
        let rates = sample_rates();
        assert!(convert(None, Currency::Usd, Currency::Pkr, &rates).is_none());
        assert!(convert(Some(0.0), Currency::Usd, Currency::Pkr, &rates).is_none());
        assert!(convert(Some(f64::NAN), Currency::Usd, Currency::Pkr, &rates).is_none());
        assert!(convert(Some(f64::INFINITY), Currency::Usd, Currency::Pkr, &rates).is_none());
    }

    #[test]
    fn test_overflowing_product_is_noop() {
        let rates = sample_rates();
        assert!(convert(Some(f64::MAX), Currency::Usd, Currency::Pkr, &rates).is_none());
    }

    #[test]
    fn test_negative_amount_converts() {
        let rates = sample_rates();
        let result = convert(Some(-2.0), Currency::Usd, Currency::Eur, &rates).unwrap();
        assert_eq!(result.display(), "-1.84");
    }
}

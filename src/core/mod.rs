//! Core conversion logic and abstractions

pub mod config;
pub mod convert;
pub mod currency;
pub mod log;
pub mod rates;
pub mod refresh;
pub mod state;

// Re-export main types for cleaner imports
pub use convert::{ConversionResult, convert, effective_rate};
pub use currency::Currency;
pub use rates::{RateProvider, RateTable};
pub use state::{ConverterState, FETCH_ERROR_MESSAGE};

pub mod cli;
pub mod core;
pub mod providers;
pub mod widget;

pub use cli::convert::ConvertRequest;
pub use widget::RateConverterWidget;

use crate::core::config::AppConfig;
use crate::providers::ExchangeRateApiProvider;
use anyhow::Result;
use tracing::{debug, info};

pub enum AppCommand {
    Convert(ConvertRequest),
    Rates,
    Watch,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("fxconv starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let provider = ExchangeRateApiProvider::new(&config.provider.base_url);

    match command {
        AppCommand::Convert(request) => cli::convert::run(provider, &config, &request).await,
        AppCommand::Rates => cli::rates::run(provider, &config).await,
        AppCommand::Watch => cli::watch::run(provider, &config).await,
    }
}

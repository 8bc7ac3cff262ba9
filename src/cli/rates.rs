use super::ui;
use crate::core::RateProvider;
use crate::core::config::AppConfig;
use crate::widget::RateConverterWidget;
use anyhow::{Result, anyhow};

/// Fetches the current table once and prints it.
pub async fn run<P>(provider: P, config: &AppConfig) -> Result<()>
where
    P: RateProvider + 'static,
{
    let mut widget = RateConverterWidget::mount_with_selection(
        provider,
        config.refresh_interval(),
        config.source,
        config.target,
    );
    let state = super::wait_for_initial_rates(&mut widget).await?;
    widget.teardown();

    if let Some(error) = state.error() {
        eprintln!("{}", ui::error_banner(error));
        return Err(anyhow!("{error}"));
    }

    println!("{}", ui::display_rates_table(state.rates()));
    Ok(())
}

use super::ui;
use crate::core::config::AppConfig;
use crate::core::{Currency, RateProvider};
use crate::widget::RateConverterWidget;
use anyhow::{Result, anyhow};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pub amount: String,
    pub from: Option<Currency>,
    pub to: Option<Currency>,
    pub swap: bool,
}

/// Mounts the converter, waits for rates, converts once and prints the result.
pub async fn run<P>(provider: P, config: &AppConfig, request: &ConvertRequest) -> Result<()>
where
    P: RateProvider + 'static,
{
    let output = convert_once(provider, config, request).await?;
    println!("{output}");
    Ok(())
}

/// Same as [`run`] but returns the rendered line instead of printing it.
pub async fn convert_once<P>(
    provider: P,
    config: &AppConfig,
    request: &ConvertRequest,
) -> Result<String>
where
    P: RateProvider + 'static,
{
    let source = request.from.unwrap_or(config.source);
    let target = request.to.unwrap_or(config.target);
    let mut widget = RateConverterWidget::mount_with_selection(
        provider,
        config.refresh_interval(),
        source,
        target,
    );

    let state = super::wait_for_initial_rates(&mut widget).await?;
    if let Some(error) = state.error() {
        widget.teardown();
        eprintln!("{}", ui::error_banner(error));
        return Err(anyhow!("{error}"));
    }

    widget.set_amount_input(&request.amount).await;
    if request.swap {
        widget.swap().await;
    } else {
        widget.convert().await;
    }
    let state = widget.snapshot().await;
    widget.teardown();

    if !state.is_display_current() {
        debug!(?request, "Conversion produced no result");
        return Err(match state.amount().filter(|a| *a != 0.0) {
            None => anyhow!("Invalid amount: {:?}", request.amount),
            Some(_) => anyhow!(
                "No exchange rate available for {} -> {}",
                state.source(),
                state.target()
            ),
        });
    }

    Ok(ui::render_conversion(&state))
}

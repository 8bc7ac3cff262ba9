pub mod convert;
pub mod rates;
pub mod setup;
pub mod ui;
pub mod watch;

use crate::core::ConverterState;
use crate::widget::RateConverterWidget;
use anyhow::Result;

/// Waits for the converter's first fetch behind a spinner.
pub(crate) async fn wait_for_initial_rates(
    widget: &mut RateConverterWidget,
) -> Result<ConverterState> {
    let pb = ui::new_spinner("Fetching exchange rates...");
    let result = widget.refreshed().await;
    pb.finish_and_clear();
    result?;
    Ok(widget.snapshot().await)
}

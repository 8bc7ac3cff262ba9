//! Interactive session that keeps the converter mounted and refreshing.

use super::ui;
use crate::core::config::AppConfig;
use crate::core::{Currency, RateProvider};
use crate::widget::RateConverterWidget;
use anyhow::{Result, anyhow};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

const HELP: &str = "\
Commands:
  amount <value>   set the amount to convert
  from <code>      set the source currency
  to <code>        set the target currency
  convert          convert with the current selection
  swap             swap source and target, then convert
  rates            show the current rate table
  refresh          fetch rates now
  status           show the converter state
  help             show this message
  quit             leave";

#[derive(Debug, Clone, PartialEq)]
pub enum WatchCommand {
    Amount(String),
    From(Currency),
    To(Currency),
    Convert,
    Swap,
    Rates,
    Refresh,
    Status,
    Help,
    Quit,
}

impl std::str::FromStr for WatchCommand {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (name, arg) = line
            .split_once(char::is_whitespace)
            .map_or((line, ""), |(name, arg)| (name, arg.trim()));

        let require_arg = || {
            if arg.is_empty() {
                Err(anyhow!("'{}' needs an argument", name))
            } else {
                Ok(arg)
            }
        };

        match name.to_lowercase().as_str() {
            "amount" | "a" => Ok(WatchCommand::Amount(require_arg()?.to_string())),
            "from" => Ok(WatchCommand::From(require_arg()?.parse()?)),
            "to" => Ok(WatchCommand::To(require_arg()?.parse()?)),
            "convert" | "c" => Ok(WatchCommand::Convert),
            "swap" | "s" => Ok(WatchCommand::Swap),
            "rates" => Ok(WatchCommand::Rates),
            "refresh" => Ok(WatchCommand::Refresh),
            "status" => Ok(WatchCommand::Status),
            "help" | "?" => Ok(WatchCommand::Help),
            "quit" | "exit" | "q" => Ok(WatchCommand::Quit),
            _ => Err(anyhow!("Unknown command: {} (try 'help')", name)),
        }
    }
}

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
    let input = BufReader::new(tokio::io::stdin());
    let result = run_session(&widget, input, &mut std::io::stdout()).await;
    widget.teardown();
    result
}

/// Reads commands until `quit` or end of input, printing the converter after
/// each one and whenever a background refresh lands.
pub async fn run_session<R, W>(widget: &RateConverterWidget, input: R, out: &mut W) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut updates = widget.subscribe();
    let mut lines = input.lines();
    writeln!(out, "{HELP}")?;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = widget.snapshot().await;
                match state.error() {
                    Some(error) => writeln!(out, "{}", ui::error_banner(error))?,
                    None => writeln!(
                        out,
                        "{}",
                        ui::style_text(
                            &format!("Exchange rates updated ({} currencies)", state.rates().len()),
                            ui::StyleType::Subtle,
                        )
                    )?,
                }
            }
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<WatchCommand>() {
                    Ok(WatchCommand::Quit) => break,
                    Ok(command) => apply(widget, command, out).await?,
                    Err(e) => writeln!(out, "{}", ui::error_banner(&e.to_string()))?,
                }
            }
        }
    }

    debug!("Leaving watch session");
    Ok(())
}

async fn apply<W: Write>(
    widget: &RateConverterWidget,
    command: WatchCommand,
    out: &mut W,
) -> Result<()> {
    match command {
        WatchCommand::Amount(text) => widget.set_amount_input(&text).await,
        WatchCommand::From(currency) => widget.set_source(currency).await,
        WatchCommand::To(currency) => widget.set_target(currency).await,
        WatchCommand::Convert => {
            widget.convert().await;
            let state = widget.snapshot().await;
            writeln!(out, "{}", ui::render_conversion(&state))?;
            return Ok(());
        }
        WatchCommand::Swap => {
            widget.swap().await;
            let state = widget.snapshot().await;
            writeln!(out, "{}", ui::render_conversion(&state))?;
            return Ok(());
        }
        WatchCommand::Rates => {
            let state = widget.snapshot().await;
            writeln!(out, "{}", ui::display_rates_table(state.rates()))?;
            return Ok(());
        }
        WatchCommand::Refresh => {
            let pb = ui::new_spinner("Fetching exchange rates...");
            let result = widget.refresh_now().await;
            pb.finish_and_clear();
            if let Err(e) = result {
                writeln!(out, "{}", ui::error_banner(&e.to_string()))?;
                return Ok(());
            }
        }
        WatchCommand::Help => {
            writeln!(out, "{HELP}")?;
            return Ok(());
        }
        WatchCommand::Status | WatchCommand::Quit => {}
    }

    let state = widget.snapshot().await;
    writeln!(out, "{}", ui::render_status(&state))?;
    Ok(())
}

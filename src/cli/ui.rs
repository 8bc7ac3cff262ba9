use crate::core::{ConverterState, Currency, RateTable};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Result,
    Error,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Result => style(text).green().bold(),
        StyleType::Error => style(text).red(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Spinner shown while rates are loading.
pub fn new_spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn error_banner(message: &str) -> String {
    format!("{} {}", style_text("✗", StyleType::Error), style_text(message, StyleType::Error))
}

/// One-line summary of the displayed result, e.g. `100.00 USD = 27850.00 PKR`.
///
/// The equation always uses the inputs that produced the result. When the
/// current input doesn't match them, a note says nothing was converted.
pub fn render_conversion(state: &ConverterState) -> String {
    let mut output = match state.displayed() {
        Some(shown) => format!(
            "{:.2} {} = {} {}{}",
            shown.amount,
            shown.source,
            style_text(state.converted(), StyleType::Result),
            shown.target,
            style_text(
                &format!("  (1 {} = {:.4} {})", shown.source, shown.rate, shown.target),
                StyleType::Subtle,
            )
        ),
        None => style_text(state.converted(), StyleType::Result),
    };
    if !state.is_display_current() {
        let amount = state
            .amount()
            .map_or("no amount".to_string(), |a| format!("{a:.2}"));
        output.push_str(&style_text(
            &format!(
                "  Nothing to convert for {} {} -> {}",
                amount,
                state.source(),
                state.target()
            ),
            StyleType::Subtle,
        ));
    }
    output
}

/// Full view of the converter: selection, result, loading and error state.
pub fn render_status(state: &ConverterState) -> String {
    let mut lines = vec![
        style_text("Currency Converter", StyleType::Title),
        format!(
            "{} {}",
            style_text("Amount:", StyleType::Label),
            state
                .amount()
                .map_or("(not set)".to_string(), |a| a.to_string())
        ),
        format!(
            "{} {}  {} {}",
            style_text("From:", StyleType::Label),
            state.source(),
            style_text("To:", StyleType::Label),
            state.target()
        ),
        format!(
            "{} {}",
            style_text("Converted:", StyleType::Label),
            style_text(state.converted(), StyleType::Result)
        ),
        format!(
            "{} {}",
            style_text("Rates:", StyleType::Label),
            rates_summary(state.rates())
        ),
    ];
    if state.is_loading() {
        lines.push(style_text("Loading exchange rates...", StyleType::Subtle));
    }
    if let Some(error) = state.error() {
        lines.push(error_banner(error));
    }
    lines.join("\n")
}

fn rates_summary(rates: &RateTable) -> String {
    match rates.fetched_at() {
        Some(at) if !rates.is_empty() => format!(
            "{} currencies, updated {}",
            rates.len(),
            at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        _ => style_text("not loaded", StyleType::Subtle),
    }
}

/// Table of supported currencies against the base.
pub fn display_rates_table(rates: &RateTable) -> String {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("Currency"),
        header_cell(&format!("Per 1 {}", Currency::BASE)),
        header_cell(&format!("1 unit in {}", Currency::BASE)),
    ]);

    for currency in Currency::ALL {
        let rate = rates
            .get(currency)
            .or_else(|| (currency.is_base() && !rates.is_empty()).then_some(1.0));
        table.add_row(vec![
            Cell::new(currency.code()),
            format_optional_cell(rate, |r| format!("{r:.4}")),
            format_optional_cell(rate, |r| format!("{:.4}", 1.0 / r)),
        ]);
    }

    format!(
        "{}\n\n{}\n{}",
        style_text("Exchange Rates", StyleType::Title),
        table,
        style_text(&format!("Last updated: {}", rates_summary(rates)), StyleType::Subtle)
    )
}

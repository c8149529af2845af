use super::ui;
use crate::collector::collect_rates_with_progress;
use crate::core::{ExchangeRate, RateProvider};
use anyhow::{Context, Result};
use clap::ValueEnum;
use comfy_table::Cell;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub fn display_as_table(rates: &[ExchangeRate]) -> String {
    let mut table = ui::new_styled_table();

    table.set_header(vec![
        ui::header_cell("Pair"),
        ui::header_cell("Buy"),
        ui::header_cell("Sell"),
        ui::header_cell("Spread"),
        ui::header_cell("Timestamp (UTC)"),
    ]);

    for rate in rates {
        table.add_row(vec![
            Cell::new(&rate.currency_pair),
            ui::rate_cell(rate.buy_rate),
            ui::rate_cell(rate.sell_rate),
            ui::subtle_rate_cell(rate.spread()),
            Cell::new(rate.timestamp.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }

    format!(
        "{}\n\n{}\n{}",
        ui::style_text("Exchange rates", ui::StyleType::Title),
        table,
        ui::style_text(
            &format!("{} currency pairs, spread = sell - buy", rates.len()),
            ui::StyleType::Subtle
        )
    )
}

pub fn render(rates: &[ExchangeRate], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(display_as_table(rates)),
        OutputFormat::Json => {
            serde_json::to_string_pretty(rates).context("Failed to serialize exchange rates")
        }
    }
}

/// Fetches every pair in order and prints the result set.
pub async fn run(provider: &dyn RateProvider, pairs: &[String], format: OutputFormat) -> Result<()> {
    let pb = ui::new_progress_bar(pairs.len() as u64);
    pb.set_message("Fetching rates");

    let result = collect_rates_with_progress(provider, pairs, |rate| {
        pb.set_message(rate.currency_pair.clone());
        pb.inc(1);
    })
    .await;
    pb.finish_and_clear();

    let rates = result.context("Failed to fetch exchange rates")?;
    println!("{}", render(&rates, format)?);
    Ok(())
}

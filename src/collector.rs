//! Sequential collection of rates for a list of currency pairs

use crate::core::{ExchangeRate, RateError, RateProvider};
use tracing::{debug, info};

/// Fetches `pairs` one after another, in order.
///
/// Stops at the first failure and returns that error alone; rates fetched
/// before it are dropped.
pub async fn collect_rates(
    provider: &dyn RateProvider,
    pairs: &[String],
) -> Result<Vec<ExchangeRate>, RateError> {
    collect_rates_with_progress(provider, pairs, |_| {}).await
}

/// Like [`collect_rates`], calling `on_fetched` after each successful pair.
pub async fn collect_rates_with_progress<F>(
    provider: &dyn RateProvider,
    pairs: &[String],
    mut on_fetched: F,
) -> Result<Vec<ExchangeRate>, RateError>
where
    F: FnMut(&ExchangeRate),
{
    let mut rates = Vec::with_capacity(pairs.len());
    for pair in pairs {
        let rate = provider.fetch_rate(pair).await?;
        debug!(%pair, buy = %rate.buy_rate, sell = %rate.sell_rate, "Fetched rate");
        on_fetched(&rate);
        rates.push(rate);
    }
    info!("Fetched {} exchange rates", rates.len());
    Ok(rates)
}

//! Exchange rate record and the provider abstraction

use super::error::RateError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Currency pairs fetched when none are configured.
pub const DEFAULT_PAIRS: [&str; 4] = ["USDPLN", "GBPPLN", "CHFPLN", "EURPLN"];

/// A buy/sell quote for one currency pair, stamped with the server's
/// transaction time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExchangeRate {
    pub timestamp: DateTime<Utc>,
    pub currency_pair: String,
    pub buy_rate: Decimal,
    pub sell_rate: Decimal,
}

impl ExchangeRate {
    pub fn spread(&self) -> Decimal {
        self.sell_rate - self.buy_rate
    }
}

#[async_trait]
pub trait RateProvider: Send + Sync {
    async fn fetch_rate(&self, pair: &str) -> Result<ExchangeRate, RateError>;
}

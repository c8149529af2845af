use crate::core::config::{ApiConfig, is_valid_pair};
use crate::core::signer::{RequestSigner, SigningKey};
use crate::core::{ExchangeRate, RateError, RateProvider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::{debug, error, instrument, warn};

pub const RATES_ENDPOINT: &str = "/api/v2.0.0/direct_fx/rates";

/// Fetches direct FX quotes, signing every request with the account key.
pub struct WalutomatProvider {
    base_url: String,
    client: reqwest::Client,
    signer: RequestSigner,
}

impl WalutomatProvider {
    pub fn new(config: &ApiConfig, key: SigningKey) -> Result<Self, RateError> {
        let mut builder =
            reqwest::Client::builder().user_agent(concat!("fxrates/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(RateError::Client)?;

        Ok(WalutomatProvider {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
            signer: RequestSigner::new(config.api_key.clone(), key),
        })
    }

    /// Path and query of the rates endpoint; this exact string is signed.
    pub fn rates_path(pair: &str) -> String {
        format!("{RATES_ENDPOINT}?currencyPair={pair}")
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    success: bool,
    result: Option<RateResult>,
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateResult {
    ts: String,
    currency_pair: String,
    buy_rate: String,
    sell_rate: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    key: Option<String>,
    description: Option<String>,
}

impl ApiErrorEntry {
    fn message(&self) -> Option<&str> {
        self.description.as_deref().or(self.key.as_deref())
    }
}

/// Matches the JSON number grammar `-?(0|[1-9]\d*)(\.\d+)?([eE][+-]?\d+)?`.
fn is_json_number(value: &str) -> bool {
    fn digits(bytes: &[u8]) -> usize {
        bytes.iter().take_while(|b| b.is_ascii_digit()).count()
    }

    let bytes = value.as_bytes();
    let mut i = usize::from(bytes.first() == Some(&b'-'));

    let int_len = digits(&bytes[i..]);
    if int_len == 0 || (int_len > 1 && bytes[i] == b'0') {
        return false;
    }
    i += int_len;

    if bytes.get(i) == Some(&b'.') {
        let frac_len = digits(&bytes[i + 1..]);
        if frac_len == 0 {
            return false;
        }
        i += 1 + frac_len;
    }

    if matches!(bytes.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(bytes.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_len = digits(&bytes[i..]);
        if exp_len == 0 {
            return false;
        }
        i += exp_len;
    }

    i == bytes.len()
}

fn parse_decimal(pair: &str, field: &str, value: &str) -> Result<Decimal, RateError> {
    let invalid = || RateError::Parse {
        pair: pair.to_string(),
        reason: format!("{field} '{value}' is not a decimal number"),
    };
    if !is_json_number(value) {
        return Err(invalid());
    }
    Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| invalid())
}

/// Decodes one rates response body. `pair` is the requested pair and is used
/// for error reporting only.
fn parse_rates_response(
    pair: &str,
    status: StatusCode,
    body: &str,
) -> Result<ExchangeRate, RateError> {
    let response: RatesResponse = match serde_json::from_str(body) {
        Ok(data) => data,
        Err(e) => {
            error!(error = ?e, response = %body, "Failed to parse rates response");
            return Err(RateError::Parse {
                pair: pair.to_string(),
                reason: e.to_string(),
            });
        }
    };

    if !response.success {
        let messages: Vec<&str> = response
            .errors
            .iter()
            .filter_map(ApiErrorEntry::message)
            .collect();
        let message = if messages.is_empty() {
            format!("request unsuccessful (HTTP {status})")
        } else {
            messages.join("; ")
        };
        return Err(RateError::Api {
            pair: pair.to_string(),
            message,
        });
    }

    let result = response.result.ok_or_else(|| RateError::Parse {
        pair: pair.to_string(),
        reason: "missing result".to_string(),
    })?;

    let buy_rate = parse_decimal(pair, "buyRate", &result.buy_rate)?;
    let sell_rate = parse_decimal(pair, "sellRate", &result.sell_rate)?;

    let timestamp = DateTime::parse_from_rfc3339(&result.ts)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|source| RateError::TimeFormat {
            pair: pair.to_string(),
            value: result.ts.clone(),
            source,
        })?;

    if result.currency_pair != pair {
        warn!(
            requested = pair,
            returned = %result.currency_pair,
            "Server returned a different currency pair"
        );
    }

    Ok(ExchangeRate {
        timestamp,
        currency_pair: result.currency_pair,
        buy_rate,
        sell_rate,
    })
}

#[async_trait]
impl RateProvider for WalutomatProvider {
    #[instrument(name = "WalutomatRateFetch", skip(self), fields(pair = %pair))]
    async fn fetch_rate(&self, pair: &str) -> Result<ExchangeRate, RateError> {
        if !is_valid_pair(pair) {
            return Err(RateError::InvalidPair(pair.to_string()));
        }
        let path = Self::rates_path(pair);
        let headers = self
            .signer
            .sign_get(&path)
            .map_err(|source| RateError::Signing {
                pair: pair.to_string(),
                source,
            })?;

        let url = format!("{}{}", self.base_url, path);
        debug!("Requesting rate from {}", url);

        let mut request = self.client.get(&url);
        for (name, value) in headers.to_pairs() {
            request = request.header(name, value);
        }

        let response = request.send().await.map_err(|source| RateError::Transport {
            pair: pair.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%status, "Non-success status for currency pair {}", pair);
        }

        let body = response.text().await.map_err(|source| RateError::Transport {
            pair: pair.to_string(),
            source,
        })?;
        debug!(%status, response = %body, "Received rate response");

        parse_rates_response(pair, status, &body)
    }
}

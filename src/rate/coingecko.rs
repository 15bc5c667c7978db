//! CoinGecko simple-price client

use super::{ExchangeRate, RateSource, RateUnavailable};
use crate::config::PriceFeedOptions;
use crate::error::{Error, Result};
use crate::payment::FiatCurrency;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Price source backed by the CoinGecko `/simple/price` endpoint
#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    http: reqwest::Client,
    base_url: String,
    asset_id: String,
}

impl CoinGeckoClient {
    /// Build a client from price feed options.
    pub fn new(options: &PriceFeedOptions) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")));

        if let Some(secs) = options.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| Error::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            asset_id: options.asset_id.clone(),
        })
    }

    /// Endpoint queried for every lookup
    pub fn endpoint(&self) -> String {
        format!("{}/simple/price", self.base_url)
    }

    async fn request(&self, currency: FiatCurrency) -> std::result::Result<Value, String> {
        let response = self
            .http
            .get(self.endpoint())
            .query(&[
                ("ids", self.asset_id.as_str()),
                ("vs_currencies", currency.feed_code()),
            ])
            .send()
            .await
            .map_err(|e| format!("request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("price feed answered {status}"));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| format!("invalid JSON body: {e}"))
    }
}

/// Pull `body[asset_id][currency]` out of a simple-price response.
pub(crate) fn extract_price(
    body: &Value,
    asset_id: &str,
    currency: FiatCurrency,
) -> std::result::Result<ExchangeRate, String> {
    let price = body
        .get(asset_id)
        .and_then(|asset| asset.get(currency.feed_code()))
        .ok_or_else(|| format!("response has no {asset_id}.{} field", currency.feed_code()))?;

    let value = price
        .as_f64()
        .ok_or_else(|| format!("price is not a number: {price}"))?;

    ExchangeRate::new(currency, value).ok_or_else(|| format!("price {value} is not positive"))
}

#[async_trait]
impl RateSource for CoinGeckoClient {
    async fn fetch_rate(
        &self,
        currency: FiatCurrency,
    ) -> std::result::Result<ExchangeRate, RateUnavailable> {
        tracing::debug!(endpoint = %self.endpoint(), asset = %self.asset_id, %currency, "Fetching XRP price");

        let outcome = match self.request(currency).await {
            Ok(body) => extract_price(&body, &self.asset_id, currency),
            Err(reason) => Err(reason),
        };

        match outcome {
            Ok(rate) => {
                tracing::debug!(rate = rate.value(), %currency, "Fetched XRP price");
                Ok(rate)
            }
            Err(reason) => {
                tracing::warn!(%currency, %reason, "Error fetching XRP price");
                Err(RateUnavailable::new(currency, reason))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extracts_lowercase_currency_field() {
        let body = json!({ "ripple": { "eur": 0.55 } });
        let rate = extract_price(&body, "ripple", FiatCurrency::Eur).unwrap();
        assert_eq!(rate.value(), 0.55);
        assert_eq!(rate.currency(), FiatCurrency::Eur);
    }

    #[test]
    fn integer_prices_are_accepted() {
        let body = json!({ "ripple": { "usd": 2 } });
        let rate = extract_price(&body, "ripple", FiatCurrency::Usd).unwrap();
        assert_eq!(rate.value(), 2.0);
    }

    #[test]
    fn unexpected_shapes_are_unavailable() {
        let bodies = [
            json!({}),
            json!({ "ripple": {} }),
            json!({ "ripple": { "usd": 0.6 } }),
            json!({ "ripple": { "eur": "0.55" } }),
            json!({ "ripple": { "eur": 0 } }),
            json!({ "error": "rate limited" }),
        ];

        for body in bodies {
            assert!(
                extract_price(&body, "ripple", FiatCurrency::Eur).is_err(),
                "accepted {body}"
            );
        }
    }

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let options = PriceFeedOptions {
            base_url: "http://127.0.0.1:1/api/v3/".to_string(),
            ..PriceFeedOptions::default()
        };
        let client = CoinGeckoClient::new(&options).unwrap();
        assert_eq!(client.endpoint(), "http://127.0.0.1:1/api/v3/simple/price");
    }
}

//! Binance REST Client
//!
//! Public, unauthenticated spot endpoints only.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::ExchangeClient;
use crate::error::{MarketError, Result};
use crate::model::{PriceTicker, Ticker24h};
use crate::symbol::Symbol;

/// Binance spot API v3
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com/api/v3";

/// Error body Binance sends with 4xx responses
#[derive(Deserialize)]
struct ApiErrorBody {
    msg: String,
}

/// Binance market-data client
pub struct BinanceClient {
    http: Client,
    base_url: String,
}

impl BinanceClient {
    /// Create a client; `timeout` bounds each request end to end
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MarketError::Config(e.to_string()))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, symbol: &Symbol) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        tracing::debug!(%url, %symbol, "Binance request");

        let response = self.http
            .get(&url)
            .query(&[("symbol", symbol.as_str())])
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|e| e.msg)
                .unwrap_or_else(|_| {
                    status.canonical_reason().unwrap_or("request failed").to_string()
                });
            return Err(MarketError::Api { status: status.as_u16(), message });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ExchangeClient for BinanceClient {
    async fn ticker_price(&self, symbol: &Symbol) -> Result<Decimal> {
        let ticker: PriceTicker = self.get_json("ticker/price", symbol).await?;
        Ok(ticker.price)
    }

    async fn ticker_24h(&self, symbol: &Symbol) -> Result<Ticker24h> {
        self.get_json("ticker", symbol).await
    }

    async fn health_check(&self) -> bool {
        let url = format!("{}/ping", self.base_url);
        match self.http.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("Binance health check failed: {}", e);
                false
            }
        }
    }

    fn name(&self) -> &str {
        "Binance"
    }
}

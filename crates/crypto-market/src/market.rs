//! Price and snapshot fetchers
//!
//! Both fetchers turn every upstream failure into a value: the price
//! fetcher into marker-prefixed text, the snapshot fetcher into
//! [`MarketSnapshot::Failed`]. Nothing here retries.

use std::sync::Arc;

use crate::error::{MarketError, Result};
use crate::exchange::ExchangeClient;
use crate::format::format_price_line;
use crate::model::{MarketData, MarketSnapshot};
use crate::symbol::Symbol;

/// Marker that opens every price-fetch failure message
pub const PRICE_ERROR_MARKER: &str = "❌";

/// Market-data facade over an exchange client
pub struct MarketService {
    exchange: Arc<dyn ExchangeClient>,
}

impl MarketService {
    pub fn new(exchange: Arc<dyn ExchangeClient>) -> Self {
        Self { exchange }
    }

    pub fn exchange(&self) -> &dyn ExchangeClient {
        self.exchange.as_ref()
    }

    /// Spot price line, or the upstream error
    pub async fn try_fetch_price(&self, symbol: &Symbol) -> Result<String> {
        let price = self.exchange.ticker_price(symbol).await?;
        Ok(format_price_line(symbol, price))
    }

    /// Spot price line; failures come back as text
    pub async fn fetch_price(&self, symbol: &Symbol) -> String {
        match self.try_fetch_price(symbol).await {
            Ok(line) => line,
            Err(e) => price_failure(symbol, &e),
        }
    }

    /// 24h statistics as a tagged snapshot
    pub async fn fetch_snapshot(&self, symbol: &Symbol) -> MarketSnapshot {
        match self.exchange.ticker_24h(symbol).await {
            Ok(ticker) => MarketSnapshot::Ready(MarketData::from_ticker(symbol.clone(), ticker)),
            Err(e) => {
                tracing::warn!(%symbol, exchange = self.exchange.name(), error = %e, "Snapshot fetch failed");
                MarketSnapshot::failed(e.to_string())
            }
        }
    }
}

/// User-facing text for a failed price lookup
pub(crate) fn price_failure(symbol: &Symbol, err: &MarketError) -> String {
    tracing::warn!(%symbol, error = %err, "Price fetch failed");
    format!("{PRICE_ERROR_MARKER} Error fetching {symbol} price: {err}")
}

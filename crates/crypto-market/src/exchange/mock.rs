//! Mock Exchange Client
//!
//! For testing and demo purposes. Returns realistic static tickers.

use std::collections::HashMap;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::ExchangeClient;
use crate::error::{MarketError, Result};
use crate::model::Ticker24h;
use crate::symbol::Symbol;

/// Mock exchange client with static tickers
pub struct MockExchangeClient {
    tickers: HashMap<String, Ticker24h>,
    offline: bool,
}

impl Default for MockExchangeClient {
    fn default() -> Self {
        Self::new()
    }
}

impl MockExchangeClient {
    /// Client preloaded with every allow-listed pair
    pub fn new() -> Self {
        // (price, 24h change %, high, low, volume)
        let table = [
            ("BTCUSDT", dec!(97500.00), dec!(2.50), dec!(98800.00), dec!(94100.00), dec!(21450.12)),
            ("ETHUSDT", dec!(3450.00), dec!(1.80), dec!(3502.10), dec!(3371.45), dec!(302118.40)),
            ("BNBUSDT", dec!(712.40), dec!(0.35), dec!(720.00), dec!(701.15), dec!(98211.02)),
            ("XRPUSDT", dec!(2.35), dec!(0.90), dec!(2.41), dec!(2.28), dec!(187420331.00)),
            ("ADAUSDT", dec!(0.95), dec!(-1.20), dec!(0.98), dec!(0.93), dec!(90123456.70)),
            ("SOLUSDT", dec!(195.00), dec!(4.20), dec!(198.75), dec!(184.10), dec!(3120876.55)),
            ("DOGEUSDT", dec!(0.38), dec!(12.00), dec!(0.39), dec!(0.33), dec!(2451877120.00)),
        ];

        let tickers = table
            .into_iter()
            .map(|(symbol, price, change, high, low, volume)| {
                (
                    symbol.to_string(),
                    Ticker24h {
                        price,
                        price_change_percent: change,
                        high_price: high,
                        low_price: low,
                        volume,
                    },
                )
            })
            .collect();

        Self { tickers, offline: false }
    }

    /// Client where every call fails as if the exchange were unreachable
    pub fn offline() -> Self {
        Self {
            tickers: HashMap::new(),
            offline: true,
        }
    }

    /// Replace or add a ticker
    #[must_use]
    pub fn with_ticker(mut self, symbol: impl AsRef<str>, ticker: Ticker24h) -> Self {
        self.tickers.insert(Symbol::new(symbol).as_str().to_string(), ticker);
        self
    }

    fn lookup(&self, symbol: &Symbol) -> Result<&Ticker24h> {
        if self.offline {
            return Err(MarketError::Unavailable("mock exchange is offline".into()));
        }

        self.tickers.get(symbol.as_str()).ok_or_else(|| MarketError::Api {
            status: 400,
            message: "Invalid symbol.".into(),
        })
    }
}

#[async_trait]
impl ExchangeClient for MockExchangeClient {
    async fn ticker_price(&self, symbol: &Symbol) -> Result<Decimal> {
        Ok(self.lookup(symbol)?.price)
    }

    async fn ticker_24h(&self, symbol: &Symbol) -> Result<Ticker24h> {
        self.lookup(symbol).cloned()
    }

    async fn health_check(&self) -> bool {
        !self.offline
    }

    fn name(&self) -> &str {
        "MockExchange"
    }
}

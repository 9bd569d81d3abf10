//! Exchange Integration
//!
//! Abstractions and implementations for market-data sources.

mod binance;
mod mock;

pub use binance::{BinanceClient, DEFAULT_BASE_URL};
pub use mock::MockExchangeClient;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::model::Ticker24h;
use crate::symbol::Symbol;

/// Exchange client trait (Strategy pattern)
///
/// Implement this for each market-data source. Calls are single attempts;
/// callers decide how failures are presented.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Current spot price for a pair
    async fn ticker_price(&self, symbol: &Symbol) -> Result<Decimal>;

    /// 24h rolling-window statistics for a pair
    async fn ticker_24h(&self, symbol: &Symbol) -> Result<Ticker24h>;

    /// Check if exchange is available
    async fn health_check(&self) -> bool;

    /// Exchange name
    fn name(&self) -> &str;
}

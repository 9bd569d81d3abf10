//! Domain Models
//!
//! Exchange wire types and the per-request market snapshot.
//! Uses `rust_decimal` for all prices - never use f64 for money!

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::symbol::Symbol;

/// `GET /ticker/price` body; only the price is read
#[derive(Clone, Debug, Deserialize)]
pub struct PriceTicker {
    pub price: Decimal,
}

/// `GET /ticker` body (24h rolling-window statistics)
///
/// Binance reports the last trade as `lastPrice`; `price` is accepted too.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticker24h {
    #[serde(alias = "lastPrice")]
    pub price: Decimal,
    pub price_change_percent: Decimal,
    pub high_price: Decimal,
    pub low_price: Decimal,
    pub volume: Decimal,
}

/// 24h statistics for one symbol
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketData {
    pub symbol: Symbol,

    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Percentage change over 24h
    #[serde(rename = "change", with = "rust_decimal::serde::float")]
    pub change_percent: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub high: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub low: Decimal,

    /// Base-asset volume over 24h
    #[serde(with = "rust_decimal::serde::float")]
    pub volume: Decimal,
}

impl MarketData {
    pub fn from_ticker(symbol: Symbol, ticker: Ticker24h) -> Self {
        Self {
            symbol,
            price: ticker.price,
            change_percent: ticker.price_change_percent,
            high: ticker.high_price,
            low: ticker.low_price,
            volume: ticker.volume,
        }
    }
}

/// Outcome of a snapshot fetch
///
/// Either every figure came from a successful upstream response, or there
/// are no figures at all and only the failure text remains.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MarketSnapshot {
    Ready(MarketData),
    Failed { error: String },
}

impl MarketSnapshot {
    pub fn failed(error: impl Into<String>) -> Self {
        Self::Failed { error: error.into() }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn data(&self) -> Option<&MarketData> {
        match self {
            Self::Ready(data) => Some(data),
            Self::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Failed { error } => Some(error),
        }
    }
}

//! # crypto-market
//!
//! Binance market data for the crypto price chat agent.
//!
//! ## Pieces
//!
//! - [`MarketService`] fetches a spot price line or a 24h [`MarketSnapshot`]
//!   and converts every upstream failure into a value
//! - [`format`] renders prices and snapshots with thousands separators
//! - [`svckit`] exposes both fetchers as agent tools
//! - [`Dispatcher`] runs one chat turn, including the keyword-triggered
//!   market report that replaces the agent's answer
//!
//! ```text
//! user text ──► Dispatcher ──► AgentRunner ──► tools ──► MarketService ──► Binance
//!                    │
//!                    └── "market" / "data" / "details" ──► snapshot report
//! ```

pub mod dispatcher;
pub mod error;
pub mod exchange;
pub mod format;
pub mod market;
pub mod model;
pub mod svckit;
pub mod symbol;

pub use dispatcher::{Dispatcher, DispatcherConfig};
pub use error::{MarketError, Result};
pub use market::MarketService;
pub use model::{MarketData, MarketSnapshot};
pub use symbol::{Symbol, extract_symbol};

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{MarketDataTool, PriceLookupTool};
}

/// Agent name
pub const CRYPTO_BOT_NAME: &str = "CryptoBot";

/// First transcript entry of every chat session
pub const WELCOME_MESSAGE: &str =
    "Hi! I'm Crypto Price Agent. Ask me about cryptocurrency prices and market data.";

/// Instructions for the crypto price agent
pub const CRYPTO_BOT_PROMPT: &str = r#"You are CryptoBot, a professional cryptocurrency assistant.

Give accurate, real-time crypto data: prices, 24h market changes and trading volume.

## Rules

1. Take figures from the Binance tools, never from memory
2. Format numbers with thousands separators and 2 decimal places
3. Include the 24h percentage change when it is relevant
4. Keep answers short but informative
5. Say so when data may be delayed

## Tools Available

- `get_crypto_price` - current spot price of a pair such as BTCUSDT
- `get_crypto_market_data` - price, 24h change, high, low and volume of a pair

Trading pairs are written without separators, quote asset last (ETHUSDT, SOLUSDT)."#;

//! Trading-pair symbols
//!
//! A [`Symbol`] is only ever uppercased locally; whether it names a real
//! market is for the exchange to decide.

use serde::{Deserialize, Serialize};

/// Pair used when a message names none of the supported pairs
pub const DEFAULT_SYMBOL: &str = "BTCUSDT";

/// Pairs the chat heuristic recognises in free text
pub const SUPPORTED_SYMBOLS: [&str; 7] = [
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "XRPUSDT", "ADAUSDT", "SOLUSDT", "DOGEUSDT",
];

/// Uppercase trading-pair identifier, e.g. `BTCUSDT`
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct Symbol(String);

impl Symbol {
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the pair is on the chat allow-list
    pub fn is_supported(&self) -> bool {
        SUPPORTED_SYMBOLS.contains(&self.0.as_str())
    }
}

impl Default for Symbol {
    fn default() -> Self {
        Self(DEFAULT_SYMBOL.to_string())
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<Symbol> for String {
    fn from(s: Symbol) -> Self {
        s.0
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the first supported pair mentioned in `text`
///
/// Tokens are whitespace-separated and compared after uppercasing, so
/// `ethusdt` matches but `ETHUSDT?` and `ETH` do not.
pub fn extract_symbol(text: &str, default: &Symbol) -> Symbol {
    text.split_whitespace()
        .map(str::to_uppercase)
        .find(|token| SUPPORTED_SYMBOLS.contains(&token.as_str()))
        .map_or_else(|| default.clone(), Symbol)
}

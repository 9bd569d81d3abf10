//! Server Configuration
//!
//! Everything comes from the environment (`.env` is loaded first when
//! present). The LLM key is read separately by the provider.

use std::time::Duration;

use anyhow::Context;
use crypto_market::{Symbol, exchange::DEFAULT_BASE_URL};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SESSION_TTL_SECS: u64 = 1800;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Listen address
    pub bind_addr: String,

    /// Binance REST base URL
    pub binance_api_url: String,

    /// Pair used by the market report when a message names none
    pub default_symbol: Symbol,

    /// Bound on each exchange request, each LLM request and each agent run
    pub request_timeout: Duration,

    /// Chat model name
    pub llm_model: String,

    /// Idle time after which a session is dropped
    pub session_ttl: Duration,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let seconds = |key: &str, default: u64| -> anyhow::Result<u64> {
            let secs = match get(key) {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("{key} must be a whole number of seconds, got '{raw}'"))?,
                None => default,
            };
            anyhow::ensure!(secs > 0, "{key} must be greater than zero");
            Ok(secs)
        };

        let timeout_secs = seconds("REQUEST_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS)?;
        let session_ttl_secs = seconds("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS)?;

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            binance_api_url: get("BINANCE_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            default_symbol: get("DEFAULT_SYMBOL").map(Symbol::new).unwrap_or_default(),
            request_timeout: Duration::from_secs(timeout_secs),
            llm_model: get("LLM_MODEL")
                .unwrap_or_else(|| agent_core::provider::DEFAULT_MODEL.into()),
            session_ttl: Duration::from_secs(session_ttl_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_vars(vars(&[])).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:3000");
        assert_eq!(config.binance_api_url, "https://api.binance.com/api/v3");
        assert_eq!(config.default_symbol.as_str(), "BTCUSDT");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.llm_model, "gemini-2.0-flash");
        assert_eq!(config.session_ttl, Duration::from_secs(1800));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_vars(vars(&[
            ("BIND_ADDR", "127.0.0.1:8080"),
            ("DEFAULT_SYMBOL", "ethusdt"),
            ("REQUEST_TIMEOUT_SECS", "10"),
            ("LLM_MODEL", "gemini-1.5-pro"),
            ("SESSION_TTL_SECS", "600"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:8080");
        assert_eq!(config.default_symbol.as_str(), "ETHUSDT");
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(config.llm_model, "gemini-1.5-pro");
        assert_eq!(config.session_ttl, Duration::from_secs(600));
    }

    #[test]
    fn test_bad_timeout() {
        assert!(ServerConfig::from_vars(vars(&[("REQUEST_TIMEOUT_SECS", "soon")])).is_err());
        assert!(ServerConfig::from_vars(vars(&[("REQUEST_TIMEOUT_SECS", "0")])).is_err());
        assert!(ServerConfig::from_vars(vars(&[("SESSION_TTL_SECS", "-5")])).is_err());
    }
}

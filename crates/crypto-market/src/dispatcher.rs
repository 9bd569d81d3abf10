//! Chat-turn dispatcher
//!
//! One turn: record the user message, ask the agent, optionally replace the
//! agent's answer with a formatted 24h report, record the answer.
//!
//! The replacement is keyword driven. When the message mentions market data
//! and the snapshot fetch succeeds, the agent's answer is discarded, not
//! merged. When the fetch fails the agent's answer stands.

use std::sync::Arc;
use std::time::Duration;

use agent_core::{AgentError, AgentRunner, Transcript};

use crate::format::format_snapshot;
use crate::market::MarketService;
use crate::model::MarketSnapshot;
use crate::symbol::{Symbol, extract_symbol};

/// Substrings that switch on the snapshot override (case-insensitive)
pub const TRIGGER_WORDS: [&str; 3] = ["market", "data", "details"];

/// Marker that opens every agent failure message
pub const AGENT_ERROR_MARKER: &str = "⚠️ Error:";

/// Whether a user message asks for market data
pub fn wants_market_data(text: &str) -> bool {
    let lowered = text.to_lowercase();
    TRIGGER_WORDS.iter().any(|word| lowered.contains(word))
}

#[derive(Clone, Debug)]
pub struct DispatcherConfig {
    /// Pair reported when the message names no supported pair
    pub default_symbol: Symbol,

    /// Upper bound on one agent run
    pub agent_timeout: Duration,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            default_symbol: Symbol::default(),
            agent_timeout: Duration::from_secs(30),
        }
    }
}

/// Turn handler shared by all sessions
pub struct Dispatcher {
    agent: Arc<dyn AgentRunner>,
    market: Arc<MarketService>,
    config: DispatcherConfig,
}

impl Dispatcher {
    pub fn new(agent: Arc<dyn AgentRunner>, market: Arc<MarketService>, config: DispatcherConfig) -> Self {
        Self { agent, market, config }
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// Process one user message against a transcript and return the reply
    ///
    /// Appends exactly two entries (user, then assistant) and never fails.
    /// Callers must not run two turns on the same transcript at once.
    pub async fn handle_turn(&self, transcript: &mut Transcript, input: &str) -> String {
        transcript.push_user(input);

        let mut reply = self.ask_agent(input).await;

        if let Some(report) = self.market_override(input).await {
            reply = report;
        }

        transcript.push_assistant(reply.clone());
        reply
    }

    async fn ask_agent(&self, input: &str) -> String {
        let timeout = self.config.agent_timeout;

        match tokio::time::timeout(timeout, self.agent.run(input)).await {
            Ok(Ok(answer)) => answer,
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "Agent run failed");
                format!("{AGENT_ERROR_MARKER} {e}")
            }
            Err(_) => {
                let e = AgentError::Timeout(timeout);
                tracing::warn!(error = %e, "Agent run timed out");
                format!("{AGENT_ERROR_MARKER} {e}")
            }
        }
    }

    /// Formatted report that should replace the agent answer, if any
    async fn market_override(&self, input: &str) -> Option<String> {
        if !wants_market_data(input) {
            return None;
        }

        let symbol = extract_symbol(input, &self.config.default_symbol);
        let snapshot = self.market.fetch_snapshot(&symbol).await;

        match &snapshot {
            MarketSnapshot::Ready(_) => {
                tracing::debug!(%symbol, "Replacing agent answer with market report");
                Some(format_snapshot(&snapshot))
            }
            MarketSnapshot::Failed { error } => {
                tracing::debug!(%symbol, %error, "Market report unavailable, keeping agent answer");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::MockExchangeClient;
    use agent_core::{Result as CoreResult, Role};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const WELCOME: &str = "Hi! I'm Crypto Price Agent. Ask me about cryptocurrency prices and market data.";

    struct StubAgent {
        reply: std::result::Result<String, String>,
        delay: Duration,
        calls: AtomicUsize,
    }

    impl StubAgent {
        fn answering(reply: &str) -> Self {
            Self { reply: Ok(reply.into()), delay: Duration::ZERO, calls: AtomicUsize::new(0) }
        }

        fn failing(error: &str) -> Self {
            Self { reply: Err(error.into()), delay: Duration::ZERO, calls: AtomicUsize::new(0) }
        }

        fn slow(delay: Duration) -> Self {
            Self { reply: Ok("too late".into()), delay, calls: AtomicUsize::new(0) }
        }
    }

    #[async_trait]
    impl AgentRunner for StubAgent {
        async fn run(&self, _prompt: &str) -> CoreResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.reply.clone().map_err(AgentError::Provider)
        }
    }

    fn dispatcher(agent: Arc<StubAgent>, exchange: MockExchangeClient) -> Dispatcher {
        Dispatcher::new(
            agent,
            Arc::new(MarketService::new(Arc::new(exchange))),
            DispatcherConfig {
                agent_timeout: Duration::from_millis(200),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_trigger_gate() {
        assert!(wants_market_data("Show me MARKET info"));
        assert!(wants_market_data("any Details?"));
        assert!(wants_market_data("metadata please"));
        assert!(!wants_market_data("what is the price of BTCUSDT"));
    }

    #[tokio::test]
    async fn test_no_trigger_keeps_agent_answer() {
        let agent = Arc::new(StubAgent::answering("BTC is at $97,500."));
        let dispatcher = dispatcher(agent.clone(), MockExchangeClient::new());
        let mut transcript = Transcript::with_welcome(WELCOME);

        let reply = dispatcher.handle_turn(&mut transcript, "price of BTCUSDT?").await;

        assert_eq!(reply, "BTC is at $97,500.");
        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);

        let messages = transcript.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].content, WELCOME);
        assert_eq!(messages[1].role, Role::User);
        assert_eq!(messages[1].content, "price of BTCUSDT?");
        assert_eq!(messages[2].role, Role::Assistant);
        assert_eq!(messages[2].content, "BTC is at $97,500.");
    }

    #[tokio::test]
    async fn test_trigger_overrides_agent_answer() {
        let agent = Arc::new(StubAgent::answering("ETH looks fine."));
        let exchange = MockExchangeClient::new();
        let expected = format_snapshot(
            &MarketService::new(Arc::new(MockExchangeClient::new()))
                .fetch_snapshot(&Symbol::new("ETHUSDT"))
                .await,
        );
        let dispatcher = dispatcher(agent.clone(), exchange);
        let mut transcript = Transcript::new();

        let reply = dispatcher
            .handle_turn(&mut transcript, "show me market data for ethusdt")
            .await;

        assert_eq!(reply, expected);
        assert!(reply.starts_with("📊 ETHUSDT Market Data:"));
        assert_eq!(transcript.last().unwrap().content, expected);
        assert_eq!(agent.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_trigger_without_symbol_uses_default() {
        let agent = Arc::new(StubAgent::answering("ok"));
        let dispatcher = dispatcher(agent, MockExchangeClient::new());
        let mut transcript = Transcript::new();

        let reply = dispatcher.handle_turn(&mut transcript, "tell me market details").await;
        assert!(reply.starts_with("📊 BTCUSDT Market Data:"));
    }

    #[tokio::test]
    async fn test_failed_snapshot_keeps_agent_answer() {
        let agent = Arc::new(StubAgent::answering("I could not reach the exchange."));
        let dispatcher = dispatcher(agent, MockExchangeClient::offline());
        let mut transcript = Transcript::new();

        let reply = dispatcher.handle_turn(&mut transcript, "market data BTCUSDT").await;
        assert_eq!(reply, "I could not reach the exchange.");
        assert_eq!(transcript.len(), 2);
    }

    #[tokio::test]
    async fn test_agent_failure_becomes_text() {
        let agent = Arc::new(StubAgent::failing("quota exceeded"));
        let dispatcher = dispatcher(agent, MockExchangeClient::new());
        let mut transcript = Transcript::new();

        let reply = dispatcher.handle_turn(&mut transcript, "hello").await;
        assert_eq!(reply, "⚠️ Error: Provider error: quota exceeded");
        assert_eq!(transcript.last().unwrap().content, reply);
    }

    #[tokio::test]
    async fn test_agent_failure_still_overridden_by_report() {
        let agent = Arc::new(StubAgent::failing("boom"));
        let dispatcher = dispatcher(agent, MockExchangeClient::new());
        let mut transcript = Transcript::new();

        let reply = dispatcher.handle_turn(&mut transcript, "details SOLUSDT").await;
        assert!(reply.starts_with("📊 SOLUSDT Market Data:"));
    }

    #[tokio::test]
    async fn test_agent_timeout() {
        let agent = Arc::new(StubAgent::slow(Duration::from_secs(5)));
        let dispatcher = dispatcher(agent, MockExchangeClient::new());
        let mut transcript = Transcript::new();

        let reply = dispatcher.handle_turn(&mut transcript, "hello").await;
        assert_eq!(reply, "⚠️ Error: Timed out after 200ms");
        assert_eq!(transcript.len(), 2);
    }
}

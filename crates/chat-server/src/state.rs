//! Application State

use std::sync::Arc;

use agent_core::{LlmProvider, Session, SessionStore, SharedSession};
use crypto_market::{Dispatcher, MarketService, WELCOME_MESSAGE};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// LLM provider, for health and model listing
    pub provider: Arc<dyn LlmProvider>,

    /// Market-data facade, for health
    pub market: Arc<MarketService>,

    /// Turn handler shared by every session
    pub dispatcher: Arc<Dispatcher>,

    /// Live chat sessions
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// Open a session whose transcript starts with the welcome message
    pub async fn open_session(&self) -> SharedSession {
        let session = Session::with_welcome(WELCOME_MESSAGE);
        tracing::info!(session_id = %session.id, "Session opened");
        self.sessions.insert(session).await
    }
}

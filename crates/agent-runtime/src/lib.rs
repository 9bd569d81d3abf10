//! # agent-runtime
//!
//! Runtime providers for the crypto chat agent.
//!
//! ## Providers
//!
//! - **OpenAI-compatible** (default): any chat-completions endpoint, Gemini's
//!   OpenAI layer out of the box
//! - **Anthropic** (coming soon): Claude API integration
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::OpenAiProvider;
//!
//! let provider = OpenAiProvider::from_env()?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .build()?;
//! ```

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "openai")]
pub use openai::{OpenAiConfig, OpenAiProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentBuilder, AgentError, AgentRunner, LlmProvider, Message, Result, Role, Tool,
    ToolRegistry,
};

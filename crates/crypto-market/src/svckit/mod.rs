//! Service Kit - Agent Tools
//!
//! Market-data tools that implement `agent_core::Tool` for the crypto agent.

mod price_lookup;
mod market_data;

pub use price_lookup::PriceLookupTool;
pub use market_data::MarketDataTool;

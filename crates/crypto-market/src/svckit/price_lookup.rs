//! Price Lookup Tool
//!
//! Spot price for one trading pair.

use std::sync::Arc;
use async_trait::async_trait;

use agent_core::{
    Tool, ToolSchema, ToolCall, ToolResult,
    tool::ParameterSchema,
    Result as CoreResult,
};

use crate::market::{MarketService, price_failure};
use crate::symbol::{DEFAULT_SYMBOL, Symbol};

/// Tool for looking up the current price of a pair
pub struct PriceLookupTool {
    market: Arc<MarketService>,
}

impl PriceLookupTool {
    pub const NAME: &'static str = "get_crypto_price";

    pub fn new(market: Arc<MarketService>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for PriceLookupTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.into(),
            description: "Get current price of cryptocurrency pair (e.g. BTCUSDT)".into(),
            parameters: vec![
                ParameterSchema {
                    name: "symbol".into(),
                    param_type: "string".into(),
                    description: "Binance trading pair, e.g. 'BTCUSDT' or 'ETHUSDT'".into(),
                    required: true,
                },
            ],
            category: Some("market_data".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let symbol = Symbol::new(call.str_arg("symbol").unwrap_or(DEFAULT_SYMBOL));

        Ok(match self.market.try_fetch_price(&symbol).await {
            Ok(line) => ToolResult::success(Self::NAME, line),
            Err(e) => ToolResult::failure(Self::NAME, price_failure(&symbol, &e)),
        })
    }
}

//! Market Data Tool
//!
//! 24h statistics for one trading pair, as a readable report plus the
//! structured snapshot.

use std::sync::Arc;
use async_trait::async_trait;

use agent_core::{
    Tool, ToolSchema, ToolCall, ToolResult,
    tool::ParameterSchema,
    Result as CoreResult,
};

use crate::format::format_snapshot;
use crate::market::MarketService;
use crate::model::MarketSnapshot;
use crate::symbol::{DEFAULT_SYMBOL, Symbol};

pub struct MarketDataTool {
    market: Arc<MarketService>,
}

impl MarketDataTool {
    pub const NAME: &'static str = "get_crypto_market_data";

    pub fn new(market: Arc<MarketService>) -> Self {
        Self { market }
    }
}

#[async_trait]
impl Tool for MarketDataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: Self::NAME.into(),
            description: "Get detailed market data for cryptocurrency pair: price, 24h change, high, low and volume".into(),
            parameters: vec![
                ParameterSchema {
                    name: "symbol".into(),
                    param_type: "string".into(),
                    description: "Binance trading pair, e.g. 'SOLUSDT'".into(),
                    required: true,
                },
            ],
            category: Some("market_data".into()),
        }
    }

    async fn execute(&self, call: &ToolCall) -> CoreResult<ToolResult> {
        let symbol = Symbol::new(call.str_arg("symbol").unwrap_or(DEFAULT_SYMBOL));
        let snapshot = self.market.fetch_snapshot(&symbol).await;
        let data = serde_json::to_value(&snapshot)?;

        let result = match &snapshot {
            MarketSnapshot::Ready(_) => ToolResult::success(Self::NAME, format_snapshot(&snapshot)),
            MarketSnapshot::Failed { error } => ToolResult::failure(Self::NAME, error.clone()),
        };
        Ok(result.with_data(data))
    }
}

use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::{format_ticker_price, ToolError};
use crate::exchange::BinanceClient;

pub const GET_TICKER_PRICE: &str = "get-ticker-price";

/// Tool metadata as advertised to the host
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Text produced by a tool call. `is_error` marks failure texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub text: String,
    pub is_error: bool,
}

impl ToolOutput {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_error: false,
        }
    }

    pub fn failure(error: &ToolError) -> Self {
        Self {
            text: error.to_string(),
            is_error: true,
        }
    }
}

/// Exposes the Binance ticker endpoint as callable tools
pub struct ToolService {
    client: Arc<BinanceClient>,
}

impl ToolService {
    pub fn new(client: Arc<BinanceClient>) -> Self {
        Self { client }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        vec![ToolDefinition {
            name: GET_TICKER_PRICE.to_string(),
            description: "Get the current price for a cryptocurrency symbol".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "symbol": {
                        "type": "string",
                        "description": "Trading pair symbol (e.g., BTCUSDT, ETHUSDT)"
                    }
                },
                "required": ["symbol"]
            }),
        }]
    }

    /// Run tool `name`. Never fails: errors come back as error-flagged text.
    pub async fn call(&self, name: &str, arguments: Option<&Map<String, Value>>) -> ToolOutput {
        let result = match arguments {
            None => Err(ToolError::MissingArguments),
            Some(args) if args.is_empty() => Err(ToolError::MissingArguments),
            Some(args) => match name {
                GET_TICKER_PRICE => self.get_ticker_price(args).await,
                other => Err(ToolError::UnknownTool(other.to_string())),
            },
        };

        match result {
            Ok(text) => ToolOutput::success(text),
            Err(e) => {
                warn!(tool = name, "Tool call failed: {}", e);
                ToolOutput::failure(&e)
            }
        }
    }

    async fn get_ticker_price(&self, arguments: &Map<String, Value>) -> Result<String, ToolError> {
        let symbol = arguments
            .get("symbol")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ToolError::MissingSymbol)?
            .to_uppercase();

        info!("Fetching ticker price for {}", symbol);

        let ticker_data = self.client.get_ticker_price(&symbol).await?;
        Ok(format!(
            "Current price for {}:\n\n{}",
            symbol,
            format_ticker_price(&ticker_data)
        ))
    }
}

use std::sync::Arc;
use binance_core::exchange::TransportError;
use binance_core::{BinanceClient, Credentials, Settings, ToolService};

pub const SERVER_NAME: &str = "binance_crypto";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Everything a request handler needs. Immutable after startup.
pub struct AppState {
    pub tools: ToolService,
    pub server_name: String,
    pub server_version: String,
}

impl AppState {
    pub fn new(settings: &Settings, credentials: Credentials) -> Result<Self, TransportError> {
        let client = BinanceClient::from_settings(settings, credentials)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: BinanceClient) -> Self {
        Self {
            tools: ToolService::new(Arc::new(client)),
            server_name: SERVER_NAME.to_string(),
            server_version: SERVER_VERSION.to_string(),
        }
    }
}

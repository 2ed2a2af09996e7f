//! MCP server exposing the Binance ticker tools.
//!
//! Framing, the initialize handshake, ping and request routing come from
//! the rmcp SDK. This module only maps tool listing and tool calls onto
//! `ToolService`.

use std::sync::Arc;

use rmcp::{
    model::{
        CallToolRequestParam, CallToolResult, Content, Implementation, JsonObject,
        ListToolsResult, PaginatedRequestParam, ServerCapabilities, ServerInfo, Tool,
    },
    service::RequestContext,
    transport::stdio,
    ErrorData as McpError, RoleServer, ServerHandler, ServiceExt,
};
use tokio::select;
use tracing::{info, warn};

use crate::state::AppState;

/// rmcp handler over the shared application state
#[derive(Clone)]
pub struct BinanceServer {
    state: Arc<AppState>,
}

impl BinanceServer {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.state
            .tools
            .definitions()
            .into_iter()
            .map(|definition| {
                let schema: JsonObject = definition
                    .input_schema
                    .as_object()
                    .cloned()
                    .unwrap_or_default();
                Tool::new(definition.name, definition.description, Arc::new(schema))
            })
            .collect()
    }

    /// Failures stay in-band as error-flagged text, never as protocol errors.
    pub async fn call(&self, name: &str, arguments: Option<&JsonObject>) -> CallToolResult {
        let output = self.state.tools.call(name, arguments).await;
        let content = vec![Content::text(output.text)];

        if output.is_error {
            warn!("Tool {} returned an error", name);
            CallToolResult::error(content)
        } else {
            CallToolResult::success(content)
        }
    }
}

impl ServerHandler for BinanceServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.state.server_name.clone(),
                version: self.state.server_version.clone(),
                ..Default::default()
            },
            instructions: Some("Look up current Binance spot prices with get-ticker-price.".into()),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult::with_all_items(self.tools()))
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.call(&request.name, request.arguments.as_ref()).await)
    }
}

/// Serve on stdin/stdout until the client disconnects or Ctrl+C.
pub async fn run_stdio(state: Arc<AppState>) -> anyhow::Result<()> {
    info!("Serving tools on stdio");

    let service = BinanceServer::new(state).serve(stdio()).await?;

    select! {
        reason = service.waiting() => {
            info!("Server stopped: {:?}", reason?);
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
    }

    Ok(())
}

use thiserror::Error;
use crate::exchange::RequestError;

/// Ticker payload that cannot be rendered
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("Error formatting ticker price data: expected a ticker object at index {index}, found {found}")]
    NotAnObject { index: usize, found: &'static str },

    #[error("Error formatting ticker price data: expected a ticker object or list, found {0}")]
    UnexpectedPayload(&'static str),
}

/// Tool-level failures. The `Display` text is what the caller sees.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    #[error("Missing arguments for the request")]
    MissingArguments,

    #[error("Missing symbol parameter")]
    MissingSymbol,

    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Error: {0}")]
    Request(#[from] RequestError),
}

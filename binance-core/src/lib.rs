//! Binance REST plumbing for the `get-ticker-price` tool.
//!
//! `exchange` issues single-shot requests against the Binance REST API,
//! `service` turns the results into tool output text.

pub mod config;
pub mod exchange;
pub mod service;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use config::{Credentials, Settings};
pub use exchange::{BinanceClient, RequestError};
pub use service::{ToolOutput, ToolService};

pub mod errors;
pub mod formatter;
pub mod tools;

// Re-export main interfaces
pub use errors::{FormatError, ToolError};
pub use formatter::format_ticker_price;
pub use tools::{ToolDefinition, ToolOutput, ToolService};

use serde_json::Value;
use tracing::warn;

use super::FormatError;
use crate::exchange::TickerQuote;

pub const NO_TICKER_DATA: &str = "No ticker price data available in the response";

const ENTRY_SEPARATOR: &str = "\n---\n";

/// Render a `/api/v3/ticker/price` payload for display.
///
/// Accepts a single quote object or a list of them. Missing fields show as
/// `N/A`; any other payload shape yields the formatting error text instead
/// of failing.
pub fn format_ticker_price(data: &Value) -> String {
    match render_ticker_price(data) {
        Ok(text) => text,
        Err(e) => {
            warn!("{}", e);
            e.to_string()
        }
    }
}

fn render_ticker_price(data: &Value) -> Result<String, FormatError> {
    if is_empty(data) {
        return Ok(NO_TICKER_DATA.to_string());
    }

    match data {
        Value::Array(entries) => {
            let blocks = entries
                .iter()
                .enumerate()
                .map(|(index, entry)| match entry {
                    Value::Object(object) => Ok(TickerQuote::from_object(object).to_string()),
                    other => Err(FormatError::NotAnObject {
                        index,
                        found: kind(other),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(blocks.join(ENTRY_SEPARATOR))
        }
        Value::Object(object) => Ok(TickerQuote::from_object(object).to_string()),
        other => Err(FormatError::UnexpectedPayload(kind(other))),
    }
}

/// Falsy payloads, including `false` and zero, carry no quotes.
fn is_empty(data: &Value) -> bool {
    match data {
        Value::Null => true,
        Value::Array(entries) => entries.is_empty(),
        Value::Object(object) => object.is_empty(),
        Value::String(s) => s.is_empty(),
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

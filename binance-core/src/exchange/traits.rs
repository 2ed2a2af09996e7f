// exchange/traits.rs

use super::{HttpRequest, HttpResponse, TransportError};
use async_trait::async_trait;

/// Sends a prepared request and hands back status and body.
///
/// Implementations must not interpret the status code; classification is
/// done by `BinanceClient`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

// =================================================================
// exchange/binance.rs - Binance REST Request Executor
// =================================================================

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::{
    errors::{RequestError, TransportError},
    traits::HttpTransport,
    types::{HttpRequest, HttpResponse, RequestParams},
    utils::{append_signature, build_url, current_timestamp_ms, redact_signature, requires_api_key},
};
use crate::config::{Credentials, Settings};

// Constants
pub const BINANCE_API_URL: &str = "https://api.binance.com";
pub const TICKER_PRICE_ENDPOINT: &str = "/api/v3/ticker/price";
const API_KEY_HEADER: &str = "X-MBX-APIKEY";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// `HttpTransport` backed by a shared `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, TransportError> {
        Self::from_builder(client_builder())
    }

    fn from_builder(builder: reqwest::ClientBuilder) -> Result<Self, TransportError> {
        let client = builder
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

/// Redirects are returned as-is so a 3xx is reported like any other
/// non-success status.
fn client_builder() -> reqwest::ClientBuilder {
    reqwest::Client::builder().redirect(reqwest::redirect::Policy::none())
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .timeout(request.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(HttpResponse { status, body })
    }
}

/// Single-shot Binance REST client.
///
/// Holds immutable credentials and a transport; safe to share across tasks
/// behind an `Arc`. Each call performs exactly one attempt.
pub struct BinanceClient {
    api_url: String,
    credentials: Credentials,
    timeout: Duration,
    transport: Arc<dyn HttpTransport>,
}

impl BinanceClient {
    /// Client against the public Binance API using `reqwest`
    pub fn new(credentials: Credentials) -> Result<Self, TransportError> {
        let transport = ReqwestTransport::new()?;
        Ok(Self::with_transport(credentials, Arc::new(transport)))
    }

    pub fn with_transport(credentials: Credentials, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            api_url: BINANCE_API_URL.to_string(),
            credentials,
            timeout: REQUEST_TIMEOUT,
            transport,
        }
    }

    pub fn from_settings(
        settings: &Settings,
        credentials: Credentials,
    ) -> Result<Self, TransportError> {
        Ok(Self::new(credentials)?
            .with_api_url(&settings.api.base_url)
            .with_timeout(Duration::from_secs(settings.api.timeout_secs)))
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Issue one request and decode the JSON body.
    ///
    /// Supports GET, POST and DELETE. Signed requests get a `timestamp` and
    /// an HMAC-SHA256 `signature` and fail before any I/O when no secret is
    /// configured. Every failure comes back as a `RequestError`.
    pub async fn request(
        &self,
        endpoint: &str,
        params: Option<RequestParams>,
        signed: bool,
        method: Method,
    ) -> Result<Value, RequestError> {
        let mut params = params.unwrap_or_default();
        let mut headers = Vec::new();

        if let Some(api_key) = self.credentials.api_key() {
            if requires_api_key(endpoint, signed) {
                headers.push((API_KEY_HEADER.to_string(), api_key.to_string()));
            }
        }

        let secret = if signed {
            let secret = self
                .credentials
                .expose_secret()
                .ok_or(RequestError::MissingSecret)?;
            params.insert("timestamp", current_timestamp_ms());
            Some(secret)
        } else {
            None
        };

        let mut url = build_url(&self.api_url, endpoint, &params)?;
        if let Some(secret) = secret {
            append_signature(&mut url, secret);
        }

        if !matches!(method, Method::GET | Method::POST | Method::DELETE) {
            return Err(RequestError::UnsupportedMethod(method.to_string()));
        }

        debug!(method = %method, url = %redact_signature(&url), "Sending Binance request");

        let request = HttpRequest {
            method,
            url,
            headers,
            timeout: self.timeout,
        };

        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(TransportError::Timeout) => {
                warn!("Binance request to {} timed out", endpoint);
                return Err(RequestError::Timeout(self.timeout.as_secs()));
            }
            Err(TransportError::Connect(detail)) => {
                warn!("Failed to connect to Binance: {}", detail);
                return Err(RequestError::Connect);
            }
            Err(TransportError::Other(detail)) => {
                warn!("Binance request to {} failed: {}", endpoint, detail);
                return Err(RequestError::Unexpected(detail));
            }
        };

        parse_response(response)
    }

    /// GET the current price for `symbol`. The symbol is sent as given.
    pub async fn get_ticker_price(&self, symbol: &str) -> Result<Value, RequestError> {
        let params = RequestParams::new().with("symbol", symbol);
        self.request(TICKER_PRICE_ENDPOINT, Some(params), false, Method::GET)
            .await
    }
}

fn parse_response(response: HttpResponse) -> Result<Value, RequestError> {
    if !response.is_success() {
        warn!(
            "Binance responded with HTTP {}: {}",
            response.status, response.body
        );
        return Err(RequestError::from_status(response.status, response.body));
    }

    serde_json::from_str(&response.body).map_err(|e| RequestError::Unexpected(e.to_string()))
}

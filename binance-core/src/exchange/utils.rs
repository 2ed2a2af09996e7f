// =================================================================
// exchange/utils.rs - Utility Functions
// =================================================================

use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::Url;
use sha2::Sha256;

use super::{RequestError, RequestParams};

type HmacSha256 = Hmac<Sha256>;

/// Path prefix of account-scoped endpoints, which carry the API key even
/// when unsigned
pub const ACCOUNT_ENDPOINT_PREFIX: &str = "/api/v3/account";

/// Current wall-clock time in milliseconds since the epoch
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Whether the `X-MBX-APIKEY` header belongs on a request to `endpoint`
pub fn requires_api_key(endpoint: &str, signed: bool) -> bool {
    signed || endpoint.starts_with(ACCOUNT_ENDPOINT_PREFIX)
}

/// HMAC-SHA256 of `query` keyed by `secret`, as lowercase hex
pub fn sign_query(secret: &str, query: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");

    mac.update(query.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Join base URL and endpoint path, then form-encode `params` as the query.
pub fn build_url(
    base_url: &str,
    endpoint: &str,
    params: &RequestParams,
) -> Result<Url, RequestError> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), endpoint);
    let mut url = Url::parse(&raw)
        .map_err(|e| RequestError::Unexpected(format!("Invalid URL '{}': {}", raw, e)))?;

    // An empty `query_pairs_mut` would leave a dangling '?'
    if !params.is_empty() {
        url.query_pairs_mut().extend_pairs(params.pairs());
    }

    Ok(url)
}

/// Sign the URL's current query string and append the `signature` pair.
///
/// The signed text is the encoded query exactly as it will be sent, so the
/// server recomputes the same digest.
pub fn append_signature(url: &mut Url, secret: &str) {
    let signature = sign_query(secret, url.query().unwrap_or(""));
    url.query_pairs_mut().append_pair("signature", &signature);
}

/// URL text safe for logs: the signature value is masked
pub fn redact_signature(url: &Url) -> String {
    if !url.query_pairs().any(|(k, _)| k == "signature") {
        return url.to_string();
    }

    let mut redacted = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "signature" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    redacted.query_pairs_mut().clear().extend_pairs(pairs);
    redacted.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_known_vector() {
        // Example from the Binance signed-endpoint documentation
        let secret = "NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j";
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";

        assert_eq!(
            sign_query(secret, query),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn test_requires_api_key() {
        assert!(requires_api_key("/api/v3/ticker/price", true));
        assert!(requires_api_key("/api/v3/account", false));
        assert!(requires_api_key("/api/v3/account/commission", false));
        assert!(!requires_api_key("/api/v3/ticker/price", false));
    }

    #[test]
    fn test_build_url_without_params() {
        let url = build_url("https://api.binance.com/", "/api/v3/time", &RequestParams::new()).unwrap();
        assert_eq!(url.as_str(), "https://api.binance.com/api/v3/time");
    }

    #[test]
    fn test_build_url_encodes_params() {
        let params = RequestParams::new()
            .with("symbol", "BTCUSDT")
            .with("note", "a b&c");
        let url = build_url("https://api.binance.com", "/api/v3/ticker/price", &params).unwrap();

        assert_eq!(url.query(), Some("symbol=BTCUSDT&note=a+b%26c"));
    }

    #[test]
    fn test_build_url_rejects_garbage_base() {
        let result = build_url("not a url", "/api/v3/time", &RequestParams::new());
        assert!(matches!(result, Err(RequestError::Unexpected(_))));
    }

    #[test]
    fn test_append_signature_covers_encoded_query() {
        let params = RequestParams::new()
            .with("symbol", "BTCUSDT")
            .with("timestamp", 1000i64);
        let mut url = build_url("https://api.binance.com", "/api/v3/account", &params).unwrap();
        append_signature(&mut url, "secret");

        let expected = sign_query("secret", "symbol=BTCUSDT&timestamp=1000");
        assert_eq!(
            url.query(),
            Some(format!("symbol=BTCUSDT&timestamp=1000&signature={}", expected).as_str())
        );
    }

    #[test]
    fn test_redact_signature() {
        let params = RequestParams::new().with("timestamp", 1i64);
        let mut url = build_url("https://api.binance.com", "/api/v3/account", &params).unwrap();
        append_signature(&mut url, "secret");

        let logged = redact_signature(&url);
        assert!(logged.contains("signature=***") || logged.contains("signature=%2A%2A%2A"));
        assert!(!logged.contains(&sign_query("secret", "timestamp=1")));
    }
}

//! Minimal JSON-over-HTTP client with safe logging and a hard timeout.
//!
//! - Request options: query params, a query-parameter `Auth`, timeout
//! - Exactly one attempt per call; a timeout surfaces as [`HttpError::Timeout`]
//! - Redacts sensitive query params and never logs secret values
//! - Optional *raw* response logging via `LOOKOUT_HTTP_RAW=1`
//!
//! Example (no_run):
//! ```rust
//! # async fn demo() -> Result<(), lookout_http::HttpError> {
//! let client = lookout_http::HttpClient::new("https://api.example.com")?;
//! let got: serde_json::Value = client
//!     .get_json("v1/items", lookout_http::RequestOpts::default())
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! Observability: structured `tracing` events are emitted for request start,
//! response status, body snippets (truncated), decode failures and final
//! errors. Raw bodies go to target `http.raw` when `LOOKOUT_HTTP_RAW=1`.

use reqwest::{Client, Method, StatusCode, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;

const RAW_ENV: &str = "LOOKOUT_HTTP_RAW";
const RAW_MAX_BODY: usize = 64 * 1024;
const SNIPPET_MAX: usize = 500;

const SECRET_KEYS: &[&str] = &[
    "access_token",
    "authorization",
    "auth",
    "key",
    "api_key",
    "token",
    "secret",
    "client_secret",
    "bearer",
];

fn raw_enabled() -> bool {
    matches!(
        env::var(RAW_ENV).as_deref(),
        Ok("1") | Ok("true") | Ok("yes")
    )
}

// ==============================
// Errors
// ==============================

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("invalid URL: {0}")]
    Url(String),
    #[error("request build failed: {0}")]
    Build(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("decode error: {0}, body_snippet: {1}")]
    Decode(String, String),
    #[error("server returned error {status}: {message}")]
    Api { status: StatusCode, message: String },
}

impl HttpError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, HttpError::Timeout(_))
    }
}

// ==============================
// Auth & Request Options
// ==============================

/// Credential sent as a query parameter (e.g. Google: `key=<api key>`).
///
/// The value is appended to the request's query and redacted in logs.
///
/// ```
/// use lookout_http::Auth;
///
/// let auth = Auth::query("key", "secret");
/// assert_eq!(auth.name, "key");
/// ```
#[derive(Clone, Debug)]
pub struct Auth<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

impl<'a> Auth<'a> {
    pub fn query(name: &'a str, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Per-request tuning knobs for the HTTP client.
///
/// ```
/// use lookout_http::RequestOpts;
/// use std::time::Duration;
///
/// let opts = RequestOpts {
///     timeout: Some(Duration::from_secs(10)),
///     query: Some(vec![("q", "rust".into())]),
///     ..Default::default()
/// };
///
/// assert_eq!(opts.timeout.unwrap().as_secs(), 10);
/// assert!(opts.auth.is_none());
/// ```
#[derive(Clone, Debug, Default)]
pub struct RequestOpts<'a> {
    pub timeout: Option<Duration>,
    pub auth: Option<Auth<'a>>,
    pub query: Option<Vec<(&'a str, Cow<'a, str>)>>,
}

// ==============================
// Client
// ==============================

#[derive(Clone)]
pub struct HttpClient {
    base: Url,
    inner: Client,
    pub default_timeout: Duration,
}

impl HttpClient {
    /// Construct a client anchored to a base URL.
    ///
    /// ```no_run
    /// use lookout_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?;
    /// assert_eq!(client.default_timeout, Duration::from_secs(15));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn new(base: &str) -> Result<Self, HttpError> {
        let base = Url::parse(base).map_err(|e| HttpError::Url(e.to_string()))?;
        let inner = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(concat!("lookout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HttpError::Build(e.to_string()))?;
        Ok(Self {
            base,
            inner,
            default_timeout: Duration::from_secs(15),
        })
    }

    /// Override the default timeout returned by [`HttpClient::new`].
    ///
    /// ```no_run
    /// use lookout_http::{HttpClient, HttpError};
    /// use std::time::Duration;
    ///
    /// let client = HttpClient::new("https://api.example.com")?
    ///     .with_timeout(Duration::from_secs(2));
    /// assert_eq!(client.default_timeout, Duration::from_secs(2));
    /// # Ok::<(), HttpError>(())
    /// ```
    pub fn with_timeout(mut self, dur: Duration) -> Self {
        self.default_timeout = dur;
        self
    }

    /// GET JSON with per-request options (query/auth/timeout).
    pub async fn get_json<T>(&self, path: &str, opts: RequestOpts<'_>) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        self.request_json(Method::GET, path, opts).await
    }

    async fn request_json<T>(
        &self,
        method: Method,
        path: &str,
        opts: RequestOpts<'_>,
    ) -> Result<T, HttpError>
    where
        T: DeserializeOwned,
    {
        let url = self.resolve(path)?;
        let timeout = opts.timeout.unwrap_or(self.default_timeout);

        // Auth params travel with the regular query so both are encoded once.
        let mut query = opts.query.unwrap_or_default();
        let auth_param = opts.auth.as_ref().map(|a| a.name);
        if let Some(Auth { name, value }) = opts.auth {
            query.push((name, value));
        }
        let pairs: Vec<(&str, &str)> = query.iter().map(|(k, v)| (*k, v.as_ref())).collect();

        let rb = self
            .inner
            .request(method.clone(), url.clone())
            .timeout(timeout)
            .query(&pairs);

        tracing::debug!(
            method = %method,
            host_path = %format!("{}{}", url.host_str().unwrap_or("-"), url.path()),
            query = ?redact_pairs(&pairs),
            timeout_ms = timeout.as_millis() as u64,
            auth_param = auth_param.unwrap_or("-"),
            "http.request.start"
        );

        let t0 = Instant::now();
        let resp = rb.send().await.map_err(|e| network_error(e, timeout))?;
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(|e| network_error(e, timeout))?;
        let dur_ms = t0.elapsed().as_millis() as u64;

        tracing::debug!(
            %status,
            duration_ms = dur_ms,
            body_len = bytes.len(),
            "http.response"
        );

        if raw_enabled() {
            let truncated = bytes.len() > RAW_MAX_BODY;
            let body = String::from_utf8_lossy(&bytes[..bytes.len().min(RAW_MAX_BODY)]);
            tracing::info!(target: "http.raw", %status, duration_ms = dur_ms, body = %body, truncated);
        }

        let snippet = snip_body(&bytes);
        tracing::trace!(body_snippet = %snippet, "http.response.body_snippet");

        if status.is_success() {
            return serde_json::from_slice::<T>(&bytes).map_err(|e| {
                tracing::warn!(
                    serde_line = %e.line(),
                    serde_col = %e.column(),
                    serde_err = %e,
                    body_snippet = %snippet,
                    "http.response.decode_error"
                );
                HttpError::Decode(e.to_string(), snippet)
            });
        }

        let message = extract_error_message(&bytes);
        tracing::warn!(%status, message = %message, body_snippet = %snippet, "http.error");
        Err(HttpError::Api { status, message })
    }

    fn resolve(&self, path: &str) -> Result<Url, HttpError> {
        if path.is_empty() {
            return Ok(self.base.clone());
        }
        self.base
            .join(path)
            .map_err(|e| HttpError::Url(e.to_string()))
    }
}

// ==============================
// Helpers
// ==============================

fn network_error(err: reqwest::Error, timeout: Duration) -> HttpError {
    if err.is_timeout() {
        tracing::warn!(timeout_ms = timeout.as_millis() as u64, "http.timeout");
        return HttpError::Timeout(timeout);
    }
    // reqwest embeds the full URL (query included) in its messages.
    let message = err.without_url().to_string();
    tracing::warn!(message = %message, "http.network_error");
    HttpError::Network(message)
}

/// Replace values of well-known secret parameters before logging.
fn redact_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| {
            let is_secret = SECRET_KEYS.contains(&k.to_ascii_lowercase().as_str());
            (
                (*k).to_string(),
                if is_secret {
                    "<redacted>".to_string()
                } else {
                    (*v).to_string()
                },
            )
        })
        .collect()
}

fn extract_error_message(body: &[u8]) -> String {
    // Google/OpenAI style: {"error":{"message":"..."}}
    #[derive(Deserialize)]
    struct Envelope {
        error: Detail,
    }
    #[derive(Deserialize)]
    struct Detail {
        message: String,
    }

    // Generic: {"message":"..."} or {"detail":"..."} or {"error":"..."}
    #[derive(Deserialize)]
    struct Msg {
        #[serde(default)]
        message: String,
        #[serde(default)]
        detail: String,
        #[serde(default)]
        error: String,
    }

    if let Ok(env) = serde_json::from_slice::<Envelope>(body) {
        return env.error.message;
    }
    if let Ok(m) = serde_json::from_slice::<Msg>(body) {
        for candidate in [m.message, m.detail, m.error] {
            if !candidate.is_empty() {
                return candidate;
            }
        }
    }
    snip_body(body)
}

fn snip_body(body: &[u8]) -> String {
    let mut snip = String::from_utf8_lossy(body).to_string();
    if snip.len() > SNIPPET_MAX {
        let mut cut = SNIPPET_MAX;
        while !snip.is_char_boundary(cut) {
            cut -= 1;
        }
        snip.truncate(cut);
        snip.push_str("...");
    }
    snip
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secret_query_values_are_redacted() {
        let redacted = redact_pairs(&[("q", "rust"), ("key", "AIza-secret"), ("cx", "abc")]);
        assert_eq!(
            redacted,
            vec![
                ("q".to_string(), "rust".to_string()),
                ("key".to_string(), "<redacted>".to_string()),
                ("cx".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn error_message_from_google_envelope() {
        let body = br#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(extract_error_message(body), "API key not valid.");
    }

    #[test]
    fn error_message_from_flat_object() {
        assert_eq!(extract_error_message(br#"{"detail":"nope"}"#), "nope");
        assert_eq!(extract_error_message(br#"{"error":"denied"}"#), "denied");
    }

    #[test]
    fn error_message_falls_back_to_snippet() {
        let body = "x".repeat(800);
        let msg = extract_error_message(body.as_bytes());
        assert_eq!(msg.len(), SNIPPET_MAX + 3);
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn snippet_respects_char_boundaries() {
        let body = "é".repeat(400);
        let snip = snip_body(body.as_bytes());
        assert!(snip.ends_with("..."));
    }

    #[test]
    fn empty_path_resolves_to_base() {
        let client = HttpClient::new("https://www.googleapis.com/customsearch/v1").unwrap();
        let url = client.resolve("").unwrap();
        assert_eq!(url.as_str(), "https://www.googleapis.com/customsearch/v1");
    }
}

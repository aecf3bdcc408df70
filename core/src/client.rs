//! The request dispatcher: assembles, signs, and performs platform calls.

use crate::constants::{
    DEFAULT_RETRY, DEFAULT_TIMEOUT, ERRNO_TRANSPORT, QUERY_DEVELOPER_ID, QUERY_RTICK, QUERY_SIGN,
    QUERY_SIGN_TYPE, SIGNATURE_ENCODE_SET, SIGN_TYPE_RSA,
};
use crate::context::Context;
use crate::credential::Credential;
use crate::plaintext::{build_plaintext, is_empty_body};
use crate::signer::RsaSigner;
use crate::time::now_millis;
use crate::{Error, Result};
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::Method;
use log::debug;
use percent_encoding::utf8_percent_encode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Static configuration for a [`Client`].
///
/// There is no ambient state: endpoint, developer id, and transport defaults
/// are all carried here and passed in at construction.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the platform, e.g. `https://api.example.com/openapi/v2`.
    pub endpoint: String,
    /// Developer id issued by the platform, sent on every request.
    pub developer_id: String,
    /// Per-attempt timeout. Defaults to 20s.
    pub timeout: Duration,
    /// Number of additional attempts after a failed one. Defaults to 2.
    pub retry: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            developer_id: String::new(),
            timeout: DEFAULT_TIMEOUT,
            retry: DEFAULT_RETRY,
        }
    }
}

impl Config {
    /// Create a config for the given endpoint and developer id.
    pub fn new(endpoint: impl Into<String>, developer_id: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            developer_id: developer_id.into(),
            ..Default::default()
        }
    }

    /// Override the default per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the default retry count.
    pub fn with_retry(mut self, retry: usize) -> Self {
        self.retry = retry;
        self
    }
}

/// Query and body supplied by an endpoint method.
#[derive(Debug, Clone, Default)]
pub struct RequestData {
    /// Caller query entries, merged over the mandatory triple.
    pub query: Vec<(String, String)>,
    /// JSON request body. `None` (or an empty map) skips the body digest.
    pub body: Option<Value>,
}

impl RequestData {
    /// Create an empty request payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a query entry.
    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Expected shape of the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// The uniform `{errno, errmsg, data}` envelope.
    #[default]
    Json,
    /// Raw bytes, for document downloads.
    Bytes,
}

/// Per-call overrides for [`Client::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Per-attempt timeout; falls back to the client config.
    pub timeout: Option<Duration>,
    /// Retry count; falls back to the client config.
    pub retry: Option<usize>,
    /// Expected response shape.
    pub response_format: ResponseFormat,
}

impl CallOptions {
    /// Options with all defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-attempt timeout for this call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the retry count for this call.
    pub fn with_retry(mut self, retry: usize) -> Self {
        self.retry = Some(retry);
        self
    }

    /// Request the raw response body instead of the JSON envelope.
    pub fn with_response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = format;
        self
    }
}

/// The uniform result envelope every JSON endpoint answers with.
///
/// `errno == 0` conventionally means success, but the exact sentinel is owned
/// by the remote service; this layer passes the envelope through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope {
    /// Remote error number, or [`ERRNO_TRANSPORT`] when synthesized locally.
    pub errno: i64,
    /// Human-readable message.
    #[serde(default)]
    pub errmsg: String,
    /// Endpoint-specific payload.
    #[serde(default)]
    pub data: Value,
}

impl ApiEnvelope {
    /// Envelope synthesized locally when the transport fails.
    pub(crate) fn transport_error(err: impl ToString) -> Self {
        Self {
            errno: ERRNO_TRANSPORT,
            errmsg: err.to_string(),
            data: Value::Object(serde_json::Map::new()),
        }
    }
}

/// Outcome of a dispatched call.
#[derive(Debug, Clone)]
pub enum ApiReply {
    /// Decoded uniform envelope (remote or locally synthesized).
    Envelope(ApiEnvelope),
    /// Raw response body, when [`ResponseFormat::Bytes`] was requested.
    Bytes(Bytes),
}

impl ApiReply {
    /// The envelope, if this reply carries one.
    pub fn as_envelope(&self) -> Option<&ApiEnvelope> {
        match self {
            ApiReply::Envelope(envelope) => Some(envelope),
            ApiReply::Bytes(_) => None,
        }
    }

    /// The raw bytes, if this reply carries them.
    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            ApiReply::Envelope(_) => None,
            ApiReply::Bytes(bytes) => Some(bytes),
        }
    }
}

/// Client dispatching signed requests to the platform.
///
/// Holds the immutable credential-backed [`RsaSigner`] and the transport
/// [`Context`]; cheap to clone and safe to share across tasks. Each call is
/// independently timestamped and signed, so no coordination is needed
/// between concurrent dispatches.
#[derive(Debug, Clone)]
pub struct Client {
    ctx: Context,
    config: Arc<Config>,
    signer: Arc<RsaSigner>,
}

impl Client {
    /// Create a client.
    ///
    /// Fails fast, before any network use, when the config is missing its
    /// endpoint or developer id (`ConfigInvalid`) or the credential does not
    /// hold a usable key pair (`CredentialInvalid`).
    pub fn new(ctx: Context, config: Config, credential: &Credential) -> Result<Self> {
        if config.endpoint.is_empty() {
            return Err(Error::config_invalid("endpoint is empty"));
        }
        if config.developer_id.is_empty() {
            return Err(Error::config_invalid("developer id is empty"));
        }
        let signer = RsaSigner::new(credential)?;

        Ok(Self {
            ctx,
            config: Arc::new(config),
            signer: Arc::new(signer),
        })
    }

    /// Dispatch a signed call to `path` under the configured endpoint.
    ///
    /// The mandatory query triple (`developerId`, a fresh `rtick`,
    /// `signType=rsa`) is merged with the caller's entries, the plaintext is
    /// signed once, and the call is performed with the effective
    /// timeout/retry policy. Every transport-level failure (connection error,
    /// timeout exhaustion, non-success status, undecodable envelope) comes
    /// back as an `Ok` reply carrying a synthesized envelope with errno
    /// [`ERRNO_TRANSPORT`]; `Err` is reserved for requests that cannot be
    /// assembled locally.
    pub async fn dispatch(
        &self,
        method: Method,
        path: &str,
        data: &RequestData,
        options: &CallOptions,
    ) -> Result<ApiReply> {
        let url = format!("{}{}", self.config.endpoint.trim_end_matches('/'), path);
        let query = merge_query(&self.config.developer_id, &data.query);

        let plaintext = build_plaintext(&url, &query, data.body.as_ref())?;
        let signature = self.signer.sign(&plaintext)?;
        debug!("plaintext to sign for {path}: {plaintext}");

        // The wire query keeps merge order; only the canonicalized form that
        // went into the plaintext is sorted. The signature goes last.
        let full_url = format!(
            "{url}?{}&{QUERY_SIGN}={}",
            wire_query(&query),
            utf8_percent_encode(&signature, &SIGNATURE_ENCODE_SET)
        );

        let body = match &data.body {
            Some(body) if !is_empty_body(body) => {
                Bytes::from(serde_json::to_vec(body).map_err(Error::from)?)
            }
            _ => Bytes::new(),
        };

        let timeout = options.timeout.unwrap_or(self.config.timeout);
        let retry = options.retry.unwrap_or(self.config.retry);

        // Retries reuse the already-signed request: the signature and rtick
        // are fixed once per logical call.
        let mut last_err = None;
        for attempt in 0..=retry {
            let mut builder = http::Request::builder()
                .method(method.clone())
                .uri(full_url.as_str());
            if !body.is_empty() {
                builder = builder.header(CONTENT_TYPE, "application/json");
            }
            let req = builder.body(body.clone()).map_err(Error::from)?;

            match tokio::time::timeout(timeout, self.ctx.http_send(req)).await {
                Ok(Ok(resp)) => return Ok(interpret(resp, options.response_format)),
                Ok(Err(err)) => last_err = Some(err),
                Err(_) => {
                    last_err = Some(Error::unexpected(format!(
                        "request timed out after {}ms",
                        timeout.as_millis()
                    )))
                }
            }
            if attempt < retry {
                debug!(
                    "attempt {} of {} for {path} failed, retrying",
                    attempt + 1,
                    retry + 1
                );
            }
        }

        let err = last_err.unwrap_or_else(|| Error::unexpected("transport failed"));
        Ok(ApiReply::Envelope(ApiEnvelope::transport_error(err)))
    }
}

/// Merge the mandatory query triple with caller entries.
///
/// Caller keys win on collision, except `rtick`, which is always freshly
/// generated for the call.
fn merge_query(developer_id: &str, caller: &[(String, String)]) -> Vec<(String, String)> {
    let mut query = vec![
        (QUERY_DEVELOPER_ID.to_string(), developer_id.to_string()),
        (QUERY_RTICK.to_string(), now_millis().to_string()),
        (QUERY_SIGN_TYPE.to_string(), SIGN_TYPE_RSA.to_string()),
    ];

    for (key, value) in caller {
        if key == QUERY_RTICK {
            continue;
        }
        match query.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value.clone(),
            None => query.push((key.clone(), value.clone())),
        }
    }

    query
}

/// Serialize the merged query in its given order, unescaped.
fn wire_query(query: &[(String, String)]) -> String {
    let mut s = String::with_capacity(query.iter().map(|(k, v)| k.len() + v.len() + 2).sum());
    for (i, (k, v)) in query.iter().enumerate() {
        if i > 0 {
            s.push('&');
        }
        s.push_str(k);
        s.push('=');
        s.push_str(v);
    }
    s
}

fn interpret(resp: http::Response<Bytes>, format: ResponseFormat) -> ApiReply {
    if !resp.status().is_success() {
        let status = resp.status();
        let body = String::from_utf8_lossy(resp.body());
        return ApiReply::Envelope(ApiEnvelope::transport_error(format!(
            "remote returned HTTP {status}: {body}"
        )));
    }

    match format {
        ResponseFormat::Bytes => ApiReply::Bytes(resp.into_body()),
        ResponseFormat::Json => match serde_json::from_slice::<ApiEnvelope>(resp.body()) {
            Ok(envelope) => ApiReply::Envelope(envelope),
            Err(err) => ApiReply::Envelope(ApiEnvelope::transport_error(format!(
                "failed to decode response envelope: {err}"
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(input: &[(&str, &str)]) -> Vec<(String, String)> {
        input
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_merge_defaults_come_first() {
        let merged = merge_query("dev-1", &pairs(&[("contractId", "42")]));

        let keys: Vec<&str> = merged.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["developerId", "rtick", "signType", "contractId"]);
        assert_eq!(merged[0].1, "dev-1");
        assert_eq!(merged[2].1, "rsa");
        assert!(merged[1].1.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn test_merge_caller_overrides_in_place() {
        let merged = merge_query("dev-1", &pairs(&[("signType", "other"), ("developerId", "dev-2")]));

        assert_eq!(
            merged.iter().find(|(k, _)| k == "developerId").unwrap().1,
            "dev-2"
        );
        assert_eq!(
            merged.iter().find(|(k, _)| k == "signType").unwrap().1,
            "other"
        );
        assert_eq!(merged.len(), 3);
    }

    #[test]
    fn test_merge_never_accepts_caller_rtick() {
        let merged = merge_query("dev-1", &pairs(&[("rtick", "0")]));
        let rtick = &merged.iter().find(|(k, _)| k == "rtick").unwrap().1;
        assert_ne!(rtick.as_str(), "0");
    }

    #[test]
    fn test_wire_query_keeps_order() {
        let q = pairs(&[("b", "2"), ("a", "1")]);
        assert_eq!(wire_query(&q), "b=2&a=1");
    }

    #[test]
    fn test_transport_error_envelope_shape() {
        let envelope = ApiEnvelope::transport_error("connection refused");
        assert_eq!(envelope.errno, ERRNO_TRANSPORT);
        assert_eq!(envelope.errmsg, "connection refused");
        assert_eq!(envelope.data, serde_json::json!({}));
    }

    #[test]
    fn test_interpret_malformed_envelope() {
        let resp = http::Response::builder()
            .status(200)
            .body(Bytes::from_static(b"<html>gateway error</html>"))
            .unwrap();
        let reply = interpret(resp, ResponseFormat::Json);
        assert_eq!(reply.as_envelope().unwrap().errno, ERRNO_TRANSPORT);
    }

    #[test]
    fn test_interpret_http_error_status() {
        let resp = http::Response::builder()
            .status(502)
            .body(Bytes::from_static(b"bad gateway"))
            .unwrap();
        let reply = interpret(resp, ResponseFormat::Bytes);
        let envelope = reply.as_envelope().unwrap();
        assert_eq!(envelope.errno, ERRNO_TRANSPORT);
        assert!(envelope.errmsg.contains("502"));
    }
}

//! Unary JSON-over-HTTP transport.
//!
//! Each call is a `POST <base>/<service>/<method>` carrying the request message
//! as JSON. Successful responses carry the response message; failed ones carry
//! an error envelope of the form `{"code": ..., "message": ..., "details": ...}`.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::{Code, Method, Status, Transport};
use crate::config::ClientOptions;
use crate::error::ConfigError;
use crate::wire::lenient;

const USER_AGENT: &str = concat!("go2-sdk-rust/", env!("CARGO_PKG_VERSION"));
const API_KEY_HEADER: &str = "x-api-key";
const PROTOCOL_VERSION_HEADER: &str = "connect-protocol-version";

pub struct HttpTransport {
    base_url: String,
    client: Client,
    /// Flipped to `true` exactly once, by `close`
    closed_tx: watch::Sender<bool>,
}

impl HttpTransport {
    pub fn new(options: &ClientOptions) -> Result<Self, ConfigError> {
        options.validate()?;
        let base_url = resolve_base_url(&options.endpoint, options.insecure)?;

        let mut api_key =
            HeaderValue::from_str(&options.api_key).map_err(|_| ConfigError::InvalidApiKey)?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, api_key);
        headers.insert(PROTOCOL_VERSION_HEADER, HeaderValue::from_static("1"));

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(timeout) = options.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        let (closed_tx, _) = watch::channel(false);

        debug!("Created transport for {}", base_url);

        Ok(Self {
            base_url,
            client,
            closed_tx,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, method: Method, request: &Value) -> Result<Value, Status> {
        let url = format!("{}{}", self.base_url, method.path());

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(status_from_reqwest)?;

        let http_status = response.status();
        let body = response.bytes().await.map_err(status_from_reqwest)?;

        if http_status.is_success() {
            decode_message(&body)
        } else {
            Err(decode_error(http_status, &body))
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn unary(&self, method: Method, request: Value) -> Result<Value, Status> {
        let mut closed_rx = self.closed_tx.subscribe();
        let closed = *closed_rx.borrow_and_update();
        if closed {
            return Err(Status::closed());
        }

        debug!(%method, "Sending unary request");

        let result = tokio::select! {
            result = self.send(method, &request) => result,
            _ = wait_closed(&mut closed_rx) => Err(Status::closed()),
        };

        if let Err(status) = &result {
            debug!(%method, code = %status.code(), "Unary call failed: {}", status.message());
        }

        result
    }

    fn close(&self) {
        let was_closed = self.closed_tx.send_replace(true);
        if !was_closed {
            info!("Closed connection to {}", self.base_url);
        }
    }

    fn is_closed(&self) -> bool {
        *self.closed_tx.borrow()
    }
}

async fn wait_closed(closed_rx: &mut watch::Receiver<bool>) {
    loop {
        if closed_rx.changed().await.is_err() {
            return;
        }
        let closed = *closed_rx.borrow_and_update();
        if closed {
            return;
        }
    }
}

fn resolve_base_url(endpoint: &str, insecure: bool) -> Result<String, ConfigError> {
    let endpoint = endpoint.trim().trim_end_matches('/');

    let candidate = if endpoint.contains("://") {
        endpoint.to_string()
    } else if insecure {
        format!("http://{endpoint}")
    } else {
        format!("https://{endpoint}")
    };

    Url::parse(&candidate).map_err(|e| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;

    Ok(candidate)
}

fn status_from_reqwest(error: reqwest::Error) -> Status {
    let code = if error.is_timeout() {
        Code::DEADLINE_EXCEEDED
    } else if error.is_decode() {
        Code::INTERNAL
    } else {
        Code::UNAVAILABLE
    };
    Status::new(code, error.to_string())
}

fn decode_message(body: &[u8]) -> Result<Value, Status> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }

    serde_json::from_slice(body).map_err(|e| {
        warn!("Response body is not valid JSON: {}", e);
        Status::new(Code::INTERNAL, format!("failed to decode response body: {e}"))
    })
}

fn decode_error(http_status: StatusCode, body: &[u8]) -> Status {
    let envelope: ErrorEnvelope = serde_json::from_slice(body).unwrap_or_default();

    let code = envelope
        .code
        .code()
        .filter(|code| *code != Code::OK)
        .unwrap_or_else(|| Code::from_http_status(http_status.as_u16()));

    let message = if envelope.message.is_empty() {
        http_status.canonical_reason().unwrap_or_default().to_string()
    } else {
        envelope.message
    };

    let status = Status::new(code, message);
    match envelope.details.into_text() {
        Some(details) => status.with_details(details),
        None => status,
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ErrorEnvelope {
    #[serde(deserialize_with = "lenient")]
    code: WireCode,
    #[serde(deserialize_with = "lenient")]
    message: String,
    #[serde(deserialize_with = "lenient")]
    details: WireDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum WireCode {
    #[default]
    Missing,
    Number(u32),
    Name(String),
}

impl WireCode {
    fn code(&self) -> Option<Code> {
        match self {
            WireCode::Missing => None,
            WireCode::Number(value) => Some(Code::from_u32(*value)),
            WireCode::Name(name) => Code::from_name(name),
        }
    }
}

/// Error details: either a plain string or a list of detail objects
#[derive(Debug, Default, Deserialize)]
#[serde(untagged)]
enum WireDetails {
    #[default]
    Missing,
    Text(String),
    List(Vec<Value>),
}

impl WireDetails {
    fn into_text(self) -> Option<String> {
        let text = match self {
            WireDetails::Missing => None,
            WireDetails::Text(text) => Some(text),
            WireDetails::List(entries) => entries.into_iter().find_map(|entry| match entry {
                Value::String(text) => Some(text),
                Value::Object(mut fields) => ["debug", "message"].iter().find_map(|key| {
                    match fields.remove(*key) {
                        Some(Value::String(text)) => Some(text),
                        _ => None,
                    }
                }),
                _ => None,
            }),
        };
        text.filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_respects_scheme_and_insecure_flag() {
        assert_eq!(
            resolve_base_url("grpc.go2.ge:443", false).unwrap(),
            "https://grpc.go2.ge:443"
        );
        assert_eq!(
            resolve_base_url("localhost:8080/", true).unwrap(),
            "http://localhost:8080"
        );
        assert_eq!(
            resolve_base_url("http://127.0.0.1:9000", false).unwrap(),
            "http://127.0.0.1:9000"
        );
        assert!(resolve_base_url("", false).is_err());
    }

    #[test]
    fn error_envelope_with_named_code_and_details() {
        let body = br#"{"code":"resource_exhausted","message":"slow down","details":"too many requests"}"#;
        let status = decode_error(StatusCode::TOO_MANY_REQUESTS, body);
        assert_eq!(status.code(), Code::RESOURCE_EXHAUSTED);
        assert_eq!(status.message(), "slow down");
        assert_eq!(status.details(), Some("too many requests"));
    }

    #[test]
    fn error_envelope_with_numeric_code_and_detail_list() {
        let body = br#"{"code":5,"message":"missing","details":[{"type":"x","debug":"link abc not found"}]}"#;
        let status = decode_error(StatusCode::NOT_FOUND, body);
        assert_eq!(status.code(), Code::NOT_FOUND);
        assert_eq!(status.details(), Some("link abc not found"));
    }

    #[test]
    fn error_without_envelope_falls_back_to_http_status() {
        let status = decode_error(StatusCode::UNAUTHORIZED, b"<html>nope</html>");
        assert_eq!(status.code(), Code::UNAUTHENTICATED);
        assert_eq!(status.message(), "Unauthorized");
        assert_eq!(status.details(), None);

        let status = decode_error(StatusCode::BAD_GATEWAY, b"");
        assert_eq!(status.code(), Code::UNAVAILABLE);
    }

    #[test]
    fn empty_success_body_is_an_empty_message() {
        assert_eq!(decode_message(b"").unwrap(), serde_json::json!({}));
        assert_eq!(decode_message(b"  \n").unwrap(), serde_json::json!({}));
        assert_eq!(
            decode_message(b"not json").unwrap_err().code(),
            Code::INTERNAL
        );
    }
}

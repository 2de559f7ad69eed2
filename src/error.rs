use thiserror::Error;

use crate::transport::{Code, Status};

/// Every failure surfaced by a service operation.
///
/// Match on the variant for targeted handling, or treat the whole enum as the
/// base case. `code()` always returns the status code the call failed with.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Go2Error {
    #[error("authentication failed: {0}")]
    Authentication(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("rate limited: {0}")]
    RateLimit(String),
    #[error("{code}: {message}")]
    Api { code: Code, message: String },
}

impl Go2Error {
    pub fn code(&self) -> Code {
        match self {
            Go2Error::Authentication(_) => Code::UNAUTHENTICATED,
            Go2Error::NotFound(_) => Code::NOT_FOUND,
            Go2Error::PermissionDenied(_) => Code::PERMISSION_DENIED,
            Go2Error::Validation(_) => Code::INVALID_ARGUMENT,
            Go2Error::RateLimit(_) => Code::RESOURCE_EXHAUSTED,
            Go2Error::Api { code, .. } => *code,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Go2Error::Authentication(message)
            | Go2Error::NotFound(message)
            | Go2Error::PermissionDenied(message)
            | Go2Error::Validation(message)
            | Go2Error::RateLimit(message)
            | Go2Error::Api { message, .. } => message,
        }
    }
}

impl From<Status> for Go2Error {
    fn from(status: Status) -> Self {
        normalize(&status)
    }
}

/// Map a failed call onto the error taxonomy.
///
/// The message is the status details when present, otherwise the status
/// message, otherwise the default text of the resulting kind.
pub fn normalize(status: &Status) -> Go2Error {
    let message = status
        .details()
        .filter(|details| !details.is_empty())
        .or_else(|| Some(status.message()).filter(|message| !message.is_empty()));

    let text = |default: &'static str| message.unwrap_or(default).to_string();

    match status.code() {
        Code::UNAUTHENTICATED => Go2Error::Authentication(text("Invalid or missing API key")),
        Code::NOT_FOUND => Go2Error::NotFound(text("Resource not found")),
        Code::PERMISSION_DENIED => Go2Error::PermissionDenied(text("Permission denied")),
        Code::INVALID_ARGUMENT => Go2Error::Validation(text("Invalid input")),
        Code::RESOURCE_EXHAUSTED => Go2Error::RateLimit(text("Rate limit exceeded")),
        code => Go2Error::Api {
            code,
            message: text("Unknown error"),
        },
    }
}

/// Problems building a client from its options
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("API key is required")]
    MissingApiKey,
    #[error("API key contains characters that cannot be sent in a header")]
    InvalidApiKey,
    #[error("timeout must be greater than zero")]
    InvalidTimeout,
    #[error("invalid endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

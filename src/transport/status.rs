//! RPC status codes and the failure descriptor returned by a transport

use std::fmt;

use thiserror::Error;

/// A standard RPC status code.
///
/// Stored as the raw numeric value so codes outside the standard range survive
/// a round trip untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Code(u32);

impl Code {
    pub const OK: Code = Code(0);
    pub const CANCELLED: Code = Code(1);
    pub const UNKNOWN: Code = Code(2);
    pub const INVALID_ARGUMENT: Code = Code(3);
    pub const DEADLINE_EXCEEDED: Code = Code(4);
    pub const NOT_FOUND: Code = Code(5);
    pub const ALREADY_EXISTS: Code = Code(6);
    pub const PERMISSION_DENIED: Code = Code(7);
    pub const RESOURCE_EXHAUSTED: Code = Code(8);
    pub const FAILED_PRECONDITION: Code = Code(9);
    pub const ABORTED: Code = Code(10);
    pub const OUT_OF_RANGE: Code = Code(11);
    pub const UNIMPLEMENTED: Code = Code(12);
    pub const INTERNAL: Code = Code(13);
    pub const UNAVAILABLE: Code = Code(14);
    pub const DATA_LOSS: Code = Code(15);
    pub const UNAUTHENTICATED: Code = Code(16);

    const NAMES: [&'static str; 17] = [
        "OK",
        "CANCELLED",
        "UNKNOWN",
        "INVALID_ARGUMENT",
        "DEADLINE_EXCEEDED",
        "NOT_FOUND",
        "ALREADY_EXISTS",
        "PERMISSION_DENIED",
        "RESOURCE_EXHAUSTED",
        "FAILED_PRECONDITION",
        "ABORTED",
        "OUT_OF_RANGE",
        "UNIMPLEMENTED",
        "INTERNAL",
        "UNAVAILABLE",
        "DATA_LOSS",
        "UNAUTHENTICATED",
    ];

    pub const fn from_u32(value: u32) -> Self {
        Code(value)
    }

    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Canonical upper-case name, if this is one of the standard codes
    pub fn name(self) -> Option<&'static str> {
        Self::NAMES.get(self.0 as usize).copied()
    }

    /// Parse a code name as sent by servers.
    ///
    /// Accepts both `not_found` and `NOT_FOUND` forms, and the American
    /// `canceled` spelling used by some protocols.
    pub fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        if upper == "CANCELED" {
            return Some(Code::CANCELLED);
        }
        Self::NAMES
            .iter()
            .position(|candidate| *candidate == upper)
            .map(|index| Code(index as u32))
    }

    /// Status code implied by an HTTP response status when the body carries none
    pub fn from_http_status(status: u16) -> Self {
        match status {
            200..=299 => Code::OK,
            400 => Code::INTERNAL,
            401 => Code::UNAUTHENTICATED,
            403 => Code::PERMISSION_DENIED,
            404 => Code::UNIMPLEMENTED,
            429 | 502 | 503 | 504 => Code::UNAVAILABLE,
            _ => Code::UNKNOWN,
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "CODE({})", self.0),
        }
    }
}

impl From<u32> for Code {
    fn from(value: u32) -> Self {
        Code(value)
    }
}

/// A failed remote call as reported by the transport
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{code}: {message}")]
pub struct Status {
    code: Code,
    message: String,
    details: Option<String>,
}

impl Status {
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn code(&self) -> Code {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    pub(crate) fn closed() -> Self {
        Status::new(Code::CANCELLED, "channel closed")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_in_both_cases() {
        assert_eq!(Code::from_name("not_found"), Some(Code::NOT_FOUND));
        assert_eq!(Code::from_name("RESOURCE_EXHAUSTED"), Some(Code::RESOURCE_EXHAUSTED));
        assert_eq!(Code::from_name("canceled"), Some(Code::CANCELLED));
        assert_eq!(Code::from_name("cancelled"), Some(Code::CANCELLED));
        assert_eq!(Code::from_name("teapot"), None);
    }

    #[test]
    fn unknown_codes_are_preserved() {
        let code = Code::from_u32(42);
        assert_eq!(code.as_u32(), 42);
        assert_eq!(code.name(), None);
        assert_eq!(code.to_string(), "CODE(42)");
        assert_eq!(Code::UNAUTHENTICATED.to_string(), "UNAUTHENTICATED");
    }

    #[test]
    fn http_status_fallback_mapping() {
        assert_eq!(Code::from_http_status(400), Code::INTERNAL);
        assert_eq!(Code::from_http_status(401), Code::UNAUTHENTICATED);
        assert_eq!(Code::from_http_status(403), Code::PERMISSION_DENIED);
        assert_eq!(Code::from_http_status(404), Code::UNIMPLEMENTED);
        assert_eq!(Code::from_http_status(429), Code::UNAVAILABLE);
        assert_eq!(Code::from_http_status(503), Code::UNAVAILABLE);
        assert_eq!(Code::from_http_status(500), Code::UNKNOWN);
    }
}

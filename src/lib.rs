//! Client SDK for the Go2 link platform.
//!
//! [`Go2Client`] exposes the links, analytics, integrations, domains, QR and
//! campaigns services. Every operation is one remote call that resolves to a
//! typed record or a [`Go2Error`].

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod transport;
pub mod wire;

pub use client::Go2Client;
pub use config::{ClientOptions, DEFAULT_ENDPOINT};
pub use error::{normalize, ConfigError, Go2Error};
pub use models::*;
pub use transport::{Code, HttpTransport, Method, Status, Transport};

//! Caching REST client.
//!
//! Wraps any [`Transport`] implementation with the disk-backed response
//! cache from `larder-cache`. Repeat requests that match a fresh cached
//! entry never reach the network; everything else is executed, and the
//! response's own caching headers decide whether it is kept.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod response;
pub mod transport;

pub use auth::{AuthenticationStrategy, SharedSecretAuthentication};
pub use client::CachingClient;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};
pub use request::Request;
pub use response::Response;
pub use transport::{Transport, TransportError, TransportResponse};

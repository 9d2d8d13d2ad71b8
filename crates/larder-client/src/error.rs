use crate::transport::TransportError;
use thiserror::Error;

/// Failures a request through the caching client can surface.
///
/// Cache read and store problems are deliberately absent: they are logged
/// and swallowed, because caching must never fail the request itself.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to open response cache: {0}")]
    Cache(#[from] larder_cache::CacheError),
}

/// Failures while loading client configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

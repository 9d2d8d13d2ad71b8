use crate::auth::AuthenticationStrategy;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::request::Request;
use crate::response::Response;
use crate::transport::Transport;
use larder_cache::{compute_ttl_seconds, ResponseCache};
use std::time::SystemTime;

const DEFAULT_MAX_CACHEABLE_BODY: usize = 1_048_576;

/// REST client that serves repeat requests from a disk-backed cache.
///
/// On a miss the transport executes the request for real; the response's
/// caching headers decide whether and for how long it is kept. Caching is
/// best-effort throughout: a failed store is logged and the fresh response
/// returned anyway, and the caller can never tell from the response whether
/// it came from cache or network.
pub struct CachingClient<T: Transport> {
    transport: T,
    cache: ResponseCache,
    auth: Option<Box<dyn AuthenticationStrategy + Send + Sync>>,
    max_cacheable_body: usize,
}

impl<T: Transport> CachingClient<T> {
    pub fn new(transport: T, cache: ResponseCache) -> Self {
        Self {
            transport,
            cache,
            auth: None,
            max_cacheable_body: DEFAULT_MAX_CACHEABLE_BODY,
        }
    }

    /// Build a client from a loaded config: opens the cache at the
    /// configured directory and applies the body-size limit.
    pub fn from_config(transport: T, config: &ClientConfig) -> Result<Self, ClientError> {
        let cache = ResponseCache::open(&config.cache.dir)?;
        Ok(Self::new(transport, cache).with_max_cacheable_body(config.cache.max_body_bytes))
    }

    pub fn with_auth(
        mut self,
        auth: impl AuthenticationStrategy + Send + Sync + 'static,
    ) -> Self {
        self.auth = Some(Box::new(auth));
        self
    }

    /// Responses with bodies larger than `limit` bytes are never cached.
    pub fn with_max_cacheable_body(mut self, limit: usize) -> Self {
        self.max_cacheable_body = limit;
        self
    }

    pub fn get(&self, uri: &str) -> Result<Response, ClientError> {
        self.execute(Request::get(uri))
    }

    pub fn get_with_headers(
        &self,
        uri: &str,
        headers: &[(&str, &str)],
    ) -> Result<Response, ClientError> {
        self.execute(with_headers(Request::get(uri), headers))
    }

    pub fn post(
        &self,
        uri: &str,
        body: impl Into<bytes::Bytes>,
        content_type: &str,
    ) -> Result<Response, ClientError> {
        self.execute(Request::post(uri, body, content_type))
    }

    pub fn put(
        &self,
        uri: &str,
        body: impl Into<bytes::Bytes>,
        content_type: &str,
    ) -> Result<Response, ClientError> {
        self.execute(Request::put(uri, body, content_type))
    }

    pub fn delete(&self, uri: &str) -> Result<Response, ClientError> {
        self.execute(Request::delete(uri))
    }

    /// Execute a request, via the cache when possible.
    pub fn execute(&self, request: Request) -> Result<Response, ClientError> {
        // The key reflects the logical request; credentials added below do
        // not partition the cache.
        let key = request.cache_key();

        let mut request = request;
        if let Some(auth) = &self.auth {
            auth.authenticate(&mut request);
        }

        if let Some(record) = self.cache.lookup(&key) {
            tracing::debug!(method = %request.method(), uri = %request.uri(), "cache hit");
            return Ok(Response::from(record));
        }

        tracing::debug!(
            method = %request.method(),
            uri = %request.uri(),
            headers = request.headers().len(),
            "cache miss, executing request"
        );
        let raw = self.transport.execute(&request)?;
        let response = Response::from_transport(raw);

        let ttl = compute_ttl_seconds(&response.headers, SystemTime::now());
        if ttl > 0 && response.body.len() <= self.max_cacheable_body {
            if let Err(e) = self.cache.store(&key, &response.to_record(), ttl) {
                tracing::warn!(error = %e, uri = %request.uri(), "failed to cache response");
            }
        }

        Ok(response)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }
}

fn with_headers(mut request: Request, headers: &[(&str, &str)]) -> Request {
    for (name, value) in headers {
        request.add_header(*name, *value);
    }
    request
}

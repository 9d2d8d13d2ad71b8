use bytes::Bytes;
use larder_cache::{CacheKey, Protocol};

/// An outgoing REST request.
///
/// Constructed through the method helpers, optionally extended with
/// headers, then handed to the client. Authentication strategies may add a
/// header or rewrite the URI right before the request goes out.
#[derive(Debug, Clone)]
pub struct Request {
    method: String,
    uri: String,
    protocol: Protocol,
    headers: Vec<(String, String)>,
    body: Option<Bytes>,
}

impl Request {
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            protocol: Protocol::http_1_1(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new("GET", uri)
    }

    pub fn delete(uri: impl Into<String>) -> Self {
        Self::new("DELETE", uri)
    }

    pub fn post(uri: impl Into<String>, body: impl Into<Bytes>, content_type: &str) -> Self {
        Self::new("POST", uri).with_body(body, content_type)
    }

    pub fn put(uri: impl Into<String>, body: impl Into<Bytes>, content_type: &str) -> Self {
        Self::new("PUT", uri).with_body(body, content_type)
    }

    fn with_body(mut self, body: impl Into<Bytes>, content_type: &str) -> Self {
        self.headers
            .push(("content-type".to_string(), content_type.to_string()));
        self.body = Some(body.into());
        self
    }

    /// Builder-style header append. Repeated names are kept as separate
    /// pairs, exactly as they will appear on the wire and in the cache key.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_header(name, value);
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.push((name.into(), value.into()));
    }

    pub fn set_uri(&mut self, uri: impl Into<String>) {
        self.uri = uri.into();
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Snapshot this request's identity. Later mutation of the request does
    /// not affect a key that was already derived.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            self.method.clone(),
            self.uri.clone(),
            self.protocol.clone(),
            self.headers.clone(),
        )
    }
}

use crate::request::Request;

/// Attaches credentials to an outgoing request just before it goes to the
/// transport. The cache key is always derived earlier, so credentials never
/// partition the cache.
pub trait AuthenticationStrategy {
    fn authenticate(&self, request: &mut Request);
}

/// Shared-secret token authentication, attached either as a header or as a
/// query-string parameter.
#[derive(Debug, Clone)]
pub struct SharedSecretAuthentication {
    token_name: String,
    token: String,
    as_header: bool,
}

impl SharedSecretAuthentication {
    /// Send the token as a request header named `token_name`.
    pub fn header(token_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
            token: token.into(),
            as_header: true,
        }
    }

    /// Append the token to the URI as `token_name=<token>`.
    pub fn query_param(token_name: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            token_name: token_name.into(),
            token: token.into(),
            as_header: false,
        }
    }
}

impl AuthenticationStrategy for SharedSecretAuthentication {
    fn authenticate(&self, request: &mut Request) {
        if self.as_header {
            request.add_header(self.token_name.clone(), self.token.clone());
        } else {
            let uri = request.uri();
            let separator = if uri.contains('?') { '&' } else { '?' };
            let uri = format!("{uri}{separator}{}={}", self.token_name, self.token);
            request.set_uri(uri);
        }
    }
}

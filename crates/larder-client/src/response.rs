use crate::transport::TransportResponse;
use bytes::Bytes;
use larder_cache::CacheRecord;
use std::collections::HashMap;

/// A fully-read HTTP response, whether it came from the network or the
/// cache. The caller cannot tell the difference by looking at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl Response {
    /// Collapse a raw transport response into the single-value-per-name
    /// shape the cache stores. Repeated header names are joined with `;`.
    pub fn from_transport(raw: TransportResponse) -> Self {
        let mut headers: HashMap<String, String> = HashMap::with_capacity(raw.headers.len());
        for (name, value) in raw.headers {
            headers
                .entry(name)
                .and_modify(|joined| {
                    joined.push(';');
                    joined.push_str(&value);
                })
                .or_insert(value);
        }
        Self {
            status: raw.status,
            headers,
            body: raw.body,
        }
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body decoded as UTF-8, lossily.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub(crate) fn to_record(&self) -> CacheRecord {
        CacheRecord::new(self.status, self.headers.clone(), self.body.clone())
    }
}

impl From<CacheRecord> for Response {
    fn from(record: CacheRecord) -> Self {
        Self {
            status: record.status,
            headers: record.headers,
            body: record.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(headers: &[(&str, &str)]) -> TransportResponse {
        TransportResponse {
            status: 200,
            headers: headers
                .iter()
                .map(|(n, v)| (n.to_string(), v.to_string()))
                .collect(),
            body: Bytes::from_static(b"body"),
        }
    }

    #[test]
    fn repeated_headers_are_joined_with_semicolons() {
        let response = Response::from_transport(raw(&[
            ("set-cookie", "a=1"),
            ("set-cookie", "b=2"),
            ("content-type", "text/plain"),
        ]));
        assert_eq!(response.header("set-cookie"), Some("a=1;b=2"));
        assert_eq!(response.headers.len(), 2);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = Response::from_transport(raw(&[("Content-Type", "application/json")]));
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn record_conversion_round_trips() {
        let response = Response::from_transport(raw(&[("content-type", "text/plain")]));
        let record = response.to_record();
        assert_eq!(Response::from(record), response);
    }

    #[test]
    fn text_decodes_the_body() {
        let response = Response::from_transport(raw(&[]));
        assert_eq!(response.text(), "body");
        assert!(response.is_success());
    }
}

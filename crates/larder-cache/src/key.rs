use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Protocol triple from a request line, e.g. HTTP/1.1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Protocol {
    pub name: String,
    pub major: u8,
    pub minor: u8,
}

impl Protocol {
    pub fn new(name: impl Into<String>, major: u8, minor: u8) -> Self {
        Self {
            name: name.into(),
            major,
            minor,
        }
    }

    pub fn http_1_1() -> Self {
        Self::new("HTTP", 1, 1)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}.{}", self.name, self.major, self.minor)
    }
}

/// Immutable identity of an outgoing request, used to look responses up.
///
/// Two keys are equal iff method, URI (case-sensitive), and protocol triple
/// match and their header pairs match as an unordered multiset: order never
/// matters, duplicate counts do. Headers are snapshotted at construction;
/// a key never observes later mutation of the request it was derived from.
#[derive(Debug, Clone)]
pub struct CacheKey {
    method: String,
    uri: String,
    protocol: Protocol,
    headers: Vec<(String, String)>,
}

impl CacheKey {
    pub fn new(
        method: impl Into<String>,
        uri: impl Into<String>,
        protocol: Protocol,
        headers: Vec<(String, String)>,
    ) -> Self {
        Self {
            method: method.into(),
            uri: uri.into(),
            protocol,
            headers,
        }
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

    /// Deterministic 64-bit digest of the key.
    ///
    /// Header hashes are accumulated with wrapping addition, so any
    /// permutation of the same header multiset produces the same digest,
    /// consistent with `Eq`. Seeds are fixed so the digest is stable across
    /// processes.
    pub fn fingerprint(&self) -> u64 {
        let state = ahash::RandomState::with_seeds(1, 2, 3, 4);
        let mut header_sum: u64 = 0;
        for (name, value) in &self.headers {
            header_sum = header_sum.wrapping_add(state.hash_one((name.as_str(), value.as_str())));
        }
        state.hash_one((
            self.method.as_str(),
            self.uri.as_str(),
            self.protocol.name.as_str(),
            self.protocol.major,
            self.protocol.minor,
            header_sum,
        ))
    }
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        self.method == other.method
            && self.uri == other.uri
            && self.protocol == other.protocol
            && header_multisets_equal(&self.headers, &other.headers)
    }
}

impl Eq for CacheKey {}

impl Hash for CacheKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.fingerprint());
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} {}]", self.method, self.uri)
    }
}

fn header_multisets_equal(a: &[(String, String)], b: &[(String, String)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut counts: HashMap<(&str, &str), i64> = HashMap::with_capacity(a.len());
    for (name, value) in a {
        *counts.entry((name.as_str(), value.as_str())).or_default() += 1;
    }
    for (name, value) in b {
        match counts.get_mut(&(name.as_str(), value.as_str())) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
    }
    // Lengths match and every pair in b consumed a pair from a.
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect()
    }

    fn key(headers: &[(&str, &str)]) -> CacheKey {
        CacheKey::new(
            "GET",
            "http://api.example.com/v1/items",
            Protocol::http_1_1(),
            pairs(headers),
        )
    }

    #[test]
    fn equal_regardless_of_header_order() {
        let a = key(&[("accept", "application/json"), ("x-trace", "abc")]);
        let b = key(&[("x-trace", "abc"), ("accept", "application/json")]);
        assert_eq!(a, b);
        assert_eq!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn duplicate_counts_are_part_of_identity() {
        let single = key(&[("cookie", "a=1")]);
        let doubled = key(&[("cookie", "a=1"), ("cookie", "a=1")]);
        assert_ne!(single, doubled);

        let doubled_again = key(&[("cookie", "a=1"), ("cookie", "a=1")]);
        assert_eq!(doubled, doubled_again);
        assert_eq!(doubled.fingerprint(), doubled_again.fingerprint());
    }

    #[test]
    fn differing_header_value_not_equal() {
        let a = key(&[("accept", "application/json")]);
        let b = key(&[("accept", "application/xml")]);
        assert_ne!(a, b);
    }

    #[test]
    fn empty_header_sets_equal() {
        assert_eq!(key(&[]), key(&[]));
        assert_eq!(key(&[]).fingerprint(), key(&[]).fingerprint());
    }

    #[test]
    fn uri_comparison_is_case_sensitive() {
        let a = CacheKey::new("GET", "http://host/Path", Protocol::http_1_1(), vec![]);
        let b = CacheKey::new("GET", "http://host/path", Protocol::http_1_1(), vec![]);
        assert_ne!(a, b);
    }

    #[test]
    fn method_and_protocol_distinguish_keys() {
        let get = key(&[]);
        let mut post = get.clone();
        post.method = "POST".to_string();
        assert_ne!(get, post);

        let http10 = CacheKey::new(
            "GET",
            "http://api.example.com/v1/items",
            Protocol::new("HTTP", 1, 0),
            vec![],
        );
        assert_ne!(get, http10);
    }

    #[test]
    fn scrambled_key_finds_map_entry() {
        let mut map = HashMap::new();
        map.insert(key(&[("a", "1"), ("b", "2"), ("c", "3")]), 7_u32);

        let scrambled = key(&[("c", "3"), ("a", "1"), ("b", "2")]);
        assert_eq!(map.get(&scrambled), Some(&7));
    }

    #[test]
    fn fingerprint_is_stable() {
        let k = key(&[("accept", "application/json")]);
        assert_eq!(k.fingerprint(), k.fingerprint());
        assert_eq!(k.fingerprint(), k.clone().fingerprint());
    }
}

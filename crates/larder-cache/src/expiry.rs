use std::collections::HashMap;
use std::time::SystemTime;

/// Compute how long a response may be served from cache, in seconds.
///
/// Header names are matched case-insensitively; `Cache-Control` values are
/// comma-split and each token trimmed. `no-cache`, `no-store`,
/// `must-revalidate`, and `Pragma: no-cache` forbid caching outright, no
/// matter what else is present. Otherwise `max-age` is authoritative over
/// `Expires`, so header iteration order never changes the result.
///
/// Every malformed input fails safe: a `max-age` that does not parse makes
/// the whole computation return 0, an unparseable `Expires` simply
/// contributes nothing. This function never panics.
pub fn compute_ttl_seconds(headers: &HashMap<String, String>, now: SystemTime) -> u64 {
    let mut max_age: Option<u64> = None;
    let mut expires: Option<u64> = None;

    for (name, value) in headers {
        let name = name.trim();
        if name.eq_ignore_ascii_case("cache-control") {
            for token in value.split(',') {
                let token = token.trim();
                if token.eq_ignore_ascii_case("no-cache")
                    || token.eq_ignore_ascii_case("no-store")
                    || token.eq_ignore_ascii_case("must-revalidate")
                {
                    return 0;
                }
                if let Some(rest) = strip_prefix_ignore_ascii_case(token, "max-age") {
                    match parse_max_age(rest) {
                        Some(seconds) => max_age = Some(seconds),
                        // Malformed max-age poisons the response: do not cache.
                        None => return 0,
                    }
                }
            }
        } else if name.eq_ignore_ascii_case("expires") {
            if let Ok(when) = httpdate::parse_http_date(value.trim()) {
                let seconds = when
                    .duration_since(now)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                expires = Some(seconds);
            }
        } else if name.eq_ignore_ascii_case("pragma")
            && value.trim().eq_ignore_ascii_case("no-cache")
        {
            return 0;
        }
    }

    max_age.or(expires).unwrap_or(0)
}

fn strip_prefix_ignore_ascii_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        s.get(prefix.len()..)
    } else {
        None
    }
}

/// `rest` is everything after the `max-age` token name, e.g. `=120`.
/// Negative ages clamp to 0; anything else non-numeric is malformed.
fn parse_max_age(rest: &str) -> Option<u64> {
    let value = rest.trim_start().strip_prefix('=')?.trim();
    let seconds: i64 = value.parse().ok()?;
    Some(seconds.max(0) as u64)
}

//! Cache-disabling response headers.
//!
//! The server exists so a browser pointed at a site under active editing
//! always re-fetches the latest copy. Every response, success or error,
//! leaves with this header triple.

use hyper::header::{self, HeaderMap, HeaderValue};

/// `Cache-Control` value sent on every response.
pub const CACHE_CONTROL_VALUE: &str = "no-cache, no-store, must-revalidate";

/// `Pragma` value for HTTP/1.0 clients and older proxies.
pub const PRAGMA_VALUE: &str = "no-cache";

/// `Expires` value; "0" means already expired.
pub const EXPIRES_VALUE: &str = "0";

/// Append the cache-disabling triple to a response's headers.
///
/// Uses `insert`, so a value a handler may have set is replaced and the
/// triple stays authoritative on every response path.
pub fn apply(headers: &mut HeaderMap) {
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(CACHE_CONTROL_VALUE),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static(PRAGMA_VALUE));
    headers.insert(header::EXPIRES, HeaderValue::from_static(EXPIRES_VALUE));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applies_exact_literal_values() {
        let mut headers = HeaderMap::new();
        apply(&mut headers);
        assert_eq!(
            headers["cache-control"],
            "no-cache, no-store, must-revalidate"
        );
        assert_eq!(headers["pragma"], "no-cache");
        assert_eq!(headers["expires"], "0");
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn replaces_values_a_handler_set() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        );
        apply(&mut headers);
        assert_eq!(headers["cache-control"], CACHE_CONTROL_VALUE);
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn apply_is_idempotent() {
        let mut headers = HeaderMap::new();
        apply(&mut headers);
        apply(&mut headers);
        assert_eq!(headers.len(), 3);
    }
}

//! Stored Response Module
//!
//! Defines the response representation kept in cache stores, plus the size
//! and storage-date inspection used by the eviction manager.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, DATE};
use http::{HeaderMap, HeaderValue, StatusCode};

// == Stored Response ==
/// A cached copy of an HTTP response: status, headers, and full body.
///
/// Clones are cheap (the body is reference-counted) and byte-identical,
/// so strategies can hand one copy to the caller and write another into a
/// store without re-reading anything.
#[derive(Debug, Clone)]
pub struct StoredResponse {
    /// Response status code
    pub status: StatusCode,
    /// Response headers as received (or as synthesized)
    pub headers: HeaderMap,
    /// Complete response body
    pub body: Bytes,
}

impl StoredResponse {
    // == Constructor ==
    /// Creates a stored response from its parts.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    /// Creates a JSON response with `content-type` and `content-length` set.
    ///
    /// Used for synthesized payloads (offline fallbacks, chapter manifests).
    pub fn json(status: StatusCode, value: &serde_json::Value) -> Self {
        let body = value.to_string().into_bytes();
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Ok(len) = HeaderValue::from_str(&body.len().to_string()) {
            headers.insert(CONTENT_LENGTH, len);
        }
        Self::new(status, headers, body)
    }

    /// Stamps the response with the current time in the `date` header.
    ///
    /// Synthesized entries written to the image store need this so the
    /// eviction manager can order them against fetched entries.
    pub fn with_date_now(mut self) -> Self {
        let now = Utc::now().to_rfc2822();
        if let Ok(value) = HeaderValue::from_str(&now) {
            self.headers.insert(DATE, value);
        }
        self
    }

    // == Status ==
    /// Returns true for 2xx statuses.
    pub fn is_ok(&self) -> bool {
        self.status.is_success()
    }

    // == Size Inspection ==
    /// Stored size in bytes, read from the `content-length` header.
    ///
    /// A missing or unparseable header counts as 0. This can under-report
    /// real occupancy for malformed entries; the size report on the control
    /// channel measures actual body bytes instead (see [`Self::body_len`]).
    pub fn size_bytes(&self) -> u64 {
        self.headers
            .get(CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    }

    /// Storage timestamp in Unix milliseconds, read from the `date` header.
    ///
    /// A missing or unparseable header counts as the epoch (0), which sorts
    /// such entries oldest and evicts them first.
    pub fn stored_at_ms(&self) -> i64 {
        self.headers
            .get(DATE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| DateTime::parse_from_rfc2822(v).ok())
            .map(|dt| dt.timestamp_millis())
            .unwrap_or(0)
    }

    /// Actual body length in bytes.
    ///
    /// The control channel's size report sums this across every entry; it
    /// is not guaranteed to agree with [`Self::size_bytes`] when headers
    /// are absent or wrong.
    pub fn body_len(&self) -> u64 {
        self.body.len() as u64
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(name: http::header::HeaderName, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_size_from_content_length() {
        let response = StoredResponse::new(
            StatusCode::OK,
            headers_with(CONTENT_LENGTH, "12345"),
            Bytes::new(),
        );
        assert_eq!(response.size_bytes(), 12345);
    }

    #[test]
    fn test_size_defaults_to_zero() {
        let response = StoredResponse::new(StatusCode::OK, HeaderMap::new(), "payload");
        assert_eq!(response.size_bytes(), 0);
        assert_eq!(response.body_len(), 7);
    }

    #[test]
    fn test_size_unparseable_header_is_zero() {
        let response = StoredResponse::new(
            StatusCode::OK,
            headers_with(CONTENT_LENGTH, "not-a-number"),
            Bytes::new(),
        );
        assert_eq!(response.size_bytes(), 0);
    }

    #[test]
    fn test_stored_at_from_date_header() {
        let response = StoredResponse::new(
            StatusCode::OK,
            headers_with(DATE, "Sat, 01 Jun 2024 12:00:00 +0000"),
            Bytes::new(),
        );
        let parsed = DateTime::parse_from_rfc2822("Sat, 01 Jun 2024 12:00:00 +0000").unwrap();
        assert_eq!(response.stored_at_ms(), parsed.timestamp_millis());
    }

    #[test]
    fn test_stored_at_defaults_to_epoch() {
        let response = StoredResponse::new(StatusCode::OK, HeaderMap::new(), Bytes::new());
        assert_eq!(response.stored_at_ms(), 0);
    }

    #[test]
    fn test_json_sets_headers() {
        let response = StoredResponse::json(StatusCode::OK, &serde_json::json!({"ok": true}));
        assert_eq!(
            response.headers.get(CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(response.size_bytes(), response.body_len());
    }

    #[test]
    fn test_with_date_now_is_recent() {
        let response =
            StoredResponse::json(StatusCode::OK, &serde_json::json!({})).with_date_now();
        let age_ms = Utc::now().timestamp_millis() - response.stored_at_ms();
        assert!(age_ms >= 0);
        assert!(age_ms < 10_000);
    }

    #[test]
    fn test_clone_is_byte_identical() {
        let response = StoredResponse::new(
            StatusCode::OK,
            headers_with(CONTENT_TYPE, "image/png"),
            Bytes::from_static(b"\x89PNG\r\n"),
        );
        let copy = response.clone();
        assert_eq!(copy.status, response.status);
        assert_eq!(copy.headers, response.headers);
        assert_eq!(copy.body, response.body);
    }
}

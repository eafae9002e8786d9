//! Fallback Responses Module
//!
//! The synthesized responses strategies return when both network and cache
//! fail. Every code path through the router terminates in a real response;
//! these are the terminal cases.

use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderValue, StatusCode};

use crate::store::StoredResponse;

/// Error string carried in the offline home-feed payload.
pub const OFFLINE_FEED_ERROR: &str = "Offline - No cached data available";

/// Placeholder shown in place of an unreachable image.
const OFFLINE_IMAGE_SVG: &str = concat!(
    r##"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="300" viewBox="0 0 400 300">"##,
    r##"<rect width="400" height="300" fill="#1a1a2e"/>"##,
    r##"<text x="200" y="150" text-anchor="middle" fill="#e0e0e0" "##,
    r##"font-family="sans-serif" font-size="16">Image unavailable offline</text>"##,
    r##"</svg>"##
);

// == Offline Feed ==
/// Offline fallback for the home-feed endpoint: a well-formed, clearly
/// flagged empty feed with status 200 so the page renders instead of erroring.
pub fn offline_feed() -> StoredResponse {
    StoredResponse::json(
        StatusCode::OK,
        &serde_json::json!({
            "error": OFFLINE_FEED_ERROR,
            "stories": [],
            "offline": true,
        }),
    )
}

// == Offline Image ==
/// Inline SVG placeholder (400x300) returned for unreachable images,
/// status 200 so image elements render it rather than breaking.
pub fn offline_image_placeholder() -> StoredResponse {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/svg+xml"));
    StoredResponse::new(StatusCode::OK, headers, OFFLINE_IMAGE_SVG)
}

// == Generic Offline ==
/// Empty-bodied 503 for everything without a richer fallback.
pub fn offline_unavailable() -> StoredResponse {
    StoredResponse::new(StatusCode::SERVICE_UNAVAILABLE, HeaderMap::new(), "")
}

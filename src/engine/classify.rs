//! Request Classifier Module
//!
//! Pure classification of intercepted requests into the four strategy
//! classes. No side effects, computed fresh per request.

use http::Method;
use url::Url;

use crate::config::Config;
use crate::error::Result;

/// Image file extensions recognized by the classifier, matched
/// case-insensitively against the last path segment.
pub const IMAGE_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "webp", "gif", "svg"];

// == Destination ==
/// The requester's declared destination hint for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    /// Top-level navigation
    Document,
    /// Stylesheet
    Style,
    /// Script
    Script,
    /// Font
    Font,
    /// Image element
    Image,
    /// Anything else (fetch/XHR, workers, ...)
    Other,
}

// == Fetch Request ==
/// An outgoing request as seen at the interception boundary.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Request method
    pub method: Method,
    /// Absolute request URL
    pub url: Url,
    /// Declared destination hint
    pub destination: Destination,
}

impl FetchRequest {
    /// Creates a GET request for a URL with no particular destination.
    pub fn get(url: &str) -> Result<Self> {
        Ok(Self {
            method: Method::GET,
            url: Url::parse(url)?,
            destination: Destination::Other,
        })
    }

    /// Sets the destination hint.
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Only read-only requests are intercepted; everything else passes
    /// through to the network uninspected and unclassified.
    pub fn is_interceptable(&self) -> bool {
        self.method == Method::GET
    }

    /// The store key for this request.
    pub fn key(&self) -> String {
        self.url.to_string()
    }

    /// The URL path.
    pub fn path(&self) -> &str {
        self.url.path()
    }
}

// == Request Class ==
/// The strategy class assigned to an intercepted request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestClass {
    /// JSON API response, network-first
    Api,
    /// Chapter/cover image, cache-first with eviction
    Image,
    /// Application shell asset, cache-first
    Static,
    /// Navigation or anything unmatched, network-first without caching
    Page,
}

// == Classify ==
/// Maps a request to exactly one class. Pure and total.
///
/// Rules are not mutually exclusive, so order decides: image checks run
/// before API-host checks, so an image URL served from the API host still
/// classes as an image; shell matches come next; everything left is a page.
pub fn classify(config: &Config, request: &FetchRequest) -> RequestClass {
    if is_image_url(config, &request.url) {
        RequestClass::Image
    } else if is_api_url(config, &request.url) {
        RequestClass::Api
    } else if is_static_request(config, request) {
        RequestClass::Static
    } else {
        RequestClass::Page
    }
}

fn is_image_url(config: &Config, url: &Url) -> bool {
    if url.host_str() == Some(config.cdn_host.as_str())
        && url.path().starts_with(&config.cdn_image_prefix)
    {
        return true;
    }
    has_image_extension(url.path())
}

fn has_image_extension(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or(path);
    match segment.rsplit_once('.') {
        Some((_, ext)) => IMAGE_EXTENSIONS
            .iter()
            .any(|known| ext.eq_ignore_ascii_case(known)),
        None => false,
    }
}

fn is_api_url(config: &Config, url: &Url) -> bool {
    let host = url.host_str();
    (host == Some(config.app_host.as_str()) && url.path().starts_with(&config.api_path_prefix))
        || host == Some(config.api_host.as_str())
}

fn is_static_request(config: &Config, request: &FetchRequest) -> bool {
    config
        .shell_assets
        .iter()
        .any(|asset| asset == request.path())
        || matches!(
            request.destination,
            Destination::Style | Destination::Script | Destination::Font
        )
}

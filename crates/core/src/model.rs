//! Request and response records exchanged between the dispatcher, the
//! strategies, the stores and the fetch capability.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What the requesting context intends to do with the response.
///
/// Only `Document` changes behavior: a failed top-level navigation may be
/// answered with the cached root document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Document,
    Style,
    Script,
    Image,
    Video,
    #[default]
    Other,
}

impl std::str::FromStr for Destination {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "document" => Ok(Destination::Document),
            "style" => Ok(Destination::Style),
            "script" => Ok(Destination::Script),
            "image" => Ok(Destination::Image),
            "video" => Ok(Destination::Video),
            "" | "other" => Ok(Destination::Other),
            other => Err(Error::InvalidInput(format!("unknown destination: {other}"))),
        }
    }
}

/// An outgoing request as seen by the interceptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub destination: Destination,
}

impl Request {
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self { method: method.into().to_ascii_uppercase(), url: url.into(), destination: Destination::Other }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// A top-level document navigation to `url`.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self { destination: Destination::Document, ..Self::get(url) }
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn is_get(&self) -> bool {
        self.method.eq_ignore_ascii_case("GET")
    }

    pub fn is_navigation(&self) -> bool {
        self.destination == Destination::Document
    }

    pub fn key(&self) -> RequestKey {
        RequestKey::new(&self.method, &self.url)
    }
}

/// Identity of a cache slot: HTTP method plus absolute URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub struct RequestKey {
    pub method: String,
    pub url: String,
}

impl RequestKey {
    pub fn new(method: &str, url: &str) -> Self {
        Self { method: method.to_ascii_uppercase(), url: url.to_string() }
    }

    pub fn get(url: &str) -> Self {
        Self::new("GET", url)
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.url)
    }
}

/// A response snapshot: status, ordered header set and body bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self { status, headers: Vec::new(), body: body.into() }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup; first match wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }
}

/// Where a served response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseSource {
    /// Fresh from the network
    Network,
    /// Read verbatim from a store
    Cache,
    /// The cached root document, served for a failed navigation
    Fallback,
    /// Synthesized "service unavailable" response
    Offline,
}

/// A response handed back to the caller together with its provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Served {
    pub response: Response,
    pub source: ResponseSource,
}

impl Served {
    pub fn network(response: Response) -> Self {
        Self { response, source: ResponseSource::Network }
    }

    pub fn cache(response: Response) -> Self {
        Self { response, source: ResponseSource::Cache }
    }

    pub fn fallback(response: Response) -> Self {
        Self { response, source: ResponseSource::Fallback }
    }

    pub fn offline(response: Response) -> Self {
        Self { response, source: ResponseSource::Offline }
    }
}

/// Result of offering a request to the interceptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intercept {
    /// The engine produced a response.
    Respond(Served),
    /// The request is not network-addressable (or interception is not yet
    /// active) and must be passed through untouched.
    Declined,
}

impl Intercept {
    pub fn served(&self) -> Option<&Served> {
        match self {
            Intercept::Respond(served) => Some(served),
            Intercept::Declined => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_method_normalized() {
        let req = Request::new("post", "https://example.com/api/");
        assert_eq!(req.method, "POST");
        assert!(!req.is_get());
        assert_eq!(req.key(), RequestKey::new("POST", "https://example.com/api/"));
    }

    #[test]
    fn test_navigation_request() {
        let req = Request::navigate("https://example.com/");
        assert!(req.is_get());
        assert!(req.is_navigation());
    }

    #[test]
    fn test_destination_parse() {
        assert_eq!("Document".parse::<Destination>().unwrap(), Destination::Document);
        assert_eq!("".parse::<Destination>().unwrap(), Destination::Other);
        assert!("frame".parse::<Destination>().is_err());
    }

    #[test]
    fn test_header_lookup_case_insensitive() {
        let resp = Response::new(200, "ok").with_header("Content-Type", "text/plain");
        assert_eq!(resp.header("content-type"), Some("text/plain"));
        assert_eq!(resp.header("etag"), None);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(RequestKey::get("https://example.com/a").to_string(), "GET https://example.com/a");
    }
}

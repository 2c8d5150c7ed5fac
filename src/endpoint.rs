//! Websocket endpoint derivation from the hosting page location.
//!
//! The chat server lives on the same origin and path as the page that hosts
//! the client. Only the scheme changes: `https` pages talk `wss`, `http` pages
//! talk plain `ws`. A `ws`/`wss` URL is accepted as its own endpoint. Query
//! strings and fragments are never forwarded.

#[cfg(test)]
#[path = "endpoint_test.rs"]
mod endpoint_test;

/// Error returned by [`PageLocation::parse`].
#[derive(Debug, thiserror::Error)]
pub enum EndpointError {
    /// The URL lacks a scheme or a host.
    #[error("invalid page URL: {0}")]
    InvalidPageUrl(String),
    /// The scheme has no websocket counterpart.
    #[error("unsupported page URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Schemes served over TLS.
const SECURE_SCHEMES: &[&str] = &["https", "wss"];
/// Schemes served in the clear.
const PLAIN_SCHEMES: &[&str] = &["http", "ws"];

/// The parts of a page URL that determine the chat endpoint.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLocation {
    pub scheme: String,
    pub host: String,
    pub path: String,
}

impl PageLocation {
    /// Split a page URL such as `https://chat.example:8443/room?x=1` into
    /// scheme, host (with port) and path.
    ///
    /// # Errors
    ///
    /// Returns [`EndpointError::InvalidPageUrl`] when the scheme or host is
    /// missing, and [`EndpointError::UnsupportedScheme`] for schemes other
    /// than `http`, `https`, `ws` and `wss`.
    pub fn parse(page_url: &str) -> Result<Self, EndpointError> {
        let trimmed = page_url.trim();
        let Some((scheme, rest)) = trimmed.split_once("://") else {
            return Err(EndpointError::InvalidPageUrl(page_url.to_owned()));
        };
        if scheme.is_empty() {
            return Err(EndpointError::InvalidPageUrl(page_url.to_owned()));
        }
        let scheme = scheme.to_ascii_lowercase();
        if !SECURE_SCHEMES.contains(&scheme.as_str()) && !PLAIN_SCHEMES.contains(&scheme.as_str()) {
            return Err(EndpointError::UnsupportedScheme(scheme));
        }

        // Fragment and query never reach the endpoint.
        let rest = rest.split(['?', '#']).next().unwrap_or_default();
        let (host, path) = match rest.find('/') {
            Some(idx) => rest.split_at(idx),
            None => (rest, "/"),
        };
        if host.is_empty() {
            return Err(EndpointError::InvalidPageUrl(page_url.to_owned()));
        }

        Ok(Self {
            scheme,
            host: host.to_owned(),
            path: path.to_owned(),
        })
    }

    /// True when the page itself was served over TLS.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        SECURE_SCHEMES.contains(&self.scheme.as_str())
    }

    /// Websocket URL for the chat server behind this page.
    #[must_use]
    pub fn ws_endpoint(&self) -> String {
        let scheme = if self.is_secure() { "wss" } else { "ws" };
        format!("{scheme}://{}{}", self.host, self.path)
    }
}

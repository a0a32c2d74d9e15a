//! HTTP request/response descriptors and the transport seam.
//!
//! The retry engine only sees [`HttpResponse`] values handed back by a
//! [`RequestExecutor`]; how the bytes travel is the executor's business.
//! [`CurlExecutor`] is the libcurl-backed implementation used by the CLI.

mod parse;
mod transport;

pub use parse::parse_header_lines;
pub use transport::{CurlExecutor, CurlOptions};

/// Status code that signals the client should slow down and retry.
pub const TOO_MANY_REQUESTS: u32 = 429;

/// Request method. Only what the client actually issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Head,
}

/// One logical request. Re-sent unchanged on every retry.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub method: Method,
    /// Extra request headers, sent in insertion order. Repeats are kept.
    pub headers: Headers,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Get,
            headers: Headers::new(),
        }
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self {
            method: Method::Head,
            ..Self::get(url)
        }
    }
}

/// Header lines in arrival (or insertion) order, with case-insensitive lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Builder-style `push`.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// First value for `name`, compared ASCII case-insensitively.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// What the transport hands back for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u32,
    pub headers: Headers,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u32) -> Self {
        Self {
            status,
            headers: Headers::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == TOO_MANY_REQUESTS
    }

    /// Raw `Retry-After` value, if the server sent one.
    pub fn retry_after(&self) -> Option<&str> {
        self.headers.get("retry-after")
    }

    /// `charset` parameter of `Content-Type`, lowercased and unquoted.
    pub fn charset(&self) -> Option<String> {
        let content_type = self.headers.get("content-type")?;
        content_type.split(';').skip(1).find_map(|param| {
            let (name, value) = param.split_once('=')?;
            if name.trim().eq_ignore_ascii_case("charset") {
                Some(value.trim().trim_matches('"').to_ascii_lowercase())
            } else {
                None
            }
        })
    }
}

/// Failure to complete a round trip at all (no usable HTTP status).
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid URL `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("unsupported URL scheme `{0}` (expected http or https)")]
    UnsupportedScheme(String),
    #[error("{0}")]
    Curl(#[from] curl::Error),
    #[error("no response code from {0}")]
    NoStatus(String),
}

/// Performs one HTTP round trip. Called once per attempt by the retry engine.
pub trait RequestExecutor {
    fn perform(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<F> RequestExecutor for F
where
    F: FnMut(&HttpRequest) -> Result<HttpResponse, TransportError>,
{
    fn perform(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

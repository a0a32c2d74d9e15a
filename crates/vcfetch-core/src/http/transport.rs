//! libcurl-backed `RequestExecutor`.
//!
//! One `Easy` handle per attempt; the handle is dropped before the retry loop
//! sleeps, so no connection is held open across a wait.

use super::{parse, HttpRequest, HttpResponse, Method, RequestExecutor, TransportError};
use std::time::Duration;

/// Transfer tuning for `CurlExecutor`.
#[derive(Debug, Clone)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer timeout.
    pub timeout: Duration,
    pub max_redirections: u32,
    pub user_agent: String,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(300),
            max_redirections: 10,
            user_agent: concat!("vcfetch/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Blocking HTTP executor using the curl easy interface.
#[derive(Debug, Clone, Default)]
pub struct CurlExecutor {
    options: CurlOptions,
}

impl CurlExecutor {
    pub fn new(options: CurlOptions) -> Self {
        Self { options }
    }
}

/// Reject anything libcurl would happily fetch that is not HTTP.
fn check_url(raw: &str) -> Result<(), TransportError> {
    let parsed = url::Url::parse(raw).map_err(|source| TransportError::InvalidUrl {
        url: raw.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(TransportError::UnsupportedScheme(other.to_string())),
    }
}

/// One raw header line as text. Invalid UTF-8 is replaced, not dropped, so
/// status lines still split redirect blocks.
fn header_line(data: &[u8]) -> String {
    String::from_utf8_lossy(data).trim_end().to_string()
}

impl RequestExecutor for CurlExecutor {
    fn perform(&mut self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        check_url(&request.url)?;

        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(&request.url)?;
        if request.method == Method::Head {
            easy.nobody(true)?;
        }
        easy.follow_location(true)?;
        easy.max_redirections(self.options.max_redirections)?;
        easy.connect_timeout(self.options.connect_timeout)?;
        easy.timeout(self.options.timeout)?;
        easy.useragent(&self.options.user_agent)?;

        let mut list = curl::easy::List::new();
        for (k, v) in request.headers.iter() {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !request.headers.is_empty() {
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                header_lines.push(header_line(data));
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        if status == 0 {
            return Err(TransportError::NoStatus(request.url.clone()));
        }
        tracing::debug!(
            url = %request.url,
            status,
            body_bytes = body.len(),
            "request completed"
        );

        Ok(HttpResponse {
            status,
            headers: parse::parse_header_lines(&header_lines),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_http_schemes_are_rejected_before_curl() {
        let mut exec = CurlExecutor::default();
        let err = exec
            .perform(&HttpRequest::get("file:///etc/passwd"))
            .unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedScheme(ref s) if s == "file"));
    }

    #[test]
    fn malformed_urls_are_rejected() {
        let mut exec = CurlExecutor::default();
        let err = exec.perform(&HttpRequest::get("not a url")).unwrap_err();
        assert!(matches!(err, TransportError::InvalidUrl { .. }));
    }

    #[test]
    fn non_utf8_header_lines_are_kept() {
        let raw: Vec<String> = [
            &b"HTTP/1.1 302 Found\r\n"[..],
            b"X-Name: caf\xe9\r\n",
            b"HTTP/1.1 429 Too Many Requests\r\n",
            b"X-Note: \xff\xfe\r\n",
            b"Retry-After: 7\r\n",
            b"\r\n",
        ]
        .iter()
        .map(|line| header_line(line))
        .collect();

        assert_eq!(raw[1], "X-Name: caf\u{FFFD}");
        let headers = parse::parse_header_lines(&raw);
        assert_eq!(headers.get("x-name"), None);
        assert_eq!(headers.get("x-note"), Some("\u{FFFD}\u{FFFD}"));
        assert_eq!(headers.get("retry-after"), Some("7"));
    }

    #[test]
    fn default_user_agent_names_the_client() {
        assert!(CurlOptions::default().user_agent.starts_with("vcfetch/"));
    }
}

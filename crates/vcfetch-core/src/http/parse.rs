//! Parse raw HTTP response header lines into `Headers`.

use super::Headers;

/// Parse collected header lines into `Headers`.
///
/// libcurl hands us every header block it sees, including those of
/// intermediate redirects and `100 Continue`. A status line starts a new block,
/// so only the headers of the final response survive.
pub fn parse_header_lines(lines: &[String]) -> Headers {
    let mut headers = Headers::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers = Headers::new();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            headers.push(name, value.trim());
        }
    }

    headers
}

//! Parse HTTP response header lines.

/// Header fields of the final response that the client cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// Body size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
    /// `Content-Type` value if present.
    pub content_type: Option<String>,
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
}

/// Parse collected raw header lines into `(name, value)` pairs.
///
/// Lines are collected across redirects; only the headers after the last
/// status line (`HTTP/...`) belong to the final response.
pub fn parse_header_lines(lines: &[String]) -> Vec<(String, String)> {
    let start = lines
        .iter()
        .rposition(|l| l.trim_start().starts_with("HTTP/"))
        .map(|i| i + 1)
        .unwrap_or(0);

    let mut out = Vec::new();
    for line in &lines[start..] {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            out.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    out
}

/// Last value of a header (case-insensitive name match).
pub(crate) fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .rev()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

impl ResponseHead {
    pub fn from_headers(headers: &[(String, String)]) -> Self {
        ResponseHead {
            content_length: find_header(headers, "content-length").and_then(|v| v.parse().ok()),
            content_type: find_header(headers, "content-type").map(str::to_string),
            content_disposition: find_header(headers, "content-disposition").map(str::to_string),
        }
    }
}

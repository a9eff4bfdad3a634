use crate::http::HttpParseError;
use std::collections::BTreeMap;

/// Lower-cased header name -> value.
pub type Headers = BTreeMap<String, String>;

const HEADER_SEPARATOR: &str = ": ";
const CRLF_BLANK_LINE: &str = "\r\n\r\n";
const LF_BLANK_LINE: &str = "\n\n";

/// Parses a raw header block into a case-insensitive mapping.
///
/// The first line is the start line (`GET / HTTP/1.1` or `HTTP/1.1 200 OK`)
/// and is discarded. Every other line is split on the first `": "`; names are
/// lower-cased and a repeated name keeps the last value.
pub fn parse_headers(raw: &str) -> Result<Headers, HttpParseError> {
    let mut headers = Headers::new();

    for line in raw.lines().skip(1) {
        if line.is_empty() {
            continue;
        }

        let Some((name, value)) = line.split_once(HEADER_SEPARATOR) else {
            return Err(HttpParseError::MalformedHeader {
                line: line.to_string(),
            });
        };

        headers.insert(name.to_ascii_lowercase(), value.to_string());
    }

    Ok(headers)
}

/// Splits a URI on its first `?` into the path and the optional query string.
pub fn split_path(uri: &str) -> (&str, Option<&str>) {
    match uri.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (uri, None),
    }
}

/// Splits a path into its slugs.
///
/// Runs of `/` count as one separator, so the only empty segments are the
/// leading and trailing ones, and both are dropped: `/a/b/` -> `[a, b]`,
/// `//` -> `[]`.
pub fn split_slugs(path: &str) -> Vec<&str> {
    path.split('/').filter(|slug| !slug.is_empty()).collect()
}

/// Splits a raw HTTP message on the first blank line.
pub fn split_message(raw: &str) -> Result<(&str, &str), HttpParseError> {
    let crlf = raw
        .find(CRLF_BLANK_LINE)
        .map(|at| (at, CRLF_BLANK_LINE.len()));
    let lf = raw.find(LF_BLANK_LINE).map(|at| (at, LF_BLANK_LINE.len()));

    let (at, width) = match (crlf, lf) {
        (Some(crlf), Some(lf)) => {
            if crlf.0 <= lf.0 {
                crlf
            } else {
                lf
            }
        }
        (found, None) | (None, found) => found.ok_or(HttpParseError::MissingSeparator)?,
    };

    Ok((&raw[..at], &raw[at + width..]))
}

/// Number of operations in an NDJSON bulk body.
///
/// Each operation is an action line followed by a source line, so the count
/// is the number of non-empty lines halved.
pub fn count_ndjson_operations(body: &str) -> usize {
    body.lines().filter(|line| !line.trim().is_empty()).count() / 2
}

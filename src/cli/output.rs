//! Argument parsing and output helpers

/// Parse a `key=value` assignment; the value may itself contain `=`
pub fn parse_assignment(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("Expected KEY=VALUE, got '{}'", arg)),
    }
}

/// Scheme and host part of a URL, e.g. `https://example.com`
pub fn origin(url: &str) -> &str {
    let start = url.find("://").map(|i| i + 3).unwrap_or(0);
    match url[start..].find(|c: char| matches!(c, '/' | '?' | '#')) {
        Some(end) => &url[..start + end],
        None => url,
    }
}

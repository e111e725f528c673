//! Host, port, and file name extraction from URL and path strings.

use once_cell::sync::Lazy;
use regex::Regex;

/// Scheme, host, port, and path of a URI-ish string. The host group stays
/// empty for bare paths like `/data/models`.
static URI_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:[A-Za-z][A-Za-z0-9+.-]*://)?(?P<host>[^/:?#]+)?(?::(?P<port>\d+))?(?P<path>/[^?#]*)?",
    )
    .expect("uri regex")
});

/// Extract the host name from a URI.
///
/// Returns None for empty strings and bare paths.
pub fn hostname_from_uri(uri: &str) -> Option<String> {
    URI_RE
        .captures(uri)
        .and_then(|caps| caps.name("host"))
        .map(|m| m.as_str().to_string())
}

/// Extract an explicit port from a URI.
pub fn port_from_uri(uri: &str) -> Option<u16> {
    URI_RE
        .captures(uri)
        .and_then(|caps| caps.name("port"))
        .and_then(|m| m.as_str().parse().ok())
}

/// File name of the last path segment, with its extension dropped.
///
/// `"https://host/repo.git"` gives `"repo"`. Returns None when the URI has
/// no path segment to name.
pub fn file_name_from_http(url: &str) -> Option<String> {
    let path = URI_RE
        .captures(url)
        .and_then(|caps| caps.name("path"))
        .map(|m| m.as_str())?;

    let segment = path.rsplit('/').next().filter(|s| !s.is_empty())?;
    match segment.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => Some(stem.to_string()),
        _ => Some(segment.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_from_uri() {
        assert_eq!(
            hostname_from_uri("https://git.example.com/repo.git"),
            Some("git.example.com".to_string())
        );
        assert_eq!(
            hostname_from_uri("hdfs://namenode:9000/data"),
            Some("namenode".to_string())
        );
        assert_eq!(hostname_from_uri("/data/models"), None);
        assert_eq!(hostname_from_uri(""), None);
    }

    #[test]
    fn test_port_from_uri() {
        assert_eq!(port_from_uri("hdfs://namenode:9000/data"), Some(9000));
        assert_eq!(port_from_uri("https://git.example.com/repo.git"), None);
        assert_eq!(port_from_uri("namenode:9000"), Some(9000));
    }

    #[test]
    fn test_file_name_from_http() {
        assert_eq!(
            file_name_from_http("https://host/repo.git"),
            Some("repo".to_string())
        );
        assert_eq!(
            file_name_from_http("https://host/a/b/data.tar.gz"),
            Some("data.tar".to_string())
        );
        assert_eq!(
            file_name_from_http("https://host/plain"),
            Some("plain".to_string())
        );
        assert_eq!(file_name_from_http("https://host/"), None);
        assert_eq!(file_name_from_http("https://host"), None);
    }
}

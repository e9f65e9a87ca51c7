//! URL parsing and query composition

use url::{Host, Url};

/// Parse an absolute `https` URL with a host.
///
/// # Errors
///
/// Returns a builder error if the URL is malformed, is not `https`, or has
/// no host.
pub fn parse_url(url_str: &str) -> crate::Result<Url> {
    let url = Url::parse(url_str).map_err(crate::error::builder)?;

    if url.scheme() != "https" {
        return Err(crate::error::builder(format!(
            "unsupported URL scheme '{}', only https is allowed",
            url.scheme()
        ))
        .with_url(url));
    }

    if url.host_str().is_none() {
        return Err(crate::error::builder("URL has no host").with_url(url));
    }

    Ok(url)
}

/// Append `params` to `base` as URL-encoded query parameters.
///
/// Existing query parameters on `base` are kept; new ones are appended in
/// order.
///
/// # Errors
///
/// Returns a builder error if `base` is not a valid URL.
pub fn build_url<K, V>(base: &str, params: &[(K, V)]) -> crate::Result<String>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut url = Url::parse(base).map_err(crate::error::builder)?;

    if !params.is_empty() {
        let mut query = url.query_pairs_mut();
        for (key, value) in params {
            query.append_pair(key.as_ref(), value.as_ref());
        }
    }

    Ok(url.to_string())
}

/// Host and port to dial for `url`; IPv6 literals come back without brackets
pub(crate) fn authority(url: &Url) -> crate::Result<(String, u16)> {
    let host = match url.host() {
        Some(Host::Domain(domain)) => domain.to_string(),
        Some(Host::Ipv4(addr)) => addr.to_string(),
        Some(Host::Ipv6(addr)) => addr.to_string(),
        None => return Err(crate::error::builder("URL has no host").with_url(url.clone())),
    };
    let port = url
        .port_or_known_default()
        .ok_or_else(|| crate::error::builder("URL has no port").with_url(url.clone()))?;
    Ok((host, port))
}

/// Value of the `Host` header for `url`
pub(crate) fn host_header(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_encoded_query_parameters() {
        let url = build_url(
            "https://localhost:8443/demo/bootswagger/person",
            &[("name", "Ada Lovelace"), ("city", "a&b")],
        )
        .unwrap();
        assert_eq!(
            url,
            "https://localhost:8443/demo/bootswagger/person?name=Ada+Lovelace&city=a%26b"
        );
    }

    #[test]
    fn keeps_existing_query_and_leaves_bare_urls_alone() {
        let url = build_url("https://localhost/search?q=1", &[("page", "2")]).unwrap();
        assert_eq!(url, "https://localhost/search?q=1&page=2");

        let none: [(&str, &str); 0] = [];
        assert_eq!(build_url("https://localhost/x", &none).unwrap(), "https://localhost/x");
    }

    #[test]
    fn only_https_urls_are_dialled() {
        assert!(parse_url("https://127.0.0.1:8443/").is_ok());
        assert!(parse_url("http://localhost/").unwrap_err().is_builder());
        assert!(parse_url("not a url").unwrap_err().is_builder());
    }

    #[test]
    fn authority_uses_default_https_port() {
        let url = parse_url("https://localhost/demo").unwrap();
        assert_eq!(authority(&url).unwrap(), ("localhost".to_string(), 443));
        assert_eq!(host_header(&url), "localhost");
    }

    #[test]
    fn ipv6_hosts_are_dialled_without_brackets() {
        let url = parse_url("https://[::1]:8443/demo").unwrap();
        assert_eq!(authority(&url).unwrap(), ("::1".to_string(), 8443));
        assert_eq!(host_header(&url), "[::1]:8443");
    }
}

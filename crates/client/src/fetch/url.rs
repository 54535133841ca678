//! Wire form of an intercepted request URL.
//!
//! Request keys are built from the URL the application asked for. The client
//! only normalizes what the server cannot observe anyway (host case, the
//! fragment) so the fetched resource is the one the key names.

/// Why a request URL cannot be sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("not network-addressable: {0}")]
    NotAddressable(String),

    #[error("malformed URL: {0}")]
    Malformed(String),
}

/// Parse `input` into the URL sent on the wire.
///
/// Only absolute http(s) URLs with a host are accepted. The host is
/// lowercased and the fragment dropped; path and query are sent verbatim.
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(input).map_err(|e| UrlError::Malformed(format!("{input}: {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(UrlError::NotAddressable(parsed.scheme().to_string()));
    }

    let host = parsed
        .host_str()
        .map(str::to_ascii_lowercase)
        .ok_or_else(|| UrlError::Malformed(format!("{input}: missing host")))?;
    parsed
        .set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("{input}: {e}")))?;
    parsed.set_fragment(None);

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_asset_unchanged() {
        let url = canonicalize("https://shop.example/static/app.js").unwrap();
        assert_eq!(url.as_str(), "https://shop.example/static/app.js");
    }

    #[test]
    fn test_navigation_fragment_dropped() {
        let url = canonicalize("https://Shop.Example/orders/42#summary").unwrap();
        assert_eq!(url.as_str(), "https://shop.example/orders/42");
    }

    #[test]
    fn test_api_query_kept_in_order() {
        let url = canonicalize("https://shop.example/api/cart?page=2&sort=desc").unwrap();
        assert_eq!(url.query(), Some("page=2&sort=desc"));
        assert_eq!(url.path(), "/api/cart");
    }

    #[test]
    fn test_path_case_preserved() {
        let url = canonicalize("http://localhost:8080/Assets/Logo.PNG").unwrap();
        assert_eq!(url.path(), "/Assets/Logo.PNG");
        assert_eq!(url.port(), Some(8080));
    }

    #[test]
    fn test_relative_request_rejected() {
        assert!(matches!(canonicalize("/index.html"), Err(UrlError::Malformed(_))));
    }

    #[test]
    fn test_extension_and_data_urls_not_addressable() {
        assert_eq!(
            canonicalize("chrome-extension://abc/content.js"),
            Err(UrlError::NotAddressable("chrome-extension".into()))
        );
        assert!(matches!(canonicalize("data:text/plain,hi"), Err(UrlError::NotAddressable(_))));
    }

    #[test]
    fn test_blank_rejected() {
        assert_eq!(canonicalize(" \t"), Err(UrlError::Empty));
    }
}

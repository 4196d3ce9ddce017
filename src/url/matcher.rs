use crate::url::domain::domain_host;
use url::Url;

/// Scheme assumed for root-relative links
const ROOT_RELATIVE_SCHEME: &str = "https";

/// Resolves an `href` attribute to an absolute URL string
///
/// - An absolute reference (one with a host) is returned unchanged.
/// - A protocol-relative reference (`//host/path`) gets the `https:` scheme.
/// - A root-relative reference (`/path`) is prefixed with `https://` and the
///   host of `domain`.
/// - Anything else (fragments, relative paths, `mailto:` and other host-less
///   schemes) yields `None`.
///
/// # Examples
///
/// ```
/// use news_harvest::url::resolve_href;
///
/// assert_eq!(
///     resolve_href("/a/b", "example.com/news/"),
///     Some("https://example.com/a/b".to_string())
/// );
/// assert_eq!(resolve_href("#frag", "example.com"), None);
/// ```
pub fn resolve_href(href: &str, domain: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() {
        return None;
    }

    if let Some(rest) = href.strip_prefix("//") {
        if rest.is_empty() || rest.starts_with('/') {
            return None;
        }
        return Some(format!("{}:{}", ROOT_RELATIVE_SCHEME, href));
    }

    if let Ok(url) = Url::parse(href) {
        if url.host_str().is_some_and(|h| !h.is_empty()) {
            return Some(href.to_string());
        }
        return None;
    }

    if href.starts_with('/') {
        return Some(format!(
            "{}://{}{}",
            ROOT_RELATIVE_SCHEME,
            domain_host(domain),
            href
        ));
    }

    None
}

/// Returns true for a root-relative reference (`/path`, not `//host`)
///
/// Such a link points at the same host as the page it appears on, so it is
/// internal whatever path scope the owning domain carries.
pub fn is_root_relative(href: &str) -> bool {
    let href = href.trim();
    href.starts_with('/') && !href.starts_with("//")
}

/// Checks whether an absolute URL is external to a configured domain
///
/// A URL is external when the domain string does not occur anywhere in it.
/// This is a substring test, not host equality: `https://example.com.evil.test/`
/// counts as internal to `example.com`, and with a path-scoped domain such as
/// `example.com/news/` a page at `https://example.com/about` counts as external.
///
/// # Examples
///
/// ```
/// use news_harvest::url::is_external;
///
/// assert!(is_external("https://other.example/x", "example.com"));
/// assert!(!is_external("https://example.com/a/b", "example.com"));
/// ```
pub fn is_external(url: &str, domain: &str) -> bool {
    !url.contains(domain)
}

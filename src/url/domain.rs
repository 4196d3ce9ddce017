use url::Url;

/// Returns the host part of a configured domain
///
/// Configured domains may carry a path scope ("esgdive.com/news/"); the host is
/// everything before the first `/`. A port, if present, stays attached.
///
/// # Examples
///
/// ```
/// use news_harvest::url::domain_host;
///
/// assert_eq!(domain_host("esgdive.com/news/"), "esgdive.com");
/// assert_eq!(domain_host("esgtoday.com"), "esgtoday.com");
/// ```
pub fn domain_host(domain: &str) -> &str {
    domain.split('/').next().unwrap_or(domain)
}

/// Returns the network location of a URL: its host plus any explicit port
///
/// Default ports are already dropped by the URL parser, so
/// `https://example.com:443/` yields `example.com`.
pub fn netloc(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

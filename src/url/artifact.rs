use crate::url::domain::netloc;
use crate::UrlError;
use url::Url;

/// Character joining the host and path segments in artifact names
const JOIN: char = '-';

/// Derives the PDF file name for an external URL
///
/// The name is `<host>-<path with '/' replaced by '-'>.pdf`. Slashes at either
/// end of the path are dropped before joining, so the root page of a site maps
/// to `<host>.pdf` and a trailing slash does not leave a dangling `-`. Query
/// string and fragment do not take part in the name.
///
/// # Examples
///
/// ```
/// use news_harvest::url::artifact_file_name;
///
/// assert_eq!(
///     artifact_file_name("https://vendor.test/report").unwrap(),
///     "vendor.test-report.pdf"
/// );
/// assert_eq!(
///     artifact_file_name("https://host.example/a/b/").unwrap(),
///     "host.example-a-b.pdf"
/// );
/// ```
pub fn artifact_file_name(url: &str) -> Result<String, UrlError> {
    let parsed = Url::parse(url).map_err(|e| UrlError::Parse(format!("{}: {}", url, e)))?;
    let host = netloc(&parsed).ok_or_else(|| UrlError::MissingHost(url.to_string()))?;

    let path = parsed.path().replace('/', &JOIN.to_string());
    let path = path.trim_matches(JOIN);

    if path.is_empty() {
        Ok(format!("{}.pdf", host))
    } else {
        Ok(format!("{}{}{}.pdf", host, JOIN, path))
    }
}

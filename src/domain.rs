/// Domain extraction for Tab Tidy
use url::Url;

/// Group label for tabs whose URL has no usable hostname
pub const OTHER_LABEL: &str = "other";

/// Extract the grouping key from a URL
///
/// The URL is parsed with the WHATWG rules the browser itself uses, so the
/// hostname comes back lower-cased for http(s) URLs. Exactly one leading
/// `www.` is stripped.
///
/// Examples:
/// - https://www.google.com/search → google.com
/// - https://docs.google.com/document/d/1 → docs.google.com
/// - http://localhost:3000 → localhost
/// - not a url → other
/// - about:blank → other
pub fn extract_domain(url: &str) -> String {
    match Url::parse(url.trim()) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) if !host.is_empty() => {
                host.strip_prefix("www.").unwrap_or(host).to_string()
            }
            _ => OTHER_LABEL.to_string(),
        },
        Err(e) => {
            log::debug!("Falling back to '{}' for {:?}: {}", OTHER_LABEL, url, e);
            OTHER_LABEL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_basic() {
        assert_eq!(extract_domain("https://www.google.com"), "google.com");
        assert_eq!(extract_domain("https://google.com"), "google.com");
        assert_eq!(extract_domain("http://google.com"), "google.com");
    }

    #[test]
    fn test_extract_domain_keeps_subdomains() {
        assert_eq!(extract_domain("https://docs.google.com/x"), "docs.google.com");
        assert_eq!(extract_domain("https://mail.google.com/mail"), "mail.google.com");
        assert_eq!(extract_domain("https://news.bbc.co.uk/article"), "news.bbc.co.uk");
    }

    #[test]
    fn test_extract_domain_strips_exactly_one_www() {
        assert_eq!(extract_domain("https://www.github.com/rust-lang"), "github.com");
        assert_eq!(extract_domain("https://www.www.example.com"), "www.example.com");
        assert_eq!(extract_domain("https://wwwexample.com"), "wwwexample.com");
        assert_eq!(extract_domain("https://sub.www.example.com"), "sub.www.example.com");
    }

    #[test]
    fn test_extract_domain_with_path_query_and_port() {
        assert_eq!(extract_domain("https://www.google.com/search?q=rust"), "google.com");
        assert_eq!(extract_domain("http://localhost:3000/app"), "localhost");
        assert_eq!(extract_domain("http://127.0.0.1:8080"), "127.0.0.1");
    }

    #[test]
    fn test_extract_domain_lowercases_host() {
        assert_eq!(extract_domain("https://WWW.GitHub.COM/User"), "github.com");
    }

    #[test]
    fn test_extract_domain_malformed() {
        assert_eq!(extract_domain(""), OTHER_LABEL);
        assert_eq!(extract_domain("not-a-url"), OTHER_LABEL);
        assert_eq!(extract_domain("https://"), OTHER_LABEL);
        assert_eq!(extract_domain("http://[::1"), OTHER_LABEL);
    }

    #[test]
    fn test_extract_domain_hostless_schemes() {
        assert_eq!(extract_domain("about:blank"), OTHER_LABEL);
        assert_eq!(extract_domain("file:///home/user/notes.txt"), OTHER_LABEL);
        assert_eq!(extract_domain("chrome://extensions"), "extensions");
    }
}

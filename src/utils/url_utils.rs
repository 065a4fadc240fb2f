//! URL helpers for navigation.

use url::Url;

/// Parse `url` and derive the referrer sent with its navigation.
///
/// The referrer is the origin-like `scheme://host[:port]` of the URL itself,
/// so a page appears to be reached from its own site.
pub fn referrer_for(url: &str) -> Result<String, url::ParseError> {
    let parsed = Url::parse(url)?;
    Ok(origin_of(&parsed))
}

fn origin_of(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default();
    match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn referrer_is_scheme_and_host() {
        assert_eq!(
            referrer_for("https://old.reddit.com/r/rust/comments/1?x=y#frag").unwrap(),
            "https://old.reddit.com"
        );
    }

    #[test]
    fn referrer_keeps_explicit_port() {
        assert_eq!(
            referrer_for("http://localhost:8080/index.html").unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn relative_url_does_not_parse() {
        assert!(referrer_for("/just/a/path").is_err());
        assert!(referrer_for("not a url").is_err());
    }
}

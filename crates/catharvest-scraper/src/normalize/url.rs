//! Site-relative URL absolutization.

/// Path prefixes that are relative to the site root even without a leading `/`.
const RELATIVE_ROOTS: [&str; 3] = ["media/", "product/", "c/"];

/// Turns a site-relative URL into an absolute one under `base_url`.
///
/// - Already has a scheme (`https://…`) → unchanged.
/// - Starts with `/` → `base_url` + url.
/// - Starts with a known relative root (`media/`, `product/`, `c/`) →
///   `base_url` + `/` + url.
/// - Anything else (including the empty string) → unchanged.
///
/// Applying it twice gives the same result as applying it once.
#[must_use]
pub fn absolutize_url(url: &str, base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if url.is_empty() || has_scheme(url) {
        return url.to_owned();
    }
    if url.starts_with('/') {
        return format!("{base}{url}");
    }
    if RELATIVE_ROOTS.iter().any(|root| url.starts_with(root)) {
        return format!("{base}/{url}");
    }
    url.to_owned()
}

/// `true` for `scheme://…` where the scheme is an RFC 3986 scheme name.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://www.rei.com";

    #[test]
    fn absolute_url_is_unchanged() {
        assert_eq!(
            absolutize_url("https://cdn.example.com/a.jpg", BASE),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(absolutize_url("http://x.com", BASE), "http://x.com");
    }

    #[test]
    fn root_relative_url_gets_base() {
        assert_eq!(
            absolutize_url("/product/2045/tee", BASE),
            "https://www.rei.com/product/2045/tee"
        );
    }

    #[test]
    fn known_relative_roots_get_base_and_slash() {
        assert_eq!(
            absolutize_url("media/abc.jpg", BASE),
            "https://www.rei.com/media/abc.jpg"
        );
        assert_eq!(
            absolutize_url("c/womens-t-shirts", BASE),
            "https://www.rei.com/c/womens-t-shirts"
        );
    }

    #[test]
    fn unknown_relative_path_is_unchanged() {
        assert_eq!(absolutize_url("images/abc.jpg", BASE), "images/abc.jpg");
        assert_eq!(absolutize_url("", BASE), "");
    }

    #[test]
    fn trailing_slash_on_base_is_ignored() {
        assert_eq!(
            absolutize_url("/media/a.jpg", "https://www.rei.com/"),
            "https://www.rei.com/media/a.jpg"
        );
    }

    #[test]
    fn absolutization_is_idempotent() {
        for raw in ["/media/a.jpg", "media/a.jpg", "https://x.com/y", "other", ""] {
            let once = absolutize_url(raw, BASE);
            assert_eq!(absolutize_url(&once, BASE), once, "input: {raw}");
        }
    }

    #[test]
    fn scheme_detection_rejects_paths_containing_separator() {
        assert!(!has_scheme("/redirect?to=https://x.com"));
        assert!(has_scheme("git+ssh://host/repo"));
    }
}

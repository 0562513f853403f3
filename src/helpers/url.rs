//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::config::SiteConfig;

/// Characters escaped by JavaScript's `encodeURIComponent`
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Generate a site-relative URL
///
/// # Examples
/// ```ignore
/// url_for("/css/style.css") // -> "/css/style.css"
/// url_for("blog/hello/")    // -> "/blog/hello/"
/// ```
pub fn url_for(path: &str) -> String {
    format!("/{}", path.trim_start_matches('/'))
}

/// Generate a full URL including the host
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/blog/hello") // -> "https://krishkrish.com/blog/hello"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!("{}{}", config.url.trim_end_matches('/'), url_for(path))
}

/// Site-relative path of a blog post, with trailing slash
pub fn post_path(config: &SiteConfig, id: &str) -> String {
    format!("/{}/{}/", config.blog_dir.trim_matches('/'), id)
}

/// Canonical absolute URL of a blog post, e.g. `https://krishkrish.com/blog/{id}`
pub fn post_url(config: &SiteConfig, id: &str) -> String {
    full_url_for(
        config,
        &format!("{}/{}", config.blog_dir.trim_matches('/'), id),
    )
}

/// Percent-encode a query value the way `encodeURIComponent` does
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// Build an absolute endpoint URL with ordered, encoded query parameters
pub fn endpoint_url(config: &SiteConfig, endpoint: &str, params: &[(&str, &str)]) -> String {
    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, encode_component(value)))
        .collect::<Vec<_>>()
        .join("&");

    let base = full_url_for(config, endpoint);
    if query.is_empty() {
        base
    } else {
        format!("{}?{}", base, query)
    }
}

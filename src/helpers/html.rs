//! HTML helper functions

use serde::{Serialize, Serializer};
use std::fmt;

/// An HTML fragment that is already safe to emit without escaping.
///
/// Only the content pipeline builds these; renderers inject them verbatim and
/// never sanitize them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrustedHtml(String);

impl TrustedHtml {
    /// Mark a fragment as trusted
    pub fn new(html: impl Into<String>) -> Self {
        Self(html.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrustedHtml {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for TrustedHtml {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// Escape text placed between tags
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape a value placed inside a double-quoted attribute
pub fn escape_attr(s: &str) -> String {
    html_escape(s).replace('"', "&quot;")
}

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to("https://robinhood.com", "Robinhood") // -> <a href="..." target="_blank" rel="noopener">Robinhood</a>
/// ```
pub fn link_to(href: &str, text: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        format!(
            r#"<a href="{}" target="_blank" rel="noopener">{}</a>"#,
            escape_attr(href),
            html_escape(text)
        )
    } else {
        format!(r#"<a href="{}">{}</a>"#, escape_attr(href), html_escape(text))
    }
}

/// Generate an image tag
pub fn image_tag(src: &str, alt: &str, class: Option<&str>) -> String {
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, escape_attr(c)))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}"{}>"#,
        escape_attr(src),
        escape_attr(alt),
        class_attr
    )
}

/// Strip HTML tags from a string
pub fn strip_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;

    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }

    result
}

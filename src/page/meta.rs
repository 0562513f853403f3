//! Document metadata: title plus search and social preview tags

use crate::config::SiteConfig;
use crate::content::PostData;
use crate::helpers::{
    endpoint_url, escape_attr, format_publish_date, full_url_for, html_escape, post_url,
};

/// One tag in the document head
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadTag {
    /// `<meta property=... content=...>` (Open Graph style)
    Property { property: String, content: String },
    /// `<meta name=... content=...>`
    Name { name: String, content: String },
    /// `<meta http-equiv=... content=...>`
    HttpEquiv { http_equiv: String, content: String },
    /// `<link rel=... href=...>`
    Link { rel: String, href: String },
}

impl HeadTag {
    pub fn property(property: &str, content: impl Into<String>) -> Self {
        Self::Property {
            property: property.to_string(),
            content: content.into(),
        }
    }

    pub fn name(name: &str, content: impl Into<String>) -> Self {
        Self::Name {
            name: name.to_string(),
            content: content.into(),
        }
    }

    pub fn http_equiv(http_equiv: &str, content: impl Into<String>) -> Self {
        Self::HttpEquiv {
            http_equiv: http_equiv.to_string(),
            content: content.into(),
        }
    }

    pub fn link(rel: &str, href: impl Into<String>) -> Self {
        Self::Link {
            rel: rel.to_string(),
            href: href.into(),
        }
    }

    /// Key the tag is looked up by (property, name, http-equiv or rel)
    pub fn key(&self) -> &str {
        match self {
            Self::Property { property, .. } => property,
            Self::Name { name, .. } => name,
            Self::HttpEquiv { http_equiv, .. } => http_equiv,
            Self::Link { rel, .. } => rel,
        }
    }

    /// Content (or href) of the tag
    pub fn value(&self) -> &str {
        match self {
            Self::Property { content, .. }
            | Self::Name { content, .. }
            | Self::HttpEquiv { content, .. } => content,
            Self::Link { href, .. } => href,
        }
    }

    pub fn to_html(&self) -> String {
        match self {
            Self::Property { property, content } => format!(
                r#"<meta property="{}" content="{}">"#,
                escape_attr(property),
                escape_attr(content)
            ),
            Self::Name { name, content } => format!(
                r#"<meta name="{}" content="{}">"#,
                escape_attr(name),
                escape_attr(content)
            ),
            Self::HttpEquiv {
                http_equiv,
                content,
            } => format!(
                r#"<meta http-equiv="{}" content="{}">"#,
                escape_attr(http_equiv),
                escape_attr(content)
            ),
            Self::Link { rel, href } => format!(
                r#"<link rel="{}" href="{}">"#,
                escape_attr(rel),
                escape_attr(href)
            ),
        }
    }
}

/// Everything that goes into `<head>` besides styles
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMeta {
    pub title: String,
    pub tags: Vec<HeadTag>,
}

impl PageMeta {
    /// Metadata for a blog post page
    pub fn for_post(config: &SiteConfig, post: &PostData) -> Self {
        let title = format!("{} • {}", config.blog_title, post.title);
        let url = post_url(config, &post.id);
        let image = og_image_url(config, post);

        let mut tags = vec![
            HeadTag::property("og:title", title.clone()),
            HeadTag::property("og:type", "website"),
            HeadTag::property("og:description", post.description.clone()),
            HeadTag::property("og:url", url.clone()),
            HeadTag::name("twitter:card", "summary_large_image"),
            HeadTag::property("twitter:domain", config.domain()),
            HeadTag::property("twitter:url", url),
            HeadTag::property("twitter:description", post.description.clone()),
        ];
        tags.extend(seo_tags(config));
        tags.push(HeadTag::property("og:image", image.clone()));
        tags.push(HeadTag::property("twitter:image", image));

        Self { title, tags }
    }

    /// Metadata for the home page
    pub fn for_home(config: &SiteConfig) -> Self {
        let url = full_url_for(config, "/");
        let mut tags = vec![
            HeadTag::property("og:title", config.title.clone()),
            HeadTag::property("og:type", "website"),
            HeadTag::property("og:description", config.description.clone()),
            HeadTag::property("og:url", url.clone()),
            HeadTag::name("twitter:card", "summary"),
            HeadTag::property("twitter:domain", config.domain()),
            HeadTag::property("twitter:url", url),
            HeadTag::property("twitter:description", config.description.clone()),
        ];
        tags.extend(seo_tags(config));
        Self {
            title: config.title.clone(),
            tags,
        }
    }

    /// Metadata for the not-found page; kept out of search indexes
    pub fn for_not_found(config: &SiteConfig) -> Self {
        let mut tags: Vec<HeadTag> = seo_tags(config)
            .into_iter()
            .filter(|tag| tag.key() != "robots")
            .collect();
        tags.insert(0, HeadTag::name("robots", "noindex"));
        Self {
            title: format!("{} • Not found", config.title),
            tags,
        }
    }

    /// First tag value with the given key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|tag| tag.key() == key)
            .map(HeadTag::value)
    }

    /// Render the `<title>` and every tag, one per line
    pub fn to_html(&self) -> String {
        let mut lines = vec![format!("<title>{}</title>", html_escape(&self.title))];
        lines.extend(self.tags.iter().map(HeadTag::to_html));
        lines.join("\n")
    }
}

/// Static search-engine tags shared by every page
fn seo_tags(config: &SiteConfig) -> Vec<HeadTag> {
    vec![
        HeadTag::name("robots", "index, follow"),
        HeadTag::http_equiv("Content-Type", "text/html; charset=utf-8"),
        HeadTag::name("language", config.language.clone()),
        HeadTag::name("viewport", "width=device-width"),
        HeadTag::link("icon", config.favicon.clone()),
    ]
}

/// Preview-image URL for a post on the `og_endpoint`
pub fn og_image_url(config: &SiteConfig, post: &PostData) -> String {
    let publish_time = format_publish_date(&post.date);
    endpoint_url(
        config,
        &config.og_endpoint,
        &[
            ("title", post.title.as_str()),
            ("description", post.description.as_str()),
            ("publishTime", publish_time.as_str()),
            ("readingTime", post.read_time.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::TrustedHtml;
    use chrono::NaiveDate;

    fn hello_world() -> PostData {
        PostData {
            id: "hello-world".to_string(),
            title: "Hello World".to_string(),
            date: NaiveDate::from_ymd_opt(2021, 1, 1).unwrap(),
            content_html: TrustedHtml::new("<p>Hi</p>"),
            table_of_contents: TrustedHtml::new("<ul></ul>"),
            read_time: "5".to_string(),
            description: "intro post".to_string(),
        }
    }

    #[test]
    fn test_og_image_url() {
        let config = SiteConfig::default();
        assert_eq!(
            og_image_url(&config, &hello_world()),
            "https://krishkrish.com/api/og?title=Hello%20World&description=intro%20post&publishTime=Jan%201%2C%202021&readingTime=5"
        );
    }

    #[test]
    fn test_og_image_url_encodes_reserved_characters() {
        let config = SiteConfig::default();
        let mut post = hello_world();
        post.title = "Rust & You: 100% safe?".to_string();
        post.description = "a/b #c".to_string();
        let url = og_image_url(&config, &post);
        assert!(url.contains("title=Rust%20%26%20You%3A%20100%25%20safe%3F&"));
        assert!(url.contains("description=a%2Fb%20%23c&"));
    }

    #[test]
    fn test_post_meta() {
        let config = SiteConfig::default();
        let meta = PageMeta::for_post(&config, &hello_world());

        assert_eq!(meta.title, "krish's blog • Hello World");
        assert_eq!(meta.get("og:title"), Some("krish's blog • Hello World"));
        assert_eq!(meta.get("og:type"), Some("website"));
        assert_eq!(meta.get("og:description"), Some("intro post"));
        assert_eq!(
            meta.get("og:url"),
            Some("https://krishkrish.com/blog/hello-world")
        );
        assert_eq!(
            meta.get("twitter:url"),
            Some("https://krishkrish.com/blog/hello-world")
        );
        assert_eq!(meta.get("twitter:card"), Some("summary_large_image"));
        assert_eq!(meta.get("twitter:domain"), Some("krishkrish.com"));
        assert_eq!(meta.get("twitter:description"), Some("intro post"));
        assert_eq!(meta.get("robots"), Some("index, follow"));
        assert_eq!(
            meta.get("Content-Type"),
            Some("text/html; charset=utf-8")
        );
        assert_eq!(meta.get("language"), Some("English"));
        assert_eq!(meta.get("viewport"), Some("width=device-width"));
        assert_eq!(meta.get("icon"), Some("/favicon.ico"));
        assert_eq!(meta.get("og:image"), meta.get("twitter:image"));
        assert_eq!(
            meta.get("og:image"),
            Some(og_image_url(&config, &hello_world()).as_str())
        );
    }

    #[test]
    fn test_post_urls_follow_id() {
        let config = SiteConfig::default();
        for id in ["a", "rust-2024", "x_y"] {
            let mut post = hello_world();
            post.id = id.to_string();
            let meta = PageMeta::for_post(&config, &post);
            let expected = format!("https://krishkrish.com/blog/{}", id);
            assert_eq!(meta.get("og:url"), Some(expected.as_str()));
            assert_eq!(meta.get("twitter:url"), Some(expected.as_str()));
        }
    }

    #[test]
    fn test_meta_html_escapes_attributes() {
        let config = SiteConfig::default();
        let meta = PageMeta::for_post(&config, &hello_world());
        let html = meta.to_html();
        assert!(html.starts_with("<title>krish's blog • Hello World</title>\n"));
        assert!(html.contains(r#"<meta name="twitter:card" content="summary_large_image">"#));
        assert!(html.contains(
            r#"<meta http-equiv="Content-Type" content="text/html; charset=utf-8">"#
        ));
        assert!(html.contains(r#"<link rel="icon" href="/favicon.ico">"#));
        // Query separators are entity-encoded inside the attribute
        assert!(html.contains("description=intro%20post&amp;publishTime="));
    }

    #[test]
    fn test_not_found_meta_is_noindex() {
        let meta = PageMeta::for_not_found(&SiteConfig::default());
        assert_eq!(meta.get("robots"), Some("noindex"));
        assert_eq!(meta.tags.iter().filter(|t| t.key() == "robots").count(), 1);
    }
}

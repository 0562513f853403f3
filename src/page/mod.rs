//! Page renderers - turn loaded data into complete HTML documents

mod meta;

pub use meta::{og_image_url, HeadTag, PageMeta};

use chrono::Datelike;
use tera::Context;

use crate::config::SiteConfig;
use crate::content::PostData;
use crate::error::BuildError;
use crate::helpers::{date_iso, escape_attr, format_publish_date, post_path};
use crate::templates::{PostSummary, SiteData, TemplateRenderer};
use crate::work::{self, HoverThemes, WorkEntry};

/// `Published Jan 1, 2021 • 5 minute read`
pub fn byline(post: &PostData) -> String {
    format!(
        "Published {} • {} minute read",
        format_publish_date(&post.date),
        post.read_time
    )
}

/// Renders every page kind of the site
pub struct PageRenderer {
    renderer: TemplateRenderer,
    config: SiteConfig,
    themes: HoverThemes,
}

impl PageRenderer {
    pub fn new(config: &SiteConfig) -> anyhow::Result<Self> {
        Ok(Self {
            renderer: TemplateRenderer::new()?,
            config: config.clone(),
            themes: HoverThemes::from_config(config),
        })
    }

    /// Blog post page: metadata, title and byline, table of contents, body
    pub fn render_post(&self, post: &PostData) -> Result<String, BuildError> {
        let meta = PageMeta::for_post(&self.config, post);

        let mut context = self.base_context(&meta);
        context.insert("title", &post.title);
        context.insert("byline", &byline(post));
        context.insert("toc", &post.table_of_contents);
        context.insert("content", &post.content_html);

        Ok(self.renderer.render("post.html", &context)?)
    }

    /// Home page: work cards and the post list, in the given order
    pub fn render_home(
        &self,
        entries: &[WorkEntry],
        posts: &[PostData],
    ) -> Result<String, BuildError> {
        let meta = PageMeta::for_home(&self.config);
        let work_html = if entries.is_empty() {
            String::new()
        } else {
            work::render_list(entries, &self.themes)
        };
        let summaries: Vec<PostSummary> = posts
            .iter()
            .map(|post| self.post_summary(post))
            .collect();

        let mut context = self.base_context(&meta);
        context.insert("work", &work_html);
        context.insert("posts", &summaries);

        Ok(self.renderer.render("index.html", &context)?)
    }

    /// Page served for paths that were never generated
    pub fn render_not_found(&self) -> Result<String, BuildError> {
        let meta = PageMeta::for_not_found(&self.config);
        let context = self.base_context(&meta);
        Ok(self.renderer.render("404.html", &context)?)
    }

    fn post_summary(&self, post: &PostData) -> PostSummary {
        PostSummary {
            id: post.id.clone(),
            title: post.title.clone(),
            description: post.description.clone(),
            date: date_iso(&post.date),
            path: escape_attr(&post_path(&self.config, &post.id)),
            read_time: post.read_time.clone(),
        }
    }

    fn base_context(&self, meta: &PageMeta) -> Context {
        let site = SiteData {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            author: self.config.author.clone(),
            url: self.config.url.clone(),
            blog_path: "/#blog".to_string(),
            current_year: chrono::Local::now().year().to_string(),
        };

        let mut context = Context::new();
        context.insert("site", &site);
        context.insert("head", &meta.to_html());
        context
    }
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
    fn test_byline() {
        assert_eq!(
            byline(&hello_world()),
            "Published Jan 1, 2021 • 5 minute read"
        );
    }

    #[test]
    fn test_render_hello_world() {
        let renderer = PageRenderer::new(&SiteConfig::default()).unwrap();
        let html = renderer.render_post(&hello_world()).unwrap();

        assert!(html.contains("<title>krish's blog • Hello World</title>"));
        assert!(html.contains(
            r#"<div class="post-byline">Published Jan 1, 2021 • 5 minute read</div>"#
        ));
        assert!(html.contains(r#"<article class="post-content"><p>Hi</p></article>"#));
        assert!(html.contains("<div><ul></ul></div>"));
        assert!(html.contains(r#"<h1 class="post-title">Hello World</h1>"#));
        assert!(html.contains(
            r#"<meta property="og:url" content="https://krishkrish.com/blog/hello-world">"#
        ));
    }

    #[test]
    fn test_plain_fields_are_escaped_trusted_are_not() {
        let renderer = PageRenderer::new(&SiteConfig::default()).unwrap();
        let mut post = hello_world();
        post.title = "<script>x</script>".to_string();
        post.content_html = TrustedHtml::new("<script>trusted()</script>");
        let html = renderer.render_post(&post).unwrap();

        assert!(!html.contains("<h1 class=\"post-title\"><script>"));
        assert!(html.contains("&lt;script&gt;x&lt;"));
        assert!(html.contains("<script>trusted()</script>"));
    }

    #[test]
    fn test_render_home() {
        let renderer = PageRenderer::new(&SiteConfig::default()).unwrap();
        let entries = vec![WorkEntry {
            logo: "/logos/bell.png".to_string(),
            company: "Bell Canada".to_string(),
            company_website: None,
            position: "Intern".to_string(),
            start_year: 2021,
            end_year: 2021,
            theme_color: None,
            theme_color_hex: None,
        }];
        let html = renderer.render_home(&entries, &[hello_world()]).unwrap();

        assert!(html.contains("--hover-bg:#01549A;--hover-fg:#FFFFFF"));
        assert!(html.contains(r#"<a href="/blog/hello-world/">Hello World</a>"#));
        assert!(html.contains("Jan 1, 2021 • 5 minute read"));
    }

    #[test]
    fn test_footer_shows_current_year() {
        let renderer = PageRenderer::new(&SiteConfig::default()).unwrap();
        let year = chrono::Local::now().year().to_string();
        let footer = format!("&copy; {} Krish</footer>", year);

        assert!(renderer.render_post(&hello_world()).unwrap().contains(&footer));
        assert!(renderer.render_home(&[], &[]).unwrap().contains(&footer));
        assert!(renderer.render_not_found().unwrap().contains(&footer));
    }

    #[test]
    fn test_render_home_without_content() {
        let renderer = PageRenderer::new(&SiteConfig::default()).unwrap();
        let html = renderer.render_home(&[], &[]).unwrap();
        assert!(!html.contains(r#"<div class="work-list">"#));
        assert!(html.contains("Nothing here yet."));
    }

    #[test]
    fn test_render_not_found() {
        let renderer = PageRenderer::new(&SiteConfig::default()).unwrap();
        let html = renderer.render_not_found().unwrap();
        assert!(html.contains(r#"<meta name="robots" content="noindex">"#));
        assert!(html.contains("<h1>404</h1>"));
    }
}

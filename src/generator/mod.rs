//! Generator module - enumerates posts, loads them and writes static HTML

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::content::{static_paths, ContentSource, PostData, StaticPaths};
use crate::error::BuildError;
use crate::helpers::{date_iso, post_path, strip_html};
use crate::page::PageRenderer;
use crate::work::{self, WorkEntry};
use crate::Site;

/// Static site generator
pub struct Generator {
    site: Site,
    pages: PageRenderer,
}

impl Generator {
    /// Create a new generator
    pub fn new(site: &Site) -> Result<Self> {
        Ok(Self {
            site: site.clone(),
            pages: PageRenderer::new(&site.config)?,
        })
    }

    /// Generate the entire site from `source`
    ///
    /// Every post is loaded and every page rendered before anything is
    /// written, so a single failing post aborts the build without leaving
    /// partial output.
    pub fn generate<S: ContentSource + ?Sized>(&self, source: &S) -> Result<()> {
        let paths = static_paths(source).context("Failed to enumerate posts")?;
        tracing::info!("Found {} posts", paths.len());

        let mut posts = paths
            .ids()
            .map(|id| self.load_post(source, &paths, id))
            .collect::<Result<Vec<_>, _>>()?;

        // Newest first
        posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.id.cmp(&b.id)));

        let work_path = self.site.source_dir.join(&self.site.config.work_file);
        let entries = work::load_entries(&work_path)?;
        tracing::info!("Loaded {} work entries", entries.len());

        let outputs = self.render_site(&posts, &entries)?;

        fs::create_dir_all(&self.site.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.site.public_dir))?;

        self.copy_source_assets()?;

        for (relative, content) in &outputs {
            self.write_file(relative, content)?;
        }
        tracing::info!("Generated {} post pages", posts.len());

        Ok(())
    }

    /// Render every output file in memory, keyed by path relative to the
    /// public directory
    ///
    /// Nothing touches the disk here, so a template failure on any page
    /// leaves the public directory as it was.
    pub fn render_site(
        &self,
        posts: &[PostData],
        entries: &[WorkEntry],
    ) -> Result<Vec<(String, String)>> {
        let mut outputs = Vec::with_capacity(posts.len() + 3);

        for post in posts {
            let html = self.pages.render_post(post)?;
            outputs.push((page_file(&post_path(&self.site.config, &post.id)), html));
        }

        outputs.push((page_file("/"), self.pages.render_home(entries, posts)?));
        outputs.push(("404.html".to_string(), self.pages.render_not_found()?));
        outputs.push(("search.json".to_string(), self.search_index(posts)?));

        Ok(outputs)
    }

    /// Load one enumerated post; ids outside `paths` are refused
    pub fn load_post<S: ContentSource + ?Sized>(
        &self,
        source: &S,
        paths: &StaticPaths,
        id: &str,
    ) -> Result<PostData, BuildError> {
        if !paths.fallback && !paths.contains(id) {
            return Err(BuildError::UnknownPost(id.to_string()));
        }
        source.post_data(id).map_err(|e| BuildError::Content {
            id: id.to_string(),
            source: e,
        })
    }

    /// Load and render a single post page
    pub fn render_post<S: ContentSource + ?Sized>(
        &self,
        source: &S,
        paths: &StaticPaths,
        id: &str,
    ) -> Result<String, BuildError> {
        let post = self.load_post(source, paths, id)?;
        self.pages.render_post(&post)
    }

    fn write_file(&self, relative: &str, content: &str) -> Result<()> {
        let output_path = self.site.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }

    /// Search index (JSON) over every post
    fn search_index(&self, posts: &[PostData]) -> Result<String> {
        let search_data: Vec<serde_json::Value> = posts
            .iter()
            .map(|p| {
                serde_json::json!({
                    "id": p.id,
                    "title": p.title,
                    "description": p.description,
                    "url": post_path(&self.site.config, &p.id),
                    "date": date_iso(&p.date),
                    "content": strip_html(p.content_html.as_str()),
                })
            })
            .collect();

        Ok(serde_json::to_string_pretty(&search_data)?)
    }

    /// Copy source assets (images, favicon, etc.) to the public directory
    fn copy_source_assets(&self) -> Result<()> {
        let source_dir = &self.site.source_dir;
        if !source_dir.exists() {
            return Ok(());
        }

        let mut copied = 0;
        for entry in WalkDir::new(source_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(source_dir)?;
            if is_hidden(relative) {
                continue;
            }

            let dest = self.site.public_dir.join(relative);
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            if let Err(e) = fs::copy(path, &dest) {
                tracing::warn!("Failed to copy {:?}: {}", path, e);
                continue;
            }
            copied += 1;
        }

        tracing::debug!("Copied {} assets", copied);
        Ok(())
    }
}

/// `{path}/index.html` for a site path such as `/blog/hello-world/`
fn page_file(path: &str) -> String {
    let clean_path = path.trim_matches('/');
    if clean_path.is_empty() {
        "index.html".to_string()
    } else {
        format!("{}/index.html", clean_path)
    }
}

/// Paths under `_`/`.` prefixed components are not published
fn is_hidden(relative: &Path) -> bool {
    relative.components().any(|c| {
        c.as_os_str()
            .to_str()
            .map(|s| s.starts_with('_') || s.starts_with('.'))
            .unwrap_or(false)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::PostParams;
    use crate::error::ContentError;
    use crate::helpers::TrustedHtml;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    /// In-memory content source
    struct MemorySource {
        posts: BTreeMap<String, PostData>,
    }

    impl MemorySource {
        fn new(posts: Vec<PostData>) -> Self {
            Self {
                posts: posts.into_iter().map(|p| (p.id.clone(), p)).collect(),
            }
        }
    }

    impl ContentSource for MemorySource {
        fn post_ids(&self) -> Result<Vec<PostParams>, ContentError> {
            Ok(self.posts.keys().map(PostParams::new).collect())
        }

        fn post_data(&self, id: &str) -> Result<PostData, ContentError> {
            self.posts
                .get(id)
                .cloned()
                .ok_or_else(|| ContentError::NotFound(id.to_string()))
        }
    }

    /// Enumerates an id it cannot load
    struct BrokenSource;

    impl ContentSource for BrokenSource {
        fn post_ids(&self) -> Result<Vec<PostParams>, ContentError> {
            Ok(vec![PostParams::new("ghost")])
        }

        fn post_data(&self, id: &str) -> Result<PostData, ContentError> {
            Err(ContentError::NotFound(id.to_string()))
        }
    }

    fn post(id: &str, title: &str, ymd: (i32, u32, u32)) -> PostData {
        PostData {
            id: id.to_string(),
            title: title.to_string(),
            date: NaiveDate::from_ymd_opt(ymd.0, ymd.1, ymd.2).unwrap(),
            content_html: TrustedHtml::new("<p>Hi</p>"),
            table_of_contents: TrustedHtml::new("<ul></ul>"),
            read_time: "5".to_string(),
            description: "intro post".to_string(),
        }
    }

    fn test_site() -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        let site = Site::new(dir.path()).unwrap();
        (dir, site)
    }

    #[test]
    fn test_generate_writes_pages() {
        let (_dir, site) = test_site();
        let source = MemorySource::new(vec![
            post("hello-world", "Hello World", (2021, 1, 1)),
            post("later", "Later Post", (2022, 6, 1)),
        ]);

        Generator::new(&site).unwrap().generate(&source).unwrap();

        let page =
            fs::read_to_string(site.public_dir.join("blog/hello-world/index.html")).unwrap();
        assert!(page.contains("<title>krish's blog • Hello World</title>"));
        assert!(page.contains("Published Jan 1, 2021 • 5 minute read"));
        assert!(page.contains("<p>Hi</p>"));

        let home = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        let later = home.find("Later Post").unwrap();
        let hello = home.find(">Hello World<").unwrap();
        assert!(later < hello, "newest post comes first");

        assert!(site.public_dir.join("404.html").exists());

        let search: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(site.public_dir.join("search.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(search[1]["url"], "/blog/hello-world/");
        assert_eq!(search[1]["content"], "Hi");
    }

    #[test]
    fn test_unknown_id_is_refused() {
        let (_dir, site) = test_site();
        let source = MemorySource::new(vec![post("hello-world", "Hello World", (2021, 1, 1))]);
        let paths = static_paths(&source).unwrap();
        assert!(!paths.fallback);

        let generator = Generator::new(&site).unwrap();
        assert!(generator.render_post(&source, &paths, "hello-world").is_ok());
        assert!(matches!(
            generator.render_post(&source, &paths, "not-a-post"),
            Err(BuildError::UnknownPost(id)) if id == "not-a-post"
        ));
    }

    #[test]
    fn test_failed_load_fails_the_build() {
        let (_dir, site) = test_site();
        let err = Generator::new(&site)
            .unwrap()
            .generate(&BrokenSource)
            .unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BuildError>(),
            Some(BuildError::Content { id, .. }) if id == "ghost"
        ));
        assert!(!site.public_dir.join("index.html").exists());
    }

    #[test]
    fn test_render_site_writes_nothing() {
        let (_dir, site) = test_site();
        let posts = vec![
            post("later", "Later Post", (2022, 6, 1)),
            post("hello-world", "Hello World", (2021, 1, 1)),
        ];

        let outputs = Generator::new(&site)
            .unwrap()
            .render_site(&posts, &[])
            .unwrap();

        let files: Vec<&str> = outputs.iter().map(|(path, _)| path.as_str()).collect();
        assert_eq!(
            files,
            vec![
                "blog/later/index.html",
                "blog/hello-world/index.html",
                "index.html",
                "404.html",
                "search.json",
            ]
        );
        assert!(outputs[1].1.contains("<p>Hi</p>"));
        assert!(!site.public_dir.exists());
    }

    #[test]
    fn test_assets_are_copied_except_hidden() {
        let (_dir, site) = test_site();
        fs::create_dir_all(site.source_dir.join("_posts")).unwrap();
        fs::create_dir_all(site.source_dir.join("logos")).unwrap();
        fs::write(site.source_dir.join("favicon.ico"), b"icon").unwrap();
        fs::write(site.source_dir.join("logos/bell.png"), b"png").unwrap();
        fs::write(site.source_dir.join("_posts/draft.txt"), b"x").unwrap();

        Generator::new(&site)
            .unwrap()
            .generate(&MemorySource::new(Vec::new()))
            .unwrap();

        assert!(site.public_dir.join("favicon.ico").exists());
        assert!(site.public_dir.join("logos/bell.png").exists());
        assert!(!site.public_dir.join("_posts").exists());
    }

    #[test]
    fn test_generate_renders_work_entries() {
        let (_dir, site) = test_site();
        let work_path = site.source_dir.join(&site.config.work_file);
        fs::create_dir_all(work_path.parent().unwrap()).unwrap();
        fs::write(
            &work_path,
            "- logo: /logos/rh.png\n  company: Robinhood\n  position: Engineer\n  start_year: 2022\n  end_year: 2023\n",
        )
        .unwrap();

        Generator::new(&site)
            .unwrap()
            .generate(&MemorySource::new(Vec::new()))
            .unwrap();

        let home = fs::read_to_string(site.public_dir.join("index.html")).unwrap();
        assert!(home.contains("--hover-bg:#CCFF00"));
        assert!(home.contains("2022-2023"));
        assert!(!site.public_dir.join("_data").exists());
    }
}

//! Markdown content source - loads posts from `source/_posts`

use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{ContentSource, FrontMatter, MarkdownRenderer, PostData, PostParams};
use crate::config::SiteConfig;
use crate::error::ContentError;
use crate::helpers::TrustedHtml;
use crate::Site;

/// Reads `{id}.md` files and renders them into post data
pub struct MarkdownSource {
    posts_dir: PathBuf,
    renderer: MarkdownRenderer,
    words_per_minute: usize,
    render_drafts: bool,
}

impl MarkdownSource {
    /// Create a source over the site's `_posts` directory
    pub fn new(site: &Site) -> Self {
        Self::from_dir(site.source_dir.join("_posts"), &site.config)
    }

    /// Create a source over an arbitrary posts directory
    pub fn from_dir<P: Into<PathBuf>>(posts_dir: P, config: &SiteConfig) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            renderer: MarkdownRenderer::with_options(&config.highlight_theme, config.toc_depth),
            words_per_minute: config.words_per_minute.max(1),
            render_drafts: config.render_drafts,
        }
    }

    fn post_path(&self, id: &str) -> Option<PathBuf> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return None;
        }
        ["md", "markdown"]
            .iter()
            .map(|ext| self.posts_dir.join(format!("{}.{}", id, ext)))
            .find(|path| path.is_file())
    }

    fn read(&self, path: &Path) -> Result<String, ContentError> {
        fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Whether the file is a draft that should stay unpublished
    fn is_hidden_draft(&self, path: &Path) -> Result<bool, ContentError> {
        if self.render_drafts {
            return Ok(false);
        }
        let content = self.read(path)?;
        // Broken front-matter stays enumerated so the build reports it
        Ok(FrontMatter::parse(&content)
            .map(|(fm, _)| fm.draft)
            .unwrap_or(false))
    }

    /// Estimated minutes to read `words`
    fn estimate_read_time(&self, words: usize) -> usize {
        words.div_ceil(self.words_per_minute).max(1)
    }
}

impl ContentSource for MarkdownSource {
    fn post_ids(&self) -> Result<Vec<PostParams>, ContentError> {
        if !self.posts_dir.exists() {
            return Ok(Vec::new());
        }

        let mut ids = Vec::new();
        for entry in WalkDir::new(&self.posts_dir)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || !is_markdown_file(path) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                tracing::warn!("Skipping post with non UTF-8 name: {:?}", path);
                continue;
            };
            if self.is_hidden_draft(path)? {
                tracing::debug!("Skipping draft: {}", id);
                continue;
            }
            ids.push(PostParams::new(id));
        }

        ids.sort_by(|a, b| a.id.cmp(&b.id));
        ids.dedup();
        Ok(ids)
    }

    fn post_data(&self, id: &str) -> Result<PostData, ContentError> {
        let path = self
            .post_path(id)
            .ok_or_else(|| ContentError::NotFound(id.to_string()))?;
        let content = self.read(&path)?;

        let (fm, body) =
            FrontMatter::parse(&content).map_err(|e| ContentError::FrontMatter {
                path: path.clone(),
                message: e.to_string(),
            })?;

        if fm.draft && !self.render_drafts {
            return Err(ContentError::NotFound(id.to_string()));
        }

        let date = match fm.parse_date() {
            Some(Ok(date)) => date,
            Some(Err(value)) => {
                return Err(ContentError::InvalidDate {
                    id: id.to_string(),
                    value,
                })
            }
            None => {
                // Fall back to the file's modification date
                let modified = fs::metadata(&path)
                    .and_then(|m| m.modified())
                    .map_err(|source| ContentError::Io {
                        path: path.clone(),
                        source,
                    })?;
                chrono::DateTime::<chrono::Local>::from(modified).date_naive()
            }
        };

        let rendered = self.renderer.render(body);
        let read_time = fm
            .read_time()
            .unwrap_or_else(|| self.estimate_read_time(rendered.words).to_string());

        Ok(PostData {
            id: id.to_string(),
            title: fm.title.unwrap_or_else(|| id.to_string()),
            date,
            content_html: TrustedHtml::new(rendered.html),
            table_of_contents: TrustedHtml::new(rendered.toc),
            read_time,
            description: fm.description.unwrap_or_default(),
        })
    }
}

/// Check if a file is a markdown file
fn is_markdown_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e == "md" || e == "markdown")
        .unwrap_or(false)
}

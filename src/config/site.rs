//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    /// Prefix of every blog post's document title
    pub blog_title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    /// Absolute host URL, without trailing slash
    pub url: String,
    pub blog_dir: String,
    /// Path of the preview-image endpoint on `url`
    pub og_endpoint: String,
    pub favicon: String,

    // Directory
    pub source_dir: String,
    pub public_dir: String,
    /// Work entries file, relative to `source_dir`
    pub work_file: String,

    // Writing
    pub words_per_minute: usize,
    pub toc_depth: usize,
    pub render_drafts: bool,
    pub highlight_theme: String,

    /// Extra company hover themes, merged over the built-in table
    pub hover_themes: IndexMap<String, HoverThemeConfig>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Krish".to_string(),
            blog_title: "krish's blog".to_string(),
            description: String::new(),
            author: "Krish".to_string(),
            language: "English".to_string(),

            url: "https://krishkrish.com".to_string(),
            blog_dir: "blog".to_string(),
            og_endpoint: "/api/og".to_string(),
            favicon: "/favicon.ico".to_string(),

            source_dir: "source".to_string(),
            public_dir: "public".to_string(),
            work_file: "_data/work.yml".to_string(),

            words_per_minute: 200,
            toc_depth: 3,
            render_drafts: false,
            highlight_theme: "base16-ocean.dark".to_string(),

            hover_themes: IndexMap::new(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Host part of `url`, e.g. `krishkrish.com`
    pub fn domain(&self) -> &str {
        let without_scheme = self
            .url
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(&self.url);
        without_scheme
            .split('/')
            .next()
            .unwrap_or(without_scheme)
    }
}

/// Hover colours for one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoverThemeConfig {
    pub background: String,
    pub foreground: String,
}

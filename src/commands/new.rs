//! Create a new post

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

use crate::Site;

/// Scaffold a new post under `_posts`; refuses to overwrite
pub fn create_post(site: &Site, title: &str, id: Option<&str>) -> Result<PathBuf> {
    let now = chrono::Local::now();

    let target_dir = site.source_dir.join("_posts");
    fs::create_dir_all(&target_dir)
        .with_context(|| format!("Failed to create {:?}", target_dir))?;

    let id = match id {
        Some(id) => id.to_string(),
        None => slug::slugify(title),
    };
    if id.is_empty() {
        anyhow::bail!("Cannot derive a post id from title {:?}", title);
    }

    let file_path = target_dir.join(format!("{}.md", id));
    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    let title_yaml = serde_yaml::to_string(title)?;
    let content = format!(
        "---\ntitle: {}\ndate: {}\ndescription: \"\"\ndraft: true\n---\n\n## Introduction\n",
        title_yaml.trim_end(),
        now.format("%Y-%m-%d")
    );

    fs::write(&file_path, content)
        .with_context(|| format!("Failed to write {:?}", file_path))?;

    tracing::info!("Created: {:?}", file_path);
    Ok(file_path)
}

//! List site content

use anyhow::{Context, Result};

use crate::content::{ContentSource, MarkdownSource};
use crate::helpers::date_iso;
use crate::work::{self, year_range};
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    match content_type {
        "post" | "posts" => {
            let source = MarkdownSource::new(site);
            let ids = source.post_ids()?;
            let mut posts = ids
                .iter()
                .map(|p| {
                    source
                        .post_data(&p.id)
                        .with_context(|| format!("Failed to load post {:?}", p.id))
                })
                .collect::<Result<Vec<_>>>()?;
            posts.sort_by(|a, b| b.date.cmp(&a.date));

            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}] {} min",
                    date_iso(&post.date),
                    post.title,
                    post.id,
                    post.read_time
                );
            }
        }
        "work" => {
            let entries = work::load_entries(&site.source_dir.join(&site.config.work_file))?;
            println!("Work ({}):", entries.len());
            for entry in entries {
                println!(
                    "  {} - {} at {}",
                    year_range(entry.start_year, entry.end_year),
                    entry.position,
                    entry.company
                );
            }
        }
        _ => {
            anyhow::bail!("Unknown type: {}. Available: post, work", content_type);
        }
    }

    Ok(())
}

//! Generate static files

use anyhow::{Context, Result};
use notify_debouncer_mini::notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebouncedEvent};
use std::path::Path;
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

use crate::content::MarkdownSource;
use crate::generator::Generator;
use crate::Site;

/// Generate the static site from the markdown sources
pub fn run(site: &Site) -> Result<()> {
    let start = Instant::now();

    let source = MarkdownSource::new(site);
    let generator = Generator::new(site)?;
    generator.generate(&source)?;

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}

/// Block until the sources change, calling `on_change` after each debounced
/// batch of relevant events. Returns when the watcher channel closes.
pub fn watch_changes<F>(site: &Site, mut on_change: F) -> Result<()>
where
    F: FnMut(&[DebouncedEvent]),
{
    let (tx, rx) = channel();

    // Debounce to avoid multiple rapid rebuilds
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if site.source_dir.exists() {
        debouncer
            .watcher()
            .watch(&site.source_dir, RecursiveMode::Recursive)
            .with_context(|| format!("Failed to watch {:?}", site.source_dir))?;
        tracing::debug!("Watching: {:?}", site.source_dir);
    }

    let config_path = site.config_path();
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant: Vec<_> = events
                    .into_iter()
                    .filter(|e| is_relevant(&e.path))
                    .collect();
                if !relevant.is_empty() {
                    on_change(&relevant);
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(_) => break,
        }
    }

    Ok(())
}

/// Watch for file changes and regenerate
pub fn watch(site: &Site) -> Result<()> {
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    watch_changes(site, |events| {
        for event in events {
            tracing::info!("File changed: {}", event.path.display());
        }
        // Reload config too; it may be one of the changed files
        let result = Site::new(&site.base_dir).and_then(|fresh| run(&fresh));
        if let Err(e) = result {
            tracing::error!("Generation failed: {:#}", e);
        }
    })
}

/// Editor swap files and VCS metadata do not trigger rebuilds
fn is_relevant(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    !path_str.contains(".git")
        && !path_str.contains(".DS_Store")
        && !path_str.ends_with('~')
        && !path_str.ends_with(".swp")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_run_generates_from_markdown() {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(
            posts_dir.join("hello-world.md"),
            "---\ntitle: Hello World\ndate: 2021-01-01\ndescription: intro post\nreadTime: 5\n---\n\nHi\n",
        )
        .unwrap();

        let site = Site::new(dir.path()).unwrap();
        run(&site).unwrap();

        let page =
            fs::read_to_string(site.public_dir.join("blog/hello-world/index.html")).unwrap();
        assert!(page.contains("<title>krish's blog • Hello World</title>"));
        assert!(page.contains("Published Jan 1, 2021 • 5 minute read"));
        assert!(page.contains("<p>Hi</p>"));
    }

    #[test]
    fn test_run_fails_on_broken_post() {
        let dir = TempDir::new().unwrap();
        let posts_dir = dir.path().join("source/_posts");
        fs::create_dir_all(&posts_dir).unwrap();
        fs::write(posts_dir.join("bad.md"), "---\ndate: someday\n---\n").unwrap();

        let site = Site::new(dir.path()).unwrap();
        let err = run(&site).unwrap_err();
        assert!(format!("{:#}", err).contains("bad"));
    }

    #[test]
    fn test_is_relevant() {
        assert!(is_relevant(Path::new("/site/source/_posts/a.md")));
        assert!(!is_relevant(Path::new("/site/.git/index")));
        assert!(!is_relevant(Path::new("/site/source/_posts/a.md~")));
    }
}

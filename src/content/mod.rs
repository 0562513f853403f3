//! Content module - post models, the content-source seam and the markdown pipeline

mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use frontmatter::FrontMatter;
pub use loader::MarkdownSource;
pub use markdown::{Heading, MarkdownRenderer, Rendered};
pub use post::{static_paths, ContentSource, PostData, PostParams, StaticPaths};

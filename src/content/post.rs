//! Post models and the content-source capability

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ContentError;
use crate::helpers::TrustedHtml;

/// A blog post, as handed to the page renderer
#[derive(Debug, Clone, Serialize)]
pub struct PostData {
    /// URL identifier, e.g. `hello-world`
    pub id: String,

    pub title: String,

    /// Publication date
    pub date: NaiveDate,

    /// Rendered article body
    pub content_html: TrustedHtml,

    /// Rendered table of contents
    pub table_of_contents: TrustedHtml,

    /// Estimated reading time in minutes
    pub read_time: String,

    pub description: String,
}

/// Route parameters of one pre-rendered post page
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PostParams {
    pub id: String,
}

impl PostParams {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// The complete set of post pages known at build time
#[derive(Debug, Clone, Default)]
pub struct StaticPaths {
    pub paths: Vec<PostParams>,
    /// Always false: unknown ids are not rendered on demand
    pub fallback: bool,
}

impl StaticPaths {
    /// Whether `id` was enumerated
    pub fn contains(&self, id: &str) -> bool {
        self.paths.iter().any(|p| p.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|p| p.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Where posts come from.
///
/// The page renderer only ever talks to posts through this trait, so the
/// markdown pipeline can be swapped out or mocked.
pub trait ContentSource {
    /// Every valid post id
    fn post_ids(&self) -> Result<Vec<PostParams>, ContentError>;

    /// Load one post; `ContentError::NotFound` for unknown ids
    fn post_data(&self, id: &str) -> Result<PostData, ContentError>;
}

/// Enumerate static paths with fallback disabled
pub fn static_paths<S: ContentSource + ?Sized>(source: &S) -> Result<StaticPaths, ContentError> {
    Ok(StaticPaths {
        paths: source.post_ids()?,
        fallback: false,
    })
}

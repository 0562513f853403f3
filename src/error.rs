//! Error types at the content and build seams

use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by a content source
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Post not found: {0}")]
    NotFound(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid front-matter in {path:?}: {message}")]
    FrontMatter { path: PathBuf, message: String },

    #[error("Invalid date {value:?} in post {id}")]
    InvalidDate { id: String, value: String },
}

/// Failures that abort a site build
#[derive(Error, Debug)]
pub enum BuildError {
    /// The id was never enumerated; there is no fallback rendering path
    #[error("Unknown post {0:?}: not in the enumerated static paths")]
    UnknownPost(String),

    #[error("Failed to load post {id:?}")]
    Content {
        id: String,
        #[source]
        source: ContentError,
    },

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),
}

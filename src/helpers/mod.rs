//! Helper functions shared by the renderers
//!
//! URL building, date formatting and HTML escaping. Renderers call these
//! directly instead of going through the template engine.

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;

//! Configuration module

mod site;

pub use site::HoverThemeConfig;
pub use site::SiteConfig;

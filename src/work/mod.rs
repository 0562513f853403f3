//! Work-experience cards
//!
//! Each entry renders as one row: logo, company, position and a year range.
//! A handful of companies get their own hover colours, looked up by exact
//! company name.

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::{HoverThemeConfig, SiteConfig};
use crate::helpers::{escape_attr, html_escape, image_tag, link_to};

/// One position held at one company
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkEntry {
    /// Logo path or URL
    #[serde(alias = "logoSrc")]
    pub logo: String,
    pub company: String,
    #[serde(default, alias = "companyWebsite")]
    pub company_website: Option<String>,
    pub position: String,
    #[serde(alias = "startYear")]
    pub start_year: i32,
    #[serde(alias = "endYear")]
    pub end_year: i32,
    #[serde(default, alias = "themeColor")]
    pub theme_color: Option<[u8; 3]>,
    #[serde(default, alias = "themeColorHex")]
    pub theme_color_hex: Option<String>,
}

impl WorkEntry {
    /// Accent colour, preferring the hex string over the RGB triple
    pub fn accent_color(&self) -> Option<String> {
        self.theme_color_hex
            .as_ref()
            .filter(|hex| !hex.trim().is_empty())
            .map(|hex| {
                let hex = hex.trim();
                if hex.starts_with('#') {
                    hex.to_string()
                } else {
                    format!("#{}", hex)
                }
            })
            .or_else(|| {
                self.theme_color
                    .map(|[r, g, b]| format!("#{:02X}{:02X}{:02X}", r, g, b))
            })
    }
}

/// Background and text colour applied while a card is hovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverTheme {
    pub background: String,
    pub foreground: String,
}

impl HoverTheme {
    pub fn new(background: &str, foreground: &str) -> Self {
        Self {
            background: background.to_string(),
            foreground: foreground.to_string(),
        }
    }
}

impl From<&HoverThemeConfig> for HoverTheme {
    fn from(config: &HoverThemeConfig) -> Self {
        Self::new(&config.background, &config.foreground)
    }
}

/// Built-in company hover colours
const BUILTIN_HOVER_THEMES: &[(&str, &str, &str)] = &[
    ("McMaster University", "#FFFFFF", "#000000"),
    ("Hitachi Rail", "#FFFFFF", "#000000"),
    ("Robinhood", "#CCFF00", "#000000"),
    ("Bell Canada", "#01549A", "#FFFFFF"),
];

/// Company name to hover theme, matched exactly
#[derive(Debug, Clone)]
pub struct HoverThemes {
    themes: IndexMap<String, HoverTheme>,
}

impl HoverThemes {
    /// The built-in table
    pub fn builtin() -> Self {
        let themes = BUILTIN_HOVER_THEMES
            .iter()
            .map(|(company, bg, fg)| (company.to_string(), HoverTheme::new(bg, fg)))
            .collect();
        Self { themes }
    }

    /// The built-in table with `hover_themes` from the config merged over it
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut themes = Self::builtin();
        for (company, theme) in &config.hover_themes {
            themes.insert(company, theme.into());
        }
        themes
    }

    pub fn insert(&mut self, company: &str, theme: HoverTheme) {
        self.themes.insert(company.to_string(), theme);
    }

    /// Theme for `company`; `None` means no special hover styling
    pub fn get(&self, company: &str) -> Option<&HoverTheme> {
        self.themes.get(company)
    }
}

impl Default for HoverThemes {
    fn default() -> Self {
        Self::builtin()
    }
}

/// `2019` when both years match, `2019-2021` otherwise
pub fn year_range(start_year: i32, end_year: i32) -> String {
    if start_year == end_year {
        start_year.to_string()
    } else {
        format!("{}-{}", start_year, end_year)
    }
}

/// Inline style carrying the card's optional colour rules
fn card_style(entry: &WorkEntry, hover: Option<&HoverTheme>) -> Option<String> {
    let mut rules = Vec::new();
    if let Some(theme) = hover {
        rules.push(format!("--hover-bg:{}", theme.background));
        rules.push(format!("--hover-fg:{}", theme.foreground));
    }
    if let Some(accent) = entry.accent_color() {
        rules.push(format!("--theme-color:{}", accent));
    }

    if rules.is_empty() {
        None
    } else {
        Some(rules.join(";"))
    }
}

/// Render a single work card
pub fn render_card(entry: &WorkEntry, themes: &HoverThemes) -> String {
    let hover = themes.get(&entry.company);

    let class = if hover.is_some() {
        "work-item work-item-themed"
    } else {
        "work-item"
    };
    let style_attr = card_style(entry, hover)
        .map(|style| format!(r#" style="{}""#, escape_attr(&style)))
        .unwrap_or_default();

    let company = match entry.company_website.as_deref() {
        Some(website) if !website.trim().is_empty() => link_to(website, &entry.company),
        _ => html_escape(&entry.company),
    };

    let mut html = format!(r#"<div class="{}"{}>"#, class, style_attr);
    html.push_str(r#"<div class="work-item-main">"#);
    html.push_str(&format!(
        r#"<div class="work-logo">{}</div>"#,
        image_tag(
            &entry.logo,
            &format!("{} logo", entry.company),
            Some("work-logo-image")
        )
    ));
    html.push_str(&format!(
        r#"<div><h3 class="work-company">{}</h3><p class="work-position">{}</p></div>"#,
        company,
        html_escape(&entry.position)
    ));
    html.push_str("</div>");
    html.push_str(&format!(
        r#"<div class="work-years">{}</div>"#,
        year_range(entry.start_year, entry.end_year)
    ));
    html.push_str("</div>");
    html
}

/// Render all cards in order
pub fn render_list(entries: &[WorkEntry], themes: &HoverThemes) -> String {
    let mut html = r#"<div class="work-list">"#.to_string();
    for entry in entries {
        html.push_str(&render_card(entry, themes));
    }
    html.push_str("</div>");
    html
}

/// Load work entries from a YAML list; a missing file means no entries
pub fn load_entries(path: &Path) -> Result<Vec<WorkEntry>> {
    if !path.exists() {
        tracing::debug!("No work file at {:?}", path);
        return Ok(Vec::new());
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
    let entries: Vec<WorkEntry> = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse work entries in {:?}", path))?;
    Ok(entries)
}

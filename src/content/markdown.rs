//! Markdown rendering with syntax highlighting and a table of contents

use lazy_static::lazy_static;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use regex::Regex;
use std::collections::HashMap;
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::{escape_attr, html_escape};

lazy_static! {
    static ref WORD: Regex = Regex::new(r"[\p{L}\p{N}']+").unwrap();
}

/// One heading that made it into the table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    pub level: usize,
    pub id: String,
    pub text: String,
}

/// Output of a markdown render
#[derive(Debug, Clone, Default)]
pub struct Rendered {
    pub html: String,
    pub toc: String,
    pub headings: Vec<Heading>,
    /// Prose word count, code blocks excluded
    pub words: usize,
}

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    toc_depth: usize,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", 3)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, toc_depth: usize) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            toc_depth,
        }
    }

    /// Render markdown to HTML, collecting headings for the table of contents
    pub fn render(&self, markdown: &str) -> Rendered {
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_SMART_PUNCTUATION
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut headings = Vec::new();
        let mut used_ids: HashMap<String, usize> = HashMap::new();
        let mut words = 0;

        let mut code_block: Option<Option<String>> = None;
        let mut code_block_content = String::new();
        // (event index, level, text so far) of the heading being read
        let mut open_heading: Option<(usize, usize, String)> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(lang) if !lang.is_empty() => Some(lang.to_string()),
                        _ => None,
                    };
                    code_block = Some(lang);
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let lang = code_block.take().flatten();
                    let highlighted = self.highlight_code(&code_block_content, lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                }
                Event::Text(text) if code_block.is_some() => {
                    code_block_content.push_str(&text);
                }
                Event::Start(Tag::Heading { level, .. }) => {
                    open_heading = Some((events.len(), level as usize, String::new()));
                    events.push(event);
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((index, level, text)) = open_heading.take() {
                        let heading = self.assign_heading_id(
                            &mut events[index],
                            level,
                            text.trim(),
                            &mut used_ids,
                        );
                        if (2..=self.toc_depth).contains(&level) {
                            headings.push(heading);
                        }
                    }
                    events.push(event);
                }
                Event::Text(ref text) | Event::Code(ref text) => {
                    words += WORD.find_iter(text).count();
                    if let Some((_, _, heading_text)) = open_heading.as_mut() {
                        heading_text.push_str(text);
                    }
                    events.push(event);
                }
                _ => events.push(event),
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Rendered {
            html: html_output,
            toc: toc_html(&headings),
            headings,
            words,
        }
    }

    /// Give the heading start event a stable, unique id
    fn assign_heading_id(
        &self,
        event: &mut Event,
        level: usize,
        text: &str,
        used_ids: &mut HashMap<String, usize>,
    ) -> Heading {
        let Event::Start(Tag::Heading {
            level: heading_level,
            id,
            classes,
            attrs,
        }) = event
        else {
            unreachable!("heading index always points at a heading start");
        };

        let id = match id {
            Some(explicit) => explicit.to_string(),
            None => {
                let base = match slug::slugify(text) {
                    s if s.is_empty() => "section".to_string(),
                    s => s,
                };
                let count = used_ids.entry(base.clone()).or_insert(0);
                let unique = if *count == 0 {
                    base
                } else {
                    format!("{}-{}", base, count)
                };
                *count += 1;
                unique
            }
        };

        *event = Event::Start(Tag::Heading {
            level: *heading_level,
            id: Some(CowStr::from(id.clone())),
            classes: std::mem::take(classes),
            attrs: std::mem::take(attrs),
        });

        Heading {
            level,
            id,
            text: text.to_string(),
        }
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(html) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                escape_attr(lang),
                html
            ),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_attr(lang),
                html_escape(code)
            ),
        }
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the table of contents list for the collected headings
fn toc_html(headings: &[Heading]) -> String {
    let mut html = r#"<ul class="toc">"#.to_string();
    for heading in headings {
        html.push_str(&format!(
            r##"<li class="toc-item toc-level-{}"><a class="toc-link" href="#{}">{}</a></li>"##,
            heading.level,
            escape_attr(&heading.id),
            html_escape(&heading.text)
        ));
    }
    html.push_str("</ul>");
    html
}

//! Markdown to HTML rendering for post bodies.

pub mod highlight;

#[cfg(test)]
mod test_integration;

use crate::slug::slugify;
use pulldown_cmark::{html, CowStr, Event, Options, Parser, Tag, TagEnd};
use std::collections::{HashMap, HashSet};
use thiserror::Error;

pub use highlight::{highlight_css, HighlightTransformer, Highlighter, SyntectHighlighter};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to write HTML: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Converts a post's markdown body into HTML.
///
/// Content is author-controlled, so embedded raw HTML is passed through
/// untouched.
pub trait MarkdownRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError>;
}

/// pulldown-cmark renderer with best-effort code highlighting
pub struct CmarkRenderer<H: Highlighter = SyntectHighlighter> {
    options: Options,
    highlighter: H,
}

impl CmarkRenderer<SyntectHighlighter> {
    pub fn new() -> Self {
        Self::with_highlighter(SyntectHighlighter::new())
    }
}

impl<H: Highlighter> CmarkRenderer<H> {
    pub fn with_highlighter(highlighter: H) -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_FOOTNOTES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);
        options.insert(Options::ENABLE_HEADING_ATTRIBUTES);

        Self {
            options,
            highlighter,
        }
    }
}

impl Default for CmarkRenderer<SyntectHighlighter> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: Highlighter> MarkdownRenderer for CmarkRenderer<H> {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();

        let events = attach_heading_ids(events);
        let events = HighlightTransformer::new(&self.highlighter).transform(events);

        let mut html_output = String::with_capacity(markdown.len() * 3 / 2);
        html::write_html_fmt(&mut html_output, events.into_iter())?;
        Ok(html_output)
    }
}

/// Give every heading without an explicit `{#id}` a unique id from its text
fn attach_heading_ids(events: Vec<Event<'_>>) -> Vec<Event<'_>> {
    let ids = heading_ids(&events);
    let mut ids = ids.into_iter();

    events
        .into_iter()
        .map(|event| match event {
            Event::Start(Tag::Heading {
                level,
                id: None,
                classes,
                attrs,
            }) => Event::Start(Tag::Heading {
                level,
                id: ids
                    .next()
                    .flatten()
                    .map(|id| CowStr::Boxed(id.into_boxed_str())),
                classes,
                attrs,
            }),
            Event::Start(Tag::Heading { .. }) => {
                ids.next();
                event
            }
            other => other,
        })
        .collect()
}

/// One entry per heading, `None` for headings that already carry an id.
///
/// Generated ids never repeat an explicit id or each other.
fn heading_ids(events: &[Event]) -> Vec<Option<String>> {
    let mut taken: HashSet<String> = events
        .iter()
        .filter_map(|event| match event {
            Event::Start(Tag::Heading { id: Some(id), .. }) => Some(id.to_string()),
            _ => None,
        })
        .collect();
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut ids = Vec::new();
    let mut current: Option<String> = None;
    let mut explicit = false;

    for event in events {
        match event {
            Event::Start(Tag::Heading { id, .. }) => {
                explicit = id.is_some();
                current = Some(String::new());
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some(title) = current.as_mut() {
                    title.push_str(text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                let title = current.take().unwrap_or_default();
                if explicit {
                    ids.push(None);
                    continue;
                }
                let base = match slugify(&title) {
                    s if s.is_empty() => "section".to_string(),
                    s => s,
                };
                let count = seen.entry(base.clone()).or_insert(0);
                let id = loop {
                    let candidate = if *count == 0 {
                        base.clone()
                    } else {
                        format!("{base}-{count}")
                    };
                    *count += 1;
                    if taken.insert(candidate.clone()) {
                        break candidate;
                    }
                };
                ids.push(Some(id));
            }
            _ => {}
        }
    }

    ids
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_markdown() {
        let html = CmarkRenderer::new()
            .render("# Hello World\n\nThis is a **test**.")
            .unwrap();
        assert!(html.contains("<h1 id=\"hello-world\">Hello World</h1>"));
        assert!(html.contains("<strong>test</strong>"));
    }

    #[test]
    fn test_tables() {
        let md = r#"
| Header 1 | Header 2 |
|----------|----------|
| Cell 1   | Cell 2   |
"#;
        let html = CmarkRenderer::new().render(md).unwrap();
        assert!(html.contains("<table>"));
        assert!(html.contains("<th>Header 1</th>"));
    }

    #[test]
    fn test_raw_html_passes_through() {
        let md = "<div class=\"callout\">Note</div>\n\nText with <kbd>Ctrl</kbd>.";
        let html = CmarkRenderer::new().render(md).unwrap();
        assert!(html.contains("<div class=\"callout\">Note</div>"));
        assert!(html.contains("<kbd>Ctrl</kbd>"));
    }

    #[test]
    fn test_duplicate_headings_get_unique_ids() {
        let html = CmarkRenderer::new()
            .render("## 설치\n\n## 설치\n\n## Usage {#custom}\n")
            .unwrap();
        assert!(html.contains("<h2 id=\"설치\">"));
        assert!(html.contains("<h2 id=\"설치-1\">"));
        assert!(html.contains("<h2 id=\"custom\">"));
    }

    #[test]
    fn test_generated_ids_skip_explicit_ids() {
        let html = CmarkRenderer::new()
            .render("## A\n\n## Setup {#a}\n\n## A\n")
            .unwrap();
        assert_eq!(html.matches("id=\"a\"").count(), 1);
        assert!(html.contains("<h2 id=\"a\">Setup</h2>"));
        assert!(html.contains("<h2 id=\"a-1\">A</h2>"));
        assert!(html.contains("<h2 id=\"a-2\">A</h2>"));
    }

    #[test]
    fn test_highlighted_block_has_copy_button() {
        let html = CmarkRenderer::new()
            .render("```rust\nfn main() {}\n```")
            .unwrap();
        assert!(html.contains("<pre class=\"language-rust\"><code class=\"language-rust\">"));
        assert!(html.contains("onclick=\"copyCode(this)\""));
    }

    #[test]
    fn test_unknown_language_renders_escaped() {
        let html = CmarkRenderer::new()
            .render("```klingon\n<qapla'> & more\n```")
            .unwrap();
        assert!(html.contains(
            "<pre><code class=\"language-klingon\">&lt;qapla&#39;&gt; &amp; more\n</code></pre>"
        ));
        assert!(!html.contains("copy-button"));
        assert!(!html.contains("<span class="));
    }

    #[test]
    fn test_untagged_block_is_plain() {
        let html = CmarkRenderer::new().render("```\nplain <b>\n```").unwrap();
        assert!(html.contains("<pre><code>plain &lt;b&gt;\n</code></pre>"));
    }
}

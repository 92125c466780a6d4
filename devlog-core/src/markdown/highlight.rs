//! Code syntax highlighting using syntect.

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use std::sync::OnceLock;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::{css_for_theme_with_class_style, ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();

const CLASS_STYLE: ClassStyle = ClassStyle::Spaced;
const DEFAULT_THEME: &str = "InspiredGitHub";

fn syntax_set() -> &'static SyntaxSet {
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// Turns source code into highlighted inner HTML for one language.
///
/// Returns `None` when the language is unknown or highlighting fails; callers
/// fall back to plain escaped code.
pub trait Highlighter {
    fn highlight(&self, code: &str, lang: &str) -> Option<String>;
}

/// Class-based highlighter over syntect's bundled grammars
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntectHighlighter;

impl SyntectHighlighter {
    pub fn new() -> Self {
        Self
    }

    pub fn supports(&self, lang: &str) -> bool {
        let ss = syntax_set();
        ss.find_syntax_by_token(lang).is_some()
    }
}

impl Highlighter for SyntectHighlighter {
    fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        let ss = syntax_set();
        let syntax = match ss.find_syntax_by_token(lang) {
            Some(syntax) => syntax,
            None => {
                tracing::debug!("No grammar for language '{}'", lang);
                return None;
            }
        };

        let mut generator = ClassedHTMLGenerator::new_with_class_style(syntax, ss, CLASS_STYLE);
        for line in LinesWithEndings::from(code) {
            if let Err(err) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::warn!("Failed to highlight {} code: {}", lang, err);
                return None;
            }
        }
        Some(generator.finalize())
    }
}

/// Stylesheet for the classes emitted by [`SyntectHighlighter`]
pub fn highlight_css() -> String {
    let themes = theme_set();
    let theme: Option<&Theme> = themes
        .themes
        .get(DEFAULT_THEME)
        .or_else(|| themes.themes.values().next());

    match theme.map(|t| css_for_theme_with_class_style(t, CLASS_STYLE)) {
        Some(Ok(css)) => css,
        Some(Err(err)) => {
            tracing::warn!("Failed to generate highlight CSS: {}", err);
            String::new()
        }
        None => String::new(),
    }
}

/// Rewrites fenced code blocks into highlighted HTML blocks
pub struct HighlightTransformer<'h, H: Highlighter + ?Sized> {
    highlighter: &'h H,
}

impl<'h, H: Highlighter + ?Sized> HighlightTransformer<'h, H> {
    pub fn new(highlighter: &'h H) -> Self {
        Self { highlighter }
    }

    /// Transform events, replacing every language-tagged fenced block
    pub fn transform<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut result = Vec::with_capacity(events.len());
        let mut code_lang: Option<String> = None;
        let mut code_content = String::new();

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(info)))
                    if fence_language(&info).is_some() =>
                {
                    code_lang = fence_language(&info).map(str::to_string);
                    code_content.clear();
                }
                Event::Text(text) if code_lang.is_some() => {
                    code_content.push_str(&text);
                }
                Event::End(TagEnd::CodeBlock) if code_lang.is_some() => {
                    let lang = code_lang.take().unwrap_or_default();
                    let block = self.render_block(&code_content, &lang);
                    result.push(Event::Html(CowStr::Boxed(block.into_boxed_str())));
                }
                other => result.push(other),
            }
        }

        result
    }

    fn render_block(&self, code: &str, lang: &str) -> String {
        let lang_attr = html_escape(lang);
        match self.highlighter.highlight(code, lang) {
            Some(highlighted) => format!(
                "<pre class=\"language-{lang_attr}\"><code class=\"language-{lang_attr}\">{highlighted}</code>\
                 <button class=\"copy-button\" type=\"button\" onclick=\"copyCode(this)\">Copy</button></pre>\n"
            ),
            None => format!(
                "<pre><code class=\"language-{lang_attr}\">{}</code></pre>\n",
                html_escape(code)
            ),
        }
    }
}

/// First word of a fence info string (```rust,ignore → "rust")
fn fence_language(info: &str) -> Option<&str> {
    info.split(|c: char| c.is_whitespace() || c == ',' || c == '{')
        .next()
        .filter(|lang| !lang.is_empty())
}

pub(crate) fn html_escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

//! Integration tests for markdown rendering

use super::*;

struct Uppercase;

impl Highlighter for Uppercase {
    fn highlight(&self, code: &str, lang: &str) -> Option<String> {
        (lang == "shout").then(|| code.to_uppercase())
    }
}

#[test]
fn test_paragraph_snapshot() {
    let html = CmarkRenderer::new().render("Hello *world*").unwrap();
    insta::assert_snapshot!(html, @"<p>Hello <em>world</em></p>");
}

#[test]
fn test_swapped_highlighter_is_used() {
    let renderer = CmarkRenderer::with_highlighter(Uppercase);
    let html = renderer
        .render("```shout\nhello\n```\n\n```whisper\nquiet\n```")
        .unwrap();

    assert!(html.contains("<code class=\"language-shout\">HELLO\n</code>"));
    assert!(html.contains("<pre><code class=\"language-whisper\">quiet\n</code></pre>"));
}

#[test]
fn test_mixed_document() {
    let markdown = r#"# 리액트 훅

Intro with `inline code` and a [link](https://example.com).

```javascript
const add = (a, b) => a + b;
```

- [x] done
- [ ] todo

Footnote ref[^1].

[^1]: The note.
"#;

    let html = CmarkRenderer::new().render(markdown).unwrap();

    assert!(html.contains("<h1 id=\"리액트-훅\">"));
    assert!(html.contains("<code>inline code</code>"));
    assert!(html.contains("<a href=\"https://example.com\">link</a>"));
    assert!(html.contains("class=\"language-javascript\""));
    assert!(html.contains("type=\"checkbox\""));
    assert!(html.contains("footnote-definition"));
}

#[test]
fn test_empty_document() {
    assert_eq!(CmarkRenderer::new().render("").unwrap(), "");
}

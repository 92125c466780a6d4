//! Front-matter parsing from markdown files.

use crate::models::Frontmatter;
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FrontmatterError {
    #[error("Invalid YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Missing front-matter block")]
    Missing,
}

const REQUIRED_FIELDS: [&str; 5] = ["title", "excerpt", "date", "author", "category"];

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX.get_or_init(|| {
        Regex::new(r"(?s)^\u{feff}?---[ \t]*\r?\n(.*?)\r?\n---[ \t]*(?:\r?\n(.*))?$")
            .expect("front-matter pattern is valid")
    })
}

/// Parse front-matter from markdown content
///
/// Returns a tuple of (frontmatter, markdown_body). Every post needs a
/// front-matter block with `title`, `excerpt`, `date`, `author` and
/// `category`; `tags` and `featured` are optional.
///
/// # Example
///
/// ```
/// use devlog_core::frontmatter::parse_frontmatter;
///
/// let content = "---\ntitle: My Post\nexcerpt: Short\ndate: 2025-01-01\nauthor: Kim\ncategory: AI\n---\n# Hello World\n";
///
/// let (fm, body) = parse_frontmatter(content).unwrap();
/// assert_eq!(fm.title, "My Post");
/// assert_eq!(fm.date, "2025-01-01");
/// assert!(fm.tags.is_empty());
/// assert!(body.trim().starts_with("# Hello World"));
/// ```
pub fn parse_frontmatter(content: &str) -> Result<(Frontmatter, String), FrontmatterError> {
    let captures = frontmatter_regex()
        .captures(content)
        .ok_or(FrontmatterError::Missing)?;

    let yaml = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2).map_or("", |m| m.as_str());

    let frontmatter: Frontmatter = serde_yaml::from_str(yaml).map_err(|e| {
        let err_msg = e.to_string();
        match REQUIRED_FIELDS
            .iter()
            .find(|field| err_msg.contains(&format!("missing field `{field}`")))
        {
            Some(field) => FrontmatterError::MissingField((*field).to_string()),
            None => FrontmatterError::YamlError(e),
        }
    })?;

    // Present but blank counts as missing
    for (field, value) in [
        ("title", &frontmatter.title),
        ("excerpt", &frontmatter.excerpt),
        ("date", &frontmatter.date),
        ("author", &frontmatter.author),
        ("category", &frontmatter.category),
    ] {
        if value.trim().is_empty() {
            return Err(FrontmatterError::MissingField(field.to_string()));
        }
    }

    Ok((frontmatter, body.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_frontmatter() {
        let content = r#"---
title: 리액트 성능 최적화
excerpt: 렌더링 비용 줄이기
date: 2024-03-15
author: Kim
category: 웹 개발
tags: [React, 성능]
featured: true
---

# Hello World

This is the content."#;

        let (fm, body) = parse_frontmatter(content).unwrap();
        assert_eq!(fm.title, "리액트 성능 최적화");
        assert_eq!(fm.date, "2024-03-15");
        assert_eq!(fm.category, "웹 개발");
        assert_eq!(fm.tags, vec!["React", "성능"]);
        assert!(fm.featured);
        assert!(body.contains("# Hello World"));
        assert!(body.contains("This is the content."));
    }

    #[test]
    fn test_optional_fields_default() {
        let content = "---\ntitle: T\nexcerpt: E\ndate: 2024-01-01\nauthor: A\ncategory: C\n---\nBody";
        let (fm, body) = parse_frontmatter(content).unwrap();
        assert!(fm.tags.is_empty());
        assert!(!fm.featured);
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_empty_body() {
        let content = "---\ntitle: T\nexcerpt: E\ndate: 2024-01-01\nauthor: A\ncategory: C\n---";
        let (_, body) = parse_frontmatter(content).unwrap();
        assert_eq!(body, "");
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just Content\n\nNo front-matter here.";
        assert!(matches!(
            parse_frontmatter(content),
            Err(FrontmatterError::Missing)
        ));
    }

    #[test]
    fn test_invalid_yaml() {
        let content = r#"---
title: Test
invalid yaml: [unclosed
---

Content."#;

        assert!(matches!(
            parse_frontmatter(content),
            Err(FrontmatterError::YamlError(_))
        ));
    }

    #[test]
    fn test_missing_category() {
        let content = r#"---
title: No category
excerpt: E
date: 2024-01-01
author: A
---

Content."#;

        match parse_frontmatter(content) {
            Err(FrontmatterError::MissingField(field)) => assert_eq!(field, "category"),
            other => panic!("Expected MissingField error, got {other:?}"),
        }
    }

    #[test]
    fn test_blank_title_is_missing() {
        let content = "---\ntitle: \"  \"\nexcerpt: E\ndate: 2024-01-01\nauthor: A\ncategory: C\n---\n";
        match parse_frontmatter(content) {
            Err(FrontmatterError::MissingField(field)) => assert_eq!(field, "title"),
            other => panic!("Expected MissingField error, got {other:?}"),
        }
    }

    #[test]
    fn test_every_required_field_rejects_blank() {
        let valid = [
            ("title", "T"),
            ("excerpt", "E"),
            ("date", "2024-01-01"),
            ("author", "A"),
            ("category", "C"),
        ];
        for blank in REQUIRED_FIELDS {
            let yaml: String = valid
                .iter()
                .map(|(key, value)| {
                    let value = if *key == blank { "\"\"" } else { *value };
                    format!("{key}: {value}\n")
                })
                .collect();
            match parse_frontmatter(&format!("---\n{yaml}---\nBody\n")) {
                Err(FrontmatterError::MissingField(field)) => assert_eq!(field, blank),
                other => panic!("Expected MissingField({blank}), got {other:?}"),
            }
        }
    }
}

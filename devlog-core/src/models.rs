//! Content model structs for posts, front-matter, and the built site index.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Words per minute used for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// Front-matter metadata from a post's markdown file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub author: String,
    pub category: String,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub featured: bool,
}

/// A single blog post
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    /// Identifier derived from the source file name (e.g., "rust-ownership")
    pub slug: String,

    pub title: String,

    /// One-paragraph summary shown on cards and in search results
    pub excerpt: String,

    /// Raw markdown body (without front-matter)
    pub content: String,

    pub author: String,

    /// Publication date, serialized as `YYYY-MM-DD`
    pub date: NaiveDate,

    pub category: String,

    pub tags: Vec<String>,

    #[serde(default)]
    pub featured: bool,

    /// Estimated reading time in minutes
    pub reading_time: u32,
}

impl Post {
    /// URL path of this post relative to the site root (e.g., "/blog/hello")
    pub fn url(&self) -> String {
        format!("/blog/{}", self.slug)
    }

    /// URL path including a base path (e.g., "/devlog/blog/hello/")
    pub fn url_with_base(&self, base_url: &str) -> String {
        format!(
            "{}blog/{}/",
            crate::config::normalize_base_url(base_url),
            self.slug
        )
    }

    /// Display date in ISO form
    pub fn iso_date(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }

    pub fn in_category(&self, name: &str) -> bool {
        self.category.to_lowercase() == name.to_lowercase()
    }

    /// Case-insensitive exact tag membership
    pub fn has_tag(&self, name: &str) -> bool {
        let needle = name.to_lowercase();
        self.tags.iter().any(|t| t.to_lowercase() == needle)
    }
}

/// Reading time in whole minutes, rounded up.
///
/// Any body with at least one word reads in at least one minute.
///
/// ```
/// use devlog_core::models::reading_time;
///
/// assert_eq!(reading_time("one"), 1);
/// assert_eq!(reading_time(&"word ".repeat(400)), 2);
/// assert_eq!(reading_time("   "), 0);
/// ```
pub fn reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    Info,
    Warning,
    Error,
}

/// A build-time problem tied to one piece of content
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostic {
    pub code: String,
    pub message: String,
    pub severity: DiagnosticSeverity,
    pub post_slug: Option<String>,
}

/// Everything a build produces before pages are written
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteIndex {
    /// All posts, date descending
    pub posts: Vec<Post>,

    /// Rendered article HTML keyed by slug; posts that failed to render are absent
    pub rendered: HashMap<String, String>,

    pub diagnostics: Vec<Diagnostic>,
}

impl SiteIndex {
    pub fn find_by_slug(&self, slug: &str) -> Option<&Post> {
        self.posts.iter().find(|p| p.slug == slug)
    }

    pub fn html_for(&self, slug: &str) -> Option<&str> {
        self.rendered.get(slug).map(String::as_str)
    }

    pub fn featured(&self) -> Vec<&Post> {
        self.posts.iter().filter(|p| p.featured).collect()
    }

    pub fn recent(&self, limit: usize) -> Vec<&Post> {
        self.posts.iter().take(limit).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str) -> Post {
        Post {
            slug: slug.into(),
            title: "Title".into(),
            excerpt: "Excerpt".into(),
            content: String::new(),
            author: "Kim".into(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            category: "웹 개발".into(),
            tags: vec!["React".into(), "Next.js".into()],
            featured: false,
            reading_time: 0,
        }
    }

    #[test]
    fn test_reading_time_rounds_up() {
        assert_eq!(reading_time(&"word ".repeat(400)), 2);
        assert_eq!(reading_time(&"word ".repeat(401)), 3);
        assert_eq!(reading_time("single"), 1);
        assert_eq!(reading_time(""), 0);
    }

    #[test]
    fn test_post_urls() {
        let p = post("hello-world");
        assert_eq!(p.url(), "/blog/hello-world");
        assert_eq!(p.url_with_base("/"), "/blog/hello-world/");
        assert_eq!(p.url_with_base("devlog"), "/devlog/blog/hello-world/");
    }

    #[test]
    fn test_case_insensitive_membership() {
        let p = post("a");
        assert!(p.has_tag("react"));
        assert!(p.has_tag("NEXT.JS"));
        assert!(!p.has_tag("Next"));
        assert!(p.in_category("웹 개발"));
    }

    #[test]
    fn test_post_serializes_camel_case() {
        let value = serde_json::to_value(post("a")).unwrap();
        assert_eq!(value["readingTime"], 0);
        assert_eq!(value["date"], "2024-03-15");
    }
}

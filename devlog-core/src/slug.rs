//! Slug generation and the category/tag route codec.
//!
//! Category and tag names are authored in any script (mostly Korean), so their
//! route segments are percent-encoded rather than transliterated: decoding a
//! segment always yields the exact display name it was produced from.

use regex::Regex;
use std::borrow::Cow;
use std::fmt;
use std::sync::OnceLock;
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlugError {
    #[error("Slug '{0}' is not valid percent-encoded UTF-8")]
    InvalidEncoding(String),

    #[error("Empty {0} slug")]
    Empty(TaxonomyKind),
}

/// Which taxonomy a name belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    Category,
    Tag,
}

impl TaxonomyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxonomyKind::Category => "category",
            TaxonomyKind::Tag => "tag",
        }
    }
}

impl fmt::Display for TaxonomyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bidirectional mapping between display names and URL path segments.
///
/// Implementations must satisfy `from_slug(k, &to_slug(k, name)) == Ok(name)`
/// for every name that appears in the post collection.
pub trait SlugCodec {
    fn to_slug(&self, kind: TaxonomyKind, name: &str) -> String;

    fn from_slug(&self, kind: TaxonomyKind, slug: &str) -> Result<String, SlugError>;
}

/// Percent-encodes the display name itself; lossless for any string.
#[derive(Debug, Clone, Copy, Default)]
pub struct PercentCodec;

impl SlugCodec for PercentCodec {
    fn to_slug(&self, _kind: TaxonomyKind, name: &str) -> String {
        urlencoding::encode(name).into_owned()
    }

    fn from_slug(&self, kind: TaxonomyKind, slug: &str) -> Result<String, SlugError> {
        if slug.is_empty() {
            return Err(SlugError::Empty(kind));
        }
        urlencoding::decode(slug)
            .map(Cow::into_owned)
            .map_err(|_| SlugError::InvalidEncoding(slug.to_string()))
    }
}

/// Route segment for a category name
///
/// ```
/// use devlog_core::{category_to_slug, slug_to_category};
///
/// let slug = category_to_slug("웹 개발");
/// assert_eq!(slug, "%EC%9B%B9%20%EA%B0%9C%EB%B0%9C");
/// assert_eq!(slug_to_category(&slug).unwrap(), "웹 개발");
/// ```
pub fn category_to_slug(name: &str) -> String {
    PercentCodec.to_slug(TaxonomyKind::Category, name)
}

pub fn slug_to_category(slug: &str) -> Result<String, SlugError> {
    PercentCodec.from_slug(TaxonomyKind::Category, slug)
}

/// Route segment for a tag name
pub fn tag_to_slug(name: &str) -> String {
    PercentCodec.to_slug(TaxonomyKind::Tag, name)
}

pub fn slug_to_tag(slug: &str) -> Result<String, SlugError> {
    PercentCodec.from_slug(TaxonomyKind::Tag, slug)
}

static HYPHEN_RUNS: OnceLock<Regex> = OnceLock::new();

/// Convert a string to a URL-safe anchor slug
///
/// Used for heading ids only; taxonomy routes go through [`SlugCodec`].
///
/// Rules:
/// - Lowercase
/// - Replace whitespace and underscores with hyphens
/// - Remove punctuation (letters of any script are kept)
/// - Collapse multiple hyphens and trim them from the ends
///
/// # Examples
///
/// ```
/// use devlog_core::slugify;
///
/// assert_eq!(slugify("Hello World"), "hello-world");
/// assert_eq!(slugify("Rust & Safety"), "rust-safety");
/// assert_eq!(slugify("성능 최적화"), "성능-최적화");
/// ```
pub fn slugify(input: &str) -> String {
    let cleaned: String = input
        .to_lowercase()
        .graphemes(true)
        .filter_map(|g| {
            let c = g.chars().next()?;
            if c.is_whitespace() || c == '_' || c == '-' {
                Some("-")
            } else if c.is_alphanumeric() {
                Some(g)
            } else {
                None
            }
        })
        .collect();

    let re = HYPHEN_RUNS.get_or_init(|| Regex::new(r"-+").expect("hyphen pattern is valid"));
    re.replace_all(&cleaned, "-").trim_matches('-').to_string()
}

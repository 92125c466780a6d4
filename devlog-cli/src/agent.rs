//! Shared JSON schema helpers for machine-readable command output.

use devlog_core::{CategoryStats, Listing, Post, Route, TagStats};
use serde::Serialize;

pub const SCHEMA_VERSION: &str = "2024-11-devlog-v1";

/// Standard envelope for machine-consumable responses.
#[derive(Serialize)]
pub struct Envelope<T> {
    pub schema_version: &'static str,
    pub kind: &'static str,
    pub data: T,
}

pub fn envelope<T>(kind: &'static str, data: T) -> Envelope<T> {
    Envelope {
        schema_version: SCHEMA_VERSION,
        kind,
        data,
    }
}

#[derive(Serialize)]
pub struct SearchResult {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub category: String,
    pub tags: Vec<String>,
    pub date: String,
    pub score: f64,
}

impl SearchResult {
    pub fn new(post: &Post, score: f64, base_url: &str) -> Self {
        Self {
            slug: post.slug.clone(),
            url: post.url_with_base(base_url),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            category: post.category.clone(),
            tags: post.tags.clone(),
            date: post.iso_date(),
            score,
        }
    }
}

#[derive(Serialize)]
pub struct SearchData {
    pub query: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub limit: usize,
    pub total: usize,
    pub results: Vec<SearchResult>,
}

#[derive(Serialize)]
pub struct PostData<'a> {
    #[serde(flatten)]
    pub post: &'a Post,
    pub url: String,
    pub content_html: Option<&'a str>,
}

#[derive(Serialize)]
pub struct TaxonomyData<T> {
    pub total: usize,
    pub items: Vec<T>,
}

impl<T> TaxonomyData<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            total: items.len(),
            items,
        }
    }
}

pub type CategoriesData = TaxonomyData<CategoryStats>;
pub type TagsData = TaxonomyData<TagStats>;

/// One category or tag with its posts, featured first
#[derive(Serialize)]
pub struct TaxonomyDetail<T> {
    #[serde(flatten)]
    pub stats: T,
    /// `None` when the build writes no page for this name
    pub url: Option<String>,
    pub featured: Vec<String>,
    pub regular: Vec<String>,
}

impl<T> TaxonomyDetail<T> {
    pub fn new(stats: T, url: Option<String>, listing: &Listing<'_>) -> Self {
        Self {
            stats,
            url,
            featured: slugs(&listing.featured),
            regular: slugs(&listing.regular),
        }
    }
}

fn slugs(posts: &[&Post]) -> Vec<String> {
    posts.iter().map(|p| p.slug.clone()).collect()
}

#[derive(Serialize)]
pub struct RouteEntry {
    pub kind: &'static str,
    pub slug: Option<String>,
    pub path: String,
    pub output: Option<String>,
}

impl RouteEntry {
    pub fn new(route: &Route, output: Option<String>) -> Self {
        Self {
            kind: route.kind(),
            slug: route.slug().map(str::to_string),
            path: route.path(),
            output,
        }
    }
}

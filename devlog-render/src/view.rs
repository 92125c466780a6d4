//! View data shared by the page templates.

use devlog_core::{
    i18n::Catalog, CategoryStats, Locale, MessageKey, Post, Route, TagStats, TaxonomyRoutes,
    LOCALE_STORAGE_KEY,
};
use std::fmt;

/// Translated strings for one page render.
///
/// Pages are rendered in the configured default locale; every label also
/// carries its message path so the client script can swap the text when the
/// reader switches locale.
#[derive(Debug, Clone, Copy)]
pub struct I18n<'a> {
    catalog: &'a Catalog,
}

impl<'a> I18n<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    pub fn locale(&self) -> Locale {
        self.catalog.locale()
    }

    /// Plain text, for attributes and `<title>`
    pub fn text(&self, key: MessageKey) -> &'a str {
        self.catalog.t(key)
    }

    /// `<span data-i18n="...">` wrapped text for swappable page copy
    pub fn label(&self, key: MessageKey) -> Label<'a> {
        Label {
            path: key.path(),
            text: self.catalog.t(key),
        }
    }
}

/// Pre-escaped span; render with `|safe`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Label<'a> {
    pub path: &'static str,
    pub text: &'a str,
}

impl fmt::Display for Label<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<span data-i18n=\"{}\">{}</span>",
            self.path,
            html_escape(self.text)
        )
    }
}

/// Navigation targets, already joined with the base URL
#[derive(Debug, Clone)]
pub struct Nav {
    pub home: String,
    pub blog: String,
    pub categories: String,
    pub tags: String,
    pub search: String,
    pub about: String,
    pub contact: String,
}

impl Nav {
    pub fn new(base_url: &str) -> Self {
        Self {
            home: Route::Home.url(base_url),
            blog: Route::BlogIndex.url(base_url),
            categories: Route::CategoriesIndex.url(base_url),
            tags: Route::TagsIndex.url(base_url),
            search: Route::Search.url(base_url),
            about: Route::About.url(base_url),
            contact: Route::Contact.url(base_url),
        }
    }
}

/// Site metadata and layout data common to every page
#[derive(Debug, Clone)]
pub struct Chrome {
    pub site_title: String,
    pub site_author: String,
    pub site_description: String,
    pub email: Option<String>,
    pub github: Option<String>,
    pub year: i32,
    pub base_url: String,
    pub lang: String,
    pub locale_storage_key: &'static str,
    pub nav: Nav,
}

impl Chrome {
    pub fn new(config: &devlog_core::Config, year: i32) -> Self {
        let base_url = config.normalized_base_url();
        Self {
            site_title: config.site.title.clone(),
            site_author: config.site.author.clone(),
            site_description: config.site.description.clone(),
            email: config.site.email.clone(),
            github: config.site.github.clone(),
            year,
            nav: Nav::new(&base_url),
            base_url,
            lang: config.default_locale.code().to_string(),
            locale_storage_key: LOCALE_STORAGE_KEY,
        }
    }
}

/// Link targets of one build: the base URL and the taxonomy pages that exist
#[derive(Debug, Clone, Copy)]
pub struct Links<'a> {
    base_url: &'a str,
    taxonomy: &'a TaxonomyRoutes,
}

impl<'a> Links<'a> {
    pub fn new(base_url: &'a str, taxonomy: &'a TaxonomyRoutes) -> Self {
        Self { base_url, taxonomy }
    }

    pub fn base_url(&self) -> &'a str {
        self.base_url
    }

    pub fn post(&self, slug: &str) -> String {
        Route::Post(slug.to_string()).url(self.base_url)
    }

    /// `None` when the category has no page
    pub fn category(&self, name: &str) -> Option<String> {
        self.taxonomy.category(name).map(|r| r.url(self.base_url))
    }

    /// `None` when the tag has no page
    pub fn tag(&self, name: &str) -> Option<String> {
        self.taxonomy.tag(name).map(|r| r.url(self.base_url))
    }
}

/// A tag chip; unlinked when the tag has no page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLink {
    pub name: String,
    pub url: Option<String>,
    pub count: usize,
}

impl TagLink {
    pub fn new(name: &str, links: &Links<'_>) -> Self {
        Self {
            name: name.to_string(),
            url: links.tag(name),
            count: 0,
        }
    }

    pub fn from_stats(stats: &TagStats, links: &Links<'_>) -> Self {
        Self {
            count: stats.count,
            ..Self::new(&stats.name, links)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLink {
    pub name: String,
    pub url: Option<String>,
    pub count: usize,
    pub featured_count: usize,
    pub latest: Option<String>,
}

impl CategoryLink {
    pub fn from_stats(stats: &CategoryStats, links: &Links<'_>) -> Self {
        Self {
            name: stats.name.clone(),
            url: links.category(&stats.name),
            count: stats.count,
            featured_count: stats.featured_count,
            latest: stats
                .most_recent_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
        }
    }
}

/// A post as shown in listings
#[derive(Debug, Clone)]
pub struct PostCard {
    pub slug: String,
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub author: String,
    pub date: String,
    pub category: String,
    pub category_url: Option<String>,
    pub tags: Vec<TagLink>,
    pub featured: bool,
    pub reading_time: u32,
}

impl PostCard {
    pub fn new(post: &Post, links: &Links<'_>) -> Self {
        Self {
            slug: post.slug.clone(),
            url: links.post(&post.slug),
            title: post.title.clone(),
            excerpt: post.excerpt.clone(),
            author: post.author.clone(),
            date: post.iso_date(),
            category: post.category.clone(),
            category_url: links.category(&post.category),
            tags: post.tags.iter().map(|t| TagLink::new(t, links)).collect(),
            featured: post.featured,
            reading_time: post.reading_time,
        }
    }

    pub fn many<'p>(posts: impl IntoIterator<Item = &'p Post>, links: &Links<'_>) -> Vec<Self> {
        posts.into_iter().map(|p| Self::new(p, links)).collect()
    }

    /// `|`-separated lowercase tags, for client-side filtering
    pub fn tag_filter(&self) -> String {
        self.tags
            .iter()
            .map(|t| t.name.to_lowercase())
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// HTML escape function to prevent XSS
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

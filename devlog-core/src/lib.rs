//! # devlog-core
//!
//! Core library for the devlog static blog generator.
//!
//! This crate turns a directory of markdown posts into a typed, date-sorted
//! collection and derives everything a blog needs from it: rendered article
//! HTML, category and tag indices, percent-encoded taxonomy routes, a weighted
//! fuzzy search engine, and the typed locale catalog used by the page chrome.

pub mod builder;
pub mod config;
pub mod frontmatter;
pub mod i18n;
pub mod markdown;
pub mod models;
pub mod repository;
pub mod routes;
pub mod search;
pub mod slug;
pub mod taxonomy;

pub use builder::{BuildError, SiteBuilder, SiteMessages};
pub use config::Config;
pub use i18n::{
    Catalog, DirMessages, EmbeddedMessages, I18nError, Locale, MessageKey, MessageSource,
    TranslationCache, LOCALE_STORAGE_KEY,
};
pub use markdown::{CmarkRenderer, Highlighter, MarkdownRenderer, RenderError, SyntectHighlighter};
pub use models::{Diagnostic, DiagnosticSeverity, Post, SiteIndex};
pub use repository::{PostError, PostRepository};
pub use routes::{site_routes, ResolvedRoute, Route, TaxonomyRoutes};
pub use search::{
    search_documents, ClientSearchIndex, FuzzyIndex, SearchDocument, SearchEngine, SearchQuery, SearchSession,
    WeightedFuzzyIndex,
};
pub use slug::{
    category_to_slug, slug_to_category, slug_to_tag, slugify, tag_to_slug, PercentCodec,
    SlugCodec, SlugError, TaxonomyKind,
};
pub use taxonomy::{CategoryStats, Listing, TagStats, Taxonomy};

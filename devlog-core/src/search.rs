//! Weighted fuzzy search over post metadata with category/tag post-filters.
//!
//! Scores follow the usual fuzzy-search convention: 0 is a perfect match and
//! larger is worse. Each field yields a distance in `0.0..=1.0`; fields within
//! the threshold contribute `distance ^ normalized_weight` to a product, so an
//! exact hit in a heavily weighted field dominates the ranking.

use crate::models::Post;
use serde::Serialize;
use std::collections::HashSet;

/// Largest field distance still counted as a match
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// Query tokens shorter than this must equal a field token to count as exact
pub const MIN_SUBSTRING_TOKEN: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SearchField {
    Title,
    Excerpt,
    Content,
    Tags,
}

impl SearchField {
    pub const ALL: [SearchField; 4] = [
        SearchField::Title,
        SearchField::Excerpt,
        SearchField::Content,
        SearchField::Tags,
    ];

    /// Key of the field in `search-index.json` documents
    pub fn name(&self) -> &'static str {
        match self {
            SearchField::Title => "title",
            SearchField::Excerpt => "excerpt",
            SearchField::Content => "content",
            SearchField::Tags => "tags",
        }
    }

    pub fn weight(&self) -> f64 {
        match self {
            SearchField::Title => 0.4,
            SearchField::Excerpt => 0.3,
            SearchField::Content => 0.2,
            SearchField::Tags => 0.1,
        }
    }

    fn text(&self, post: &Post) -> String {
        match self {
            SearchField::Title => post.title.clone(),
            SearchField::Excerpt => post.excerpt.clone(),
            SearchField::Content => post.content.clone(),
            SearchField::Tags => post.tags.join("\n"),
        }
    }
}

/// A matching document position and its score (lower is better)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchHit {
    pub index: usize,
    pub score: f64,
}

/// Approximate text matching over a fixed document set
pub trait FuzzyIndex {
    /// Matching documents, best first; equal scores keep document order
    fn query(&self, query: &str) -> Vec<SearchHit>;
}

#[derive(Debug, Clone)]
struct FieldText {
    lowered: String,
    tokens: Vec<String>,
}

impl FieldText {
    fn new(text: &str) -> Self {
        let lowered = text.to_lowercase();
        let mut seen = HashSet::new();
        let tokens = tokenize(&lowered)
            .into_iter()
            .filter(|t| seen.insert(t.clone()))
            .collect();
        Self { lowered, tokens }
    }

    /// 0.0 when the field contains the whole query, otherwise 1 - mean token similarity
    fn distance(&self, query: &str, query_tokens: &[String]) -> f64 {
        if self.lowered.contains(query) {
            return 0.0;
        }
        if query_tokens.is_empty() || self.tokens.is_empty() {
            return 1.0;
        }
        let total: f64 = query_tokens
            .iter()
            .map(|q| best_similarity(q, &self.tokens))
            .sum();
        1.0 - total / query_tokens.len() as f64
    }
}

fn best_similarity(query_token: &str, tokens: &[String]) -> f64 {
    let long_enough = query_token.chars().count() >= MIN_SUBSTRING_TOKEN;
    tokens
        .iter()
        .map(|t| {
            if t == query_token || (long_enough && t.contains(query_token)) {
                1.0
            } else {
                strsim::normalized_levenshtein(query_token, t)
            }
        })
        .fold(0.0, f64::max)
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fuzzy index over title, excerpt, content and tags
#[derive(Debug, Clone)]
pub struct WeightedFuzzyIndex {
    docs: Vec<[FieldText; 4]>,
    threshold: f64,
}

impl WeightedFuzzyIndex {
    pub fn build(posts: &[Post], threshold: f64) -> Self {
        let docs = posts
            .iter()
            .map(|post| SearchField::ALL.map(|field| FieldText::new(&field.text(post))))
            .collect();
        Self {
            docs,
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    fn score(&self, fields: &[FieldText; 4], query: &str, tokens: &[String]) -> Option<f64> {
        let total_weight: f64 = SearchField::ALL.iter().map(SearchField::weight).sum();
        let mut score = 1.0;
        let mut matched = false;

        for (field, text) in SearchField::ALL.iter().zip(fields) {
            let distance = text.distance(query, tokens);
            if distance <= self.threshold {
                matched = true;
                score *= distance
                    .max(f64::EPSILON)
                    .powf(field.weight() / total_weight);
            }
        }

        matched.then_some(score)
    }
}

impl FuzzyIndex for WeightedFuzzyIndex {
    fn query(&self, query: &str) -> Vec<SearchHit> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }
        let tokens = tokenize(&query);

        let mut hits: Vec<SearchHit> = self
            .docs
            .iter()
            .enumerate()
            .filter_map(|(index, fields)| {
                self.score(fields, &query, &tokens)
                    .map(|score| SearchHit { index, score })
            })
            .collect();

        hits.sort_by(|a, b| a.score.total_cmp(&b.score));
        hits
    }
}

/// Text query plus exact-match filters; empty parts are inactive
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
}

impl SearchQuery {
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
            && self.category.as_deref().is_none_or(|c| c.trim().is_empty())
            && self.tags.is_empty()
    }
}

/// Search over one snapshot of the post collection
pub struct SearchEngine<'a, I: FuzzyIndex = WeightedFuzzyIndex> {
    posts: &'a [Post],
    index: I,
}

impl<'a> SearchEngine<'a, WeightedFuzzyIndex> {
    pub fn new(posts: &'a [Post], threshold: f64) -> Self {
        Self::with_index(posts, WeightedFuzzyIndex::build(posts, threshold))
    }
}

impl<'a, I: FuzzyIndex> SearchEngine<'a, I> {
    pub fn with_index(posts: &'a [Post], index: I) -> Self {
        Self { posts, index }
    }

    pub fn posts(&self) -> &'a [Post] {
        self.posts
    }

    /// Ranked matches with scores; a blank query returns everything unscored (0.0)
    pub fn search_scored(&self, query: &str) -> Vec<(&'a Post, f64)> {
        if query.trim().is_empty() {
            return self.posts.iter().map(|p| (p, 0.0)).collect();
        }
        self.index
            .query(query)
            .into_iter()
            .filter_map(|hit| self.posts.get(hit.index).map(|p| (p, hit.score)))
            .collect()
    }

    pub fn search(&self, query: &str) -> Vec<&'a Post> {
        self.search_scored(query).into_iter().map(|(p, _)| p).collect()
    }

    /// Text search AND category AND any-of tags
    pub fn run(&self, query: &SearchQuery) -> Vec<&'a Post> {
        let results = self.search(&query.query);
        let results = match query.category.as_deref() {
            Some(category) => filter_by_category(results, category),
            None => results,
        };
        filter_by_tags(results, &query.tags)
    }

    /// Same selection as [`run`](Self::run), keeping each post's score
    pub fn run_scored(&self, query: &SearchQuery) -> Vec<(&'a Post, f64)> {
        let category = query.category.as_deref().unwrap_or("").trim();
        self.search_scored(&query.query)
            .into_iter()
            .filter(|(p, _)| category.is_empty() || p.in_category(category))
            .filter(|(p, _)| query.tags.is_empty() || query.tags.iter().any(|t| p.has_tag(t)))
            .collect()
    }
}

/// Keep posts whose category equals `name` (case-insensitive); blank keeps all
pub fn filter_by_category<'a>(results: Vec<&'a Post>, name: &str) -> Vec<&'a Post> {
    if name.trim().is_empty() {
        return results;
    }
    results.into_iter().filter(|p| p.in_category(name)).collect()
}

/// Keep posts carrying at least one of `tags` (case-insensitive); empty keeps all
pub fn filter_by_tags<'a>(results: Vec<&'a Post>, tags: &[String]) -> Vec<&'a Post> {
    if tags.is_empty() {
        return results;
    }
    results
        .into_iter()
        .filter(|p| tags.iter().any(|t| p.has_tag(t)))
        .collect()
}

/// Interactive search state; every transition recomputes the results
pub struct SearchSession<'e, 'a, I: FuzzyIndex = WeightedFuzzyIndex> {
    engine: &'e SearchEngine<'a, I>,
    state: SearchQuery,
    results: Vec<&'a Post>,
}

impl<'e, 'a, I: FuzzyIndex> SearchSession<'e, 'a, I> {
    pub fn new(engine: &'e SearchEngine<'a, I>) -> Self {
        let state = SearchQuery::default();
        let results = engine.run(&state);
        Self {
            engine,
            state,
            results,
        }
    }

    pub fn state(&self) -> &SearchQuery {
        &self.state
    }

    pub fn results(&self) -> &[&'a Post] {
        &self.results
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.state.query = query.into();
        self.recompute();
    }

    /// An empty name clears the category filter
    pub fn set_category(&mut self, category: impl Into<String>) {
        let category = category.into();
        self.state.category = (!category.trim().is_empty()).then_some(category);
        self.recompute();
    }

    pub fn toggle_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        match self.state.tags.iter().position(|t| *t == tag) {
            Some(pos) => {
                self.state.tags.remove(pos);
            }
            None => self.state.tags.push(tag),
        }
        self.recompute();
    }

    pub fn clear_all(&mut self) {
        self.state = SearchQuery::default();
        self.recompute();
    }

    pub fn has_active_filters(&self) -> bool {
        !self.state.is_empty()
    }

    fn recompute(&mut self) {
        self.results = self.engine.run(&self.state);
    }
}

/// Per-post record written to `search-index.json` for the client-side page.
///
/// `content` is the markdown source, the same text [`WeightedFuzzyIndex`]
/// scores, so the page and `devlog search` rank alike.
#[derive(Debug, Clone, Serialize)]
pub struct SearchDocument {
    pub slug: String,
    pub title: String,
    pub excerpt: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub date: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SearchKey {
    pub name: &'static str,
    pub weight: f64,
}

/// Contents of `search-index.json`: documents plus the scoring parameters
/// the search page applies
#[derive(Debug, Clone, Serialize)]
pub struct ClientSearchIndex {
    pub threshold: f64,
    pub min_substring_token: usize,
    pub keys: Vec<SearchKey>,
    pub documents: Vec<SearchDocument>,
}

impl ClientSearchIndex {
    pub fn new(posts: &[Post], base_url: &str, threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            min_substring_token: MIN_SUBSTRING_TOKEN,
            keys: SearchField::ALL
                .iter()
                .map(|field| SearchKey {
                    name: field.name(),
                    weight: field.weight(),
                })
                .collect(),
            documents: search_documents(posts, base_url),
        }
    }
}

pub fn search_documents(posts: &[Post], base_url: &str) -> Vec<SearchDocument> {
    posts
        .iter()
        .map(|p| SearchDocument {
            slug: p.slug.clone(),
            title: p.title.clone(),
            excerpt: p.excerpt.clone(),
            content: p.content.clone(),
            category: p.category.clone(),
            tags: p.tags.clone(),
            date: p.iso_date(),
            url: p.url_with_base(base_url),
        })
        .collect()
}

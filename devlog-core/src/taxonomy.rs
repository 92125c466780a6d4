//! Category and tag indices derived from a post collection.
//!
//! Indices are never authored: a name exists only while at least one post
//! carries it, so an unknown name and an empty listing are the same outcome
//! (`None`).

use crate::models::Post;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Tags with at least this many posts are shown as "popular"
pub const POPULAR_TAG_MIN_POSTS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryStats {
    pub name: String,
    pub count: usize,
    pub featured_count: usize,
    pub most_recent_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagStats {
    pub name: String,
    pub count: usize,
    pub featured_count: usize,
}

/// Posts of one category or tag, split by the `featured` flag
#[derive(Debug, Clone, Default)]
pub struct Listing<'a> {
    pub featured: Vec<&'a Post>,
    pub regular: Vec<&'a Post>,
}

impl<'a> Listing<'a> {
    pub fn from_posts(posts: impl IntoIterator<Item = &'a Post>) -> Self {
        let (featured, regular) = posts.into_iter().partition(|p| p.featured);
        Self { featured, regular }
    }

    pub fn len(&self) -> usize {
        self.featured.len() + self.regular.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Featured first, then regular, each in date order
    pub fn all(&self) -> impl Iterator<Item = &'a Post> + '_ {
        self.featured.iter().chain(self.regular.iter()).copied()
    }
}

/// Read-only view over an already sorted post collection
#[derive(Debug, Clone, Copy)]
pub struct Taxonomy<'a> {
    posts: &'a [Post],
}

impl<'a> Taxonomy<'a> {
    pub fn new(posts: &'a [Post]) -> Self {
        Self { posts }
    }

    pub fn posts(&self) -> &'a [Post] {
        self.posts
    }

    /// Distinct category names in first-occurrence order.
    ///
    /// Names differing only in case are one category, spelled as first seen.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.posts.iter().map(|p| p.category.as_str()))
    }

    /// Distinct tag names in first-occurrence order, folded like categories
    pub fn tags(&self) -> Vec<String> {
        distinct(self.posts.iter().flat_map(|p| p.tags.iter().map(String::as_str)))
    }

    pub fn posts_in_category(&self, name: &str) -> Vec<&'a Post> {
        self.posts.iter().filter(|p| p.in_category(name)).collect()
    }

    pub fn posts_with_tag(&self, name: &str) -> Vec<&'a Post> {
        self.posts.iter().filter(|p| p.has_tag(name)).collect()
    }

    pub fn category_stats(&self, name: &str) -> Option<CategoryStats> {
        let posts = self.posts_in_category(name);
        let first = posts.first()?;
        Some(CategoryStats {
            name: first.category.clone(),
            count: posts.len(),
            featured_count: posts.iter().filter(|p| p.featured).count(),
            most_recent_date: posts.iter().map(|p| p.date).max(),
        })
    }

    pub fn tag_stats(&self, name: &str) -> Option<TagStats> {
        let posts = self.posts_with_tag(name);
        let needle = name.to_lowercase();
        let canonical = posts
            .first()?
            .tags
            .iter()
            .find(|t| t.to_lowercase() == needle)?;
        Some(TagStats {
            name: canonical.clone(),
            count: posts.len(),
            featured_count: posts.iter().filter(|p| p.featured).count(),
        })
    }

    /// Category stats, most posts first; ties keep first-occurrence order
    pub fn categories_by_count(&self) -> Vec<CategoryStats> {
        let mut stats: Vec<CategoryStats> = self
            .categories()
            .iter()
            .filter_map(|c| self.category_stats(c))
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        stats
    }

    /// Tag stats, most posts first; ties keep first-occurrence order
    pub fn tags_by_count(&self) -> Vec<TagStats> {
        let mut stats: Vec<TagStats> = self
            .tags()
            .iter()
            .filter_map(|t| self.tag_stats(t))
            .collect();
        stats.sort_by(|a, b| b.count.cmp(&a.count));
        stats
    }

    pub fn popular_tags(&self, min_posts: usize) -> Vec<TagStats> {
        self.tags_by_count()
            .into_iter()
            .filter(|t| t.count >= min_posts)
            .collect()
    }

    pub fn regular_tags(&self, min_posts: usize) -> Vec<TagStats> {
        self.tags_by_count()
            .into_iter()
            .filter(|t| t.count < min_posts)
            .collect()
    }

    pub fn average_posts_per_tag(&self) -> f64 {
        let stats = self.tags_by_count();
        if stats.is_empty() {
            return 0.0;
        }
        let total: usize = stats.iter().map(|t| t.count).sum();
        total as f64 / stats.len() as f64
    }

    pub fn category_listing(&self, name: &str) -> Option<Listing<'a>> {
        let listing = Listing::from_posts(self.posts_in_category(name));
        (!listing.is_empty()).then_some(listing)
    }

    pub fn tag_listing(&self, name: &str) -> Option<Listing<'a>> {
        let listing = Listing::from_posts(self.posts_with_tag(name));
        (!listing.is_empty()).then_some(listing)
    }

    /// Tags that appear alongside `tag`, most co-occurrences first
    pub fn related_tags(&self, tag: &str, limit: usize) -> Vec<String> {
        let needle = tag.to_lowercase();
        let mut order: Vec<String> = Vec::new();
        let mut counts: HashMap<String, usize> = HashMap::new();

        for post in self.posts_with_tag(tag) {
            for other in &post.tags {
                let key = other.to_lowercase();
                if key == needle {
                    continue;
                }
                let count = counts.entry(key).or_insert_with(|| {
                    order.push(other.clone());
                    0
                });
                *count += 1;
            }
        }

        order.sort_by(|a, b| counts[&b.to_lowercase()].cmp(&counts[&a.to_lowercase()]));
        order.truncate(limit);
        order
    }
}

fn distinct<'s>(names: impl Iterator<Item = &'s str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .filter(|name| seen.insert(name.to_lowercase()))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(slug: &str, date: (i32, u32, u32), category: &str, tags: &[&str], featured: bool) -> Post {
        Post {
            slug: slug.into(),
            title: slug.to_uppercase(),
            excerpt: String::new(),
            content: String::new(),
            author: "Kim".into(),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            category: category.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            featured,
            reading_time: 1,
        }
    }

    fn collection() -> Vec<Post> {
        vec![
            post("d", (2024, 4, 1), "AI", &["파이썬", "딥러닝"], true),
            post("c", (2024, 3, 1), "웹 개발", &["React", "CSS"], false),
            post("b", (2024, 2, 1), "웹 개발", &["React", "Next.js"], true),
            post("a", (2024, 1, 1), "웹 개발", &["React"], false),
            post("e", (2023, 12, 1), "AI", &["딥러닝"], false),
        ]
    }

    #[test]
    fn test_distinct_names_in_first_occurrence_order() {
        let posts = collection();
        let taxonomy = Taxonomy::new(&posts);
        assert_eq!(taxonomy.categories(), vec!["AI", "웹 개발"]);
        assert_eq!(
            taxonomy.tags(),
            vec!["파이썬", "딥러닝", "React", "CSS", "Next.js"]
        );
    }

    #[test]
    fn test_category_stats() {
        let posts = collection();
        let taxonomy = Taxonomy::new(&posts);
        let stats = taxonomy.category_stats("웹 개발").unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.featured_count, 1);
        assert_eq!(stats.most_recent_date, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(taxonomy.category_stats("Nothing").is_none());
    }

    #[test]
    fn test_tag_stats_case_insensitive() {
        let posts = collection();
        let taxonomy = Taxonomy::new(&posts);
        let stats = taxonomy.tag_stats("react").unwrap();
        assert_eq!(stats.count, 3);
        assert_eq!(stats.featured_count, 1);
        assert!(taxonomy.tag_stats("Vue").is_none());
    }

    #[test]
    fn test_sort_by_count_is_stable() {
        let posts = collection();
        let taxonomy = Taxonomy::new(&posts);

        let categories: Vec<String> = taxonomy
            .categories_by_count()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(categories, vec!["웹 개발", "AI"]);

        let tags: Vec<String> = taxonomy.tags_by_count().into_iter().map(|t| t.name).collect();
        assert_eq!(tags, vec!["React", "딥러닝", "파이썬", "CSS", "Next.js"]);
    }

    #[test]
    fn test_popular_split() {
        let posts = collection();
        let taxonomy = Taxonomy::new(&posts);
        let popular: Vec<String> = taxonomy
            .popular_tags(POPULAR_TAG_MIN_POSTS)
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(popular, vec!["React"]);
        assert_eq!(taxonomy.regular_tags(POPULAR_TAG_MIN_POSTS).len(), 4);
        assert!((taxonomy.average_posts_per_tag() - 8.0 / 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_featured_partition() {
        let posts = collection();
        let taxonomy = Taxonomy::new(&posts);

        for name in taxonomy.categories() {
            let listing = taxonomy.category_listing(&name).unwrap();
            let all = taxonomy.posts_in_category(&name);
            assert_eq!(listing.len(), all.len());
            assert!(listing.featured.iter().all(|p| p.featured));
            assert!(listing.regular.iter().all(|p| !p.featured));
            for post in &all {
                assert!(listing.all().any(|p| p.slug == post.slug));
            }
        }
        for name in taxonomy.tags() {
            let listing = taxonomy.tag_listing(&name).unwrap();
            assert_eq!(listing.len(), taxonomy.posts_with_tag(&name).len());
            assert!(listing.featured.iter().all(|p| p.featured));
            assert!(listing.regular.iter().all(|p| !p.featured));
        }
        assert!(taxonomy.category_listing("Nothing").is_none());
    }

    #[test]
    fn test_related_tags() {
        let posts = collection();
        let taxonomy = Taxonomy::new(&posts);
        assert_eq!(taxonomy.related_tags("React", 5), vec!["CSS", "Next.js"]);
        assert_eq!(taxonomy.related_tags("딥러닝", 5), vec!["파이썬"]);
        assert!(taxonomy.related_tags("CSS", 0).is_empty());
    }

    #[test]
    fn test_case_variants_fold_to_first_spelling() {
        let posts = vec![
            post("b", (2024, 2, 1), "AI", &["React", "CSS"], false),
            post("a", (2024, 1, 1), "ai", &["react", "css", "Vite"], false),
        ];
        let taxonomy = Taxonomy::new(&posts);

        assert_eq!(taxonomy.categories(), vec!["AI"]);
        assert_eq!(taxonomy.tags(), vec!["React", "CSS", "Vite"]);
        assert_eq!(taxonomy.categories_by_count()[0].count, 2);
        assert_eq!(taxonomy.tags_by_count().len(), 3);
        assert_eq!(taxonomy.related_tags("REACT", 5), vec!["CSS", "Vite"]);
    }

    #[test]
    fn test_empty_collection() {
        let taxonomy = Taxonomy::new(&[]);
        assert!(taxonomy.categories().is_empty());
        assert!(taxonomy.tags_by_count().is_empty());
        assert_eq!(taxonomy.average_posts_per_tag(), 0.0);
    }
}

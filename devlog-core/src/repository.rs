//! Post repository: reads markdown posts with front-matter from a directory.
//!
//! Nothing is cached: every listing re-reads the directory, so two calls with
//! no filesystem change in between return identical collections.

use crate::frontmatter::{parse_frontmatter, FrontmatterError};
use crate::models::{reading_time, Post};
use chrono::{DateTime, NaiveDate};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum PostError {
    #[error("Post '{0}' not found")]
    NotFound(String),

    #[error("Invalid post slug: {0:?}")]
    InvalidSlug(String),

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Front-matter error in '{slug}': {source}")]
    Frontmatter {
        slug: String,
        #[source]
        source: FrontmatterError,
    },

    #[error("Invalid date '{date}' in '{slug}' (expected YYYY-MM-DD)")]
    InvalidDate { slug: String, date: String },
}

/// Filesystem-backed source of posts, one `{slug}.md` file per post
#[derive(Debug, Clone)]
pub struct PostRepository {
    dir: PathBuf,
}

impl PostRepository {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Every post identifier in the content directory, sorted by name
    pub fn list_slugs(&self) -> Vec<String> {
        if !self.dir.is_dir() {
            tracing::warn!("Posts directory {:?} does not exist", self.dir);
            return Vec::new();
        }

        let mut slugs: Vec<String> = WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "md"))
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_string)
            })
            .collect();

        slugs.sort();
        tracing::debug!("Found {} posts in {:?}", slugs.len(), self.dir);
        slugs
    }

    /// Parse one post, reporting why it could not be loaded
    pub fn load_post(&self, slug: &str) -> Result<Post, PostError> {
        if slug.is_empty() || slug.starts_with('.') || slug.contains(['/', '\\']) {
            return Err(PostError::InvalidSlug(slug.to_string()));
        }

        let path = self.dir.join(format!("{slug}.md"));
        let content = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                PostError::NotFound(slug.to_string())
            } else {
                PostError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        parse_post(slug, &content)
    }

    /// Load one post; failures are logged and yield `None`
    pub fn get_post(&self, slug: &str) -> Option<Post> {
        match self.load_post(slug) {
            Ok(post) => Some(post),
            Err(err) => {
                tracing::error!("Error reading post {}: {}", slug, err);
                None
            }
        }
    }

    /// All loadable posts, newest first
    pub fn list_all_posts(&self) -> Vec<Post> {
        let mut posts: Vec<Post> = self
            .list_slugs()
            .iter()
            .filter_map(|slug| self.get_post(slug))
            .collect();
        sort_by_date_desc(&mut posts);
        posts
    }

    pub fn posts_by_category(&self, category: &str) -> Vec<Post> {
        self.list_all_posts()
            .into_iter()
            .filter(|p| p.in_category(category))
            .collect()
    }

    pub fn posts_by_tag(&self, tag: &str) -> Vec<Post> {
        self.list_all_posts()
            .into_iter()
            .filter(|p| p.has_tag(tag))
            .collect()
    }

    pub fn featured_posts(&self) -> Vec<Post> {
        self.list_all_posts()
            .into_iter()
            .filter(|p| p.featured)
            .collect()
    }

    pub fn recent_posts(&self, limit: usize) -> Vec<Post> {
        let mut posts = self.list_all_posts();
        posts.truncate(limit);
        posts
    }
}

/// Build a post from one file's contents
pub fn parse_post(slug: &str, content: &str) -> Result<Post, PostError> {
    let (fm, body) = parse_frontmatter(content).map_err(|source| PostError::Frontmatter {
        slug: slug.to_string(),
        source,
    })?;

    let date = parse_date(&fm.date).ok_or_else(|| PostError::InvalidDate {
        slug: slug.to_string(),
        date: fm.date.clone(),
    })?;

    Ok(Post {
        slug: slug.to_string(),
        title: fm.title,
        excerpt: fm.excerpt,
        reading_time: reading_time(&body),
        content: body,
        author: fm.author,
        date,
        category: fm.category,
        tags: fm.tags,
        featured: fm.featured,
    })
}

/// Accepts `2024-03-15` or a full RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Stable sort, newest first; equal dates keep enumeration order
pub fn sort_by_date_desc(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_post(dir: &Path, slug: &str, date: &str, extra: &str, body: &str) {
        let content = format!(
            "---\ntitle: {slug} title\nexcerpt: about {slug}\ndate: {date}\nauthor: Kim\ncategory: 웹 개발\n{extra}---\n{body}"
        );
        fs::write(dir.join(format!("{slug}.md")), content).unwrap();
    }

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "january", "2024-01-01", "", "one");
        write_post(
            dir.path(),
            "march",
            "2024-03-15",
            "featured: true\ntags: [React]\n",
            "two",
        );
        write_post(dir.path(), "february", "2024-02-10", "tags: [react, CSS]\n", "three");
        dir
    }

    #[test]
    fn test_list_slugs_only_markdown() {
        let dir = fixture();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        fs::create_dir(dir.path().join("drafts.md")).unwrap();

        let repo = PostRepository::new(dir.path());
        assert_eq!(repo.list_slugs(), vec!["february", "january", "march"]);
    }

    #[test]
    fn test_all_posts_sorted_newest_first() {
        let dir = fixture();
        let repo = PostRepository::new(dir.path());
        let dates: Vec<String> = repo.list_all_posts().iter().map(Post::iso_date).collect();
        assert_eq!(dates, vec!["2024-03-15", "2024-02-10", "2024-01-01"]);
    }

    #[test]
    fn test_equal_dates_keep_enumeration_order() {
        let dir = tempfile::tempdir().unwrap();
        for slug in ["b", "c", "a"] {
            write_post(dir.path(), slug, "2024-05-05", "", "x");
        }
        let repo = PostRepository::new(dir.path());
        let slugs: Vec<String> = repo.list_all_posts().into_iter().map(|p| p.slug).collect();
        assert_eq!(slugs, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_listing_is_idempotent() {
        let dir = fixture();
        let repo = PostRepository::new(dir.path());
        assert_eq!(repo.list_all_posts(), repo.list_all_posts());
    }

    #[test]
    fn test_malformed_post_is_excluded() {
        let dir = fixture();
        fs::write(dir.path().join("broken.md"), "---\ntitle: Broken\n---\nno metadata").unwrap();
        fs::write(dir.path().join("bare.md"), "# No front-matter").unwrap();

        let repo = PostRepository::new(dir.path());
        assert_eq!(repo.list_all_posts().len(), 3);
        assert!(repo.get_post("broken").is_none());
        assert!(matches!(
            repo.load_post("broken"),
            Err(PostError::Frontmatter { .. })
        ));
    }

    #[test]
    fn test_invalid_date_is_excluded() {
        let dir = tempfile::tempdir().unwrap();
        write_post(dir.path(), "odd", "someday", "", "x");
        let repo = PostRepository::new(dir.path());
        assert!(matches!(
            repo.load_post("odd"),
            Err(PostError::InvalidDate { .. })
        ));
        assert!(repo.list_all_posts().is_empty());
    }

    #[test]
    fn test_missing_post_and_directory() {
        let dir = fixture();
        let repo = PostRepository::new(dir.path());
        assert!(matches!(repo.load_post("nope"), Err(PostError::NotFound(_))));
        assert!(matches!(
            repo.load_post("../secret"),
            Err(PostError::InvalidSlug(_))
        ));

        let empty = PostRepository::new(dir.path().join("missing"));
        assert!(empty.list_slugs().is_empty());
        assert!(empty.list_all_posts().is_empty());
    }

    #[test]
    fn test_filters() {
        let dir = fixture();
        let repo = PostRepository::new(dir.path());

        let by_tag: Vec<String> = repo.posts_by_tag("REACT").into_iter().map(|p| p.slug).collect();
        assert_eq!(by_tag, vec!["march", "february"]);

        assert_eq!(repo.posts_by_category("웹 개발").len(), 3);
        assert!(repo.posts_by_category("웹").is_empty());

        let featured: Vec<String> = repo.featured_posts().into_iter().map(|p| p.slug).collect();
        assert_eq!(featured, vec!["march"]);

        let recent: Vec<String> = repo.recent_posts(2).into_iter().map(|p| p.slug).collect();
        assert_eq!(recent, vec!["march", "february"]);
        assert_eq!(repo.recent_posts(10).len(), 3);
    }

    #[test]
    fn test_parse_post_fields() {
        let content = "---\ntitle: T\nexcerpt: E\ndate: 2024-03-15T09:30:00+09:00\nauthor: A\ncategory: AI\n---\n";
        let body = "word ".repeat(400);
        let post = parse_post("t", &format!("{content}{body}")).unwrap();
        assert_eq!(post.reading_time, 2);
        assert_eq!(post.iso_date(), "2024-03-15");
        assert!(post.tags.is_empty());
        assert!(!post.featured);
    }
}

//! The route table of a generated site.
//!
//! Taxonomy routes carry the percent-encoded slug, which is what links point
//! at. Static hosts decode request paths before looking up files, so on disk
//! the page lives under the decoded display name.

use crate::config::normalize_base_url;
use crate::models::Post;
use crate::slug::{SlugCodec, TaxonomyKind};
use crate::taxonomy::Taxonomy;
use std::collections::HashMap;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    BlogIndex,
    Post(String),
    CategoriesIndex,
    Category(String),
    TagsIndex,
    Tag(String),
    Search,
    About,
    Contact,
    NotFound,
}

/// A parsed request path; `name` is the decoded taxonomy display name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub route: Route,
    pub name: Option<String>,
}

impl Route {
    pub fn category(name: &str, codec: &impl SlugCodec) -> Self {
        Route::Category(codec.to_slug(TaxonomyKind::Category, name))
    }

    pub fn tag(name: &str, codec: &impl SlugCodec) -> Self {
        Route::Tag(codec.to_slug(TaxonomyKind::Tag, name))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Route::Home => "home",
            Route::BlogIndex => "blog_index",
            Route::Post(_) => "post",
            Route::CategoriesIndex => "categories_index",
            Route::Category(_) => "category",
            Route::TagsIndex => "tags_index",
            Route::Tag(_) => "tag",
            Route::Search => "search",
            Route::About => "about",
            Route::Contact => "contact",
            Route::NotFound => "not_found",
        }
    }

    /// Post slug or encoded taxonomy slug, for parameterized routes
    pub fn slug(&self) -> Option<&str> {
        match self {
            Route::Post(slug) | Route::Category(slug) | Route::Tag(slug) => Some(slug),
            _ => None,
        }
    }

    /// Site-relative URL path without a trailing slash
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::BlogIndex => "/blog".to_string(),
            Route::Post(slug) => format!("/blog/{slug}"),
            Route::CategoriesIndex => "/categories".to_string(),
            Route::Category(slug) => format!("/categories/{slug}"),
            Route::TagsIndex => "/tags".to_string(),
            Route::Tag(slug) => format!("/tags/{slug}"),
            Route::Search => "/search".to_string(),
            Route::About => "/about".to_string(),
            Route::Contact => "/contact".to_string(),
            Route::NotFound => "/404".to_string(),
        }
    }

    /// Link target under `base_url`, with the trailing slash static hosts expect
    pub fn url(&self, base_url: &str) -> String {
        let base = normalize_base_url(base_url);
        match self {
            Route::Home => base,
            Route::NotFound => format!("{base}404.html"),
            other => format!("{}{}/", base, other.path().trim_start_matches('/')),
        }
    }

    /// File to write under the output directory.
    ///
    /// `None` when a taxonomy slug does not decode to a single safe path
    /// segment; such a page cannot be served and is skipped.
    pub fn output_path(&self, codec: &impl SlugCodec) -> Option<PathBuf> {
        let dir = match self {
            Route::Home => return Some(PathBuf::from("index.html")),
            Route::NotFound => return Some(PathBuf::from("404.html")),
            Route::BlogIndex => PathBuf::from("blog"),
            Route::Post(slug) => PathBuf::from("blog").join(safe_segment(slug)?),
            Route::CategoriesIndex => PathBuf::from("categories"),
            Route::Category(slug) => {
                let name = codec.from_slug(TaxonomyKind::Category, slug).ok()?;
                PathBuf::from("categories").join(safe_segment(&name)?)
            }
            Route::TagsIndex => PathBuf::from("tags"),
            Route::Tag(slug) => {
                let name = codec.from_slug(TaxonomyKind::Tag, slug).ok()?;
                PathBuf::from("tags").join(safe_segment(&name)?)
            }
            Route::Search => PathBuf::from("search"),
            Route::About => PathBuf::from("about"),
            Route::Contact => PathBuf::from("contact"),
        };
        Some(dir.join("index.html"))
    }

    /// Parse a site-relative path; `None` is a not-found outcome
    pub fn resolve(path: &str, codec: &impl SlugCodec) -> Option<ResolvedRoute> {
        let trimmed = path
            .trim()
            .trim_end_matches("index.html")
            .trim_matches('/');
        let segments: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        let plain = |route| {
            Some(ResolvedRoute {
                route,
                name: None,
            })
        };

        match segments.as_slice() {
            [] => plain(Route::Home),
            ["blog"] => plain(Route::BlogIndex),
            ["blog", slug] => plain(Route::Post(slug.to_string())),
            ["categories"] => plain(Route::CategoriesIndex),
            ["categories", slug] => {
                let name = codec.from_slug(TaxonomyKind::Category, slug).ok()?;
                Some(ResolvedRoute {
                    route: Route::category(&name, codec),
                    name: Some(name),
                })
            }
            ["tags"] => plain(Route::TagsIndex),
            ["tags", slug] => {
                let name = codec.from_slug(TaxonomyKind::Tag, slug).ok()?;
                Some(ResolvedRoute {
                    route: Route::tag(&name, codec),
                    name: Some(name),
                })
            }
            ["search"] => plain(Route::Search),
            ["about"] => plain(Route::About),
            ["contact"] => plain(Route::Contact),
            ["404"] | ["404.html"] => plain(Route::NotFound),
            _ => None,
        }
    }
}

fn safe_segment(name: &str) -> Option<&str> {
    let unsafe_char = |c: char| matches!(c, '/' | '\\') || c.is_control();
    if name.is_empty() || name == "." || name == ".." || name.contains(unsafe_char) {
        None
    } else {
        Some(name)
    }
}

/// Canonical category and tag routes of one post collection.
///
/// Every taxonomy link is looked up here, so a link always points at a page
/// the build writes. Names differing only in case share the route of the
/// first spelling. A name that is not a single safe path segment (`CI/CD`)
/// has no page, and lookups for it return `None`.
#[derive(Debug, Clone, Default)]
pub struct TaxonomyRoutes {
    categories: Vec<Route>,
    tags: Vec<Route>,
    by_category: HashMap<String, Route>,
    by_tag: HashMap<String, Route>,
}

impl TaxonomyRoutes {
    pub fn new(posts: &[Post], codec: &impl SlugCodec) -> Self {
        let taxonomy = Taxonomy::new(posts);
        let mut routes = Self::default();

        for name in taxonomy.categories() {
            let route = Route::category(&name, codec);
            if route.output_path(codec).is_none() {
                tracing::warn!("Category '{}' has no page: not a servable path", name);
                continue;
            }
            routes.by_category.insert(name.to_lowercase(), route.clone());
            routes.categories.push(route);
        }

        for name in taxonomy.tags() {
            let route = Route::tag(&name, codec);
            if route.output_path(codec).is_none() {
                tracing::warn!("Tag '{}' has no page: not a servable path", name);
                continue;
            }
            routes.by_tag.insert(name.to_lowercase(), route.clone());
            routes.tags.push(route);
        }

        routes
    }

    /// Page of the category `name`, in any case spelling
    pub fn category(&self, name: &str) -> Option<&Route> {
        self.by_category.get(&name.to_lowercase())
    }

    /// Page of the tag `name`, in any case spelling
    pub fn tag(&self, name: &str) -> Option<&Route> {
        self.by_tag.get(&name.to_lowercase())
    }

    pub fn categories(&self) -> &[Route] {
        &self.categories
    }

    pub fn tags(&self) -> &[Route] {
        &self.tags
    }

    /// Every page of the site: static pages plus one per post, category and tag
    pub fn site_routes(&self, posts: &[Post]) -> Vec<Route> {
        let mut routes = vec![Route::Home, Route::BlogIndex];
        routes.extend(posts.iter().map(|p| Route::Post(p.slug.clone())));
        routes.push(Route::CategoriesIndex);
        routes.extend(self.categories.iter().cloned());
        routes.push(Route::TagsIndex);
        routes.extend(self.tags.iter().cloned());
        routes.extend([Route::Search, Route::About, Route::Contact, Route::NotFound]);
        routes
    }
}

/// Every page of the site, see [`TaxonomyRoutes::site_routes`]
pub fn site_routes(posts: &[Post], codec: &impl SlugCodec) -> Vec<Route> {
    TaxonomyRoutes::new(posts, codec).site_routes(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slug::PercentCodec;
    use chrono::NaiveDate;

    fn post(slug: &str, category: &str, tags: &[&str]) -> Post {
        Post {
            slug: slug.into(),
            title: slug.into(),
            excerpt: String::new(),
            content: String::new(),
            author: "Kim".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            category: category.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            featured: false,
            reading_time: 1,
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(Route::Home.path(), "/");
        assert_eq!(Route::Post("hello".into()).path(), "/blog/hello");
        assert_eq!(
            Route::category("웹 개발", &PercentCodec).path(),
            "/categories/%EC%9B%B9%20%EA%B0%9C%EB%B0%9C"
        );
        assert_eq!(Route::tag("C#", &PercentCodec).path(), "/tags/C%23");
    }

    #[test]
    fn test_urls_with_base() {
        assert_eq!(Route::Home.url("/devlog"), "/devlog/");
        assert_eq!(Route::Post("a".into()).url("/"), "/blog/a/");
        assert_eq!(Route::NotFound.url("/"), "/404.html");
    }

    #[test]
    fn test_output_paths_use_display_names() {
        let codec = PercentCodec;
        assert_eq!(
            Route::Home.output_path(&codec),
            Some(PathBuf::from("index.html"))
        );
        assert_eq!(
            Route::category("웹 개발", &codec).output_path(&codec),
            Some(PathBuf::from("categories/웹 개발/index.html"))
        );
        assert_eq!(
            Route::Post("hello".into()).output_path(&codec),
            Some(PathBuf::from("blog/hello/index.html"))
        );
        assert_eq!(
            Route::NotFound.output_path(&codec),
            Some(PathBuf::from("404.html"))
        );
    }

    #[test]
    fn test_unsafe_segments_are_skipped() {
        let codec = PercentCodec;
        assert!(Route::tag("CI/CD", &codec).output_path(&codec).is_none());
        assert!(Route::tag("..", &codec).output_path(&codec).is_none());
        assert!(Route::Category("%FF".into()).output_path(&codec).is_none());
    }

    #[test]
    fn test_resolve_round_trip() {
        let codec = PercentCodec;
        let posts = vec![
            post("a", "웹 개발", &["React", "C#"]),
            post("b", "AI", &["딥러닝"]),
        ];
        for route in site_routes(&posts, &codec) {
            let resolved = Route::resolve(&route.path(), &codec).unwrap();
            assert_eq!(resolved.route, route);
        }

        let resolved = Route::resolve("/tags/%EB%94%A5%EB%9F%AC%EB%8B%9D/", &codec).unwrap();
        assert_eq!(resolved.name.as_deref(), Some("딥러닝"));
    }

    #[test]
    fn test_resolve_not_found() {
        let codec = PercentCodec;
        assert!(Route::resolve("/categories/%FF", &codec).is_none());
        assert!(Route::resolve("/blog/a/b", &codec).is_none());
        assert!(Route::resolve("/unknown", &codec).is_none());
        assert_eq!(
            Route::resolve("/blog/index.html", &codec).unwrap().route,
            Route::BlogIndex
        );
    }

    #[test]
    fn test_site_routes() {
        let codec = PercentCodec;
        let posts = vec![
            post("a", "웹 개발", &["React"]),
            post("b", "웹 개발", &["react", "CSS"]),
        ];
        let routes = site_routes(&posts, &codec);

        assert_eq!(routes.first(), Some(&Route::Home));
        assert_eq!(routes.last(), Some(&Route::NotFound));
        assert!(routes.contains(&Route::Post("b".into())));
        let tags: Vec<&Route> = routes.iter().filter(|r| matches!(r, Route::Tag(_))).collect();
        assert_eq!(tags, vec![&Route::tag("React", &codec), &Route::tag("CSS", &codec)]);
        assert!(routes.iter().all(|r| r.output_path(&codec).is_some()));
        let categories = routes
            .iter()
            .filter(|r| matches!(r, Route::Category(_)))
            .count();
        assert_eq!(categories, 1);
    }

    #[test]
    fn test_taxonomy_routes_resolve_every_spelling() {
        let codec = PercentCodec;
        let posts = vec![
            post("a", "AI", &["React", "CI/CD"]),
            post("b", "ai", &["react"]),
        ];
        let routes = TaxonomyRoutes::new(&posts, &codec);

        assert_eq!(routes.category("ai"), Some(&Route::category("AI", &codec)));
        assert_eq!(routes.tag("react"), Some(&Route::tag("React", &codec)));
        assert_eq!(routes.tag("REACT"), routes.tag("React"));
        assert!(routes.tag("CI/CD").is_none());
        assert!(routes.tag("Vue").is_none());
        assert_eq!(routes.categories().len(), 1);
        assert_eq!(routes.tags(), &[Route::tag("React", &codec)]);

        // every link target has a page
        let pages = routes.site_routes(&posts);
        for post in &posts {
            assert!(pages.contains(routes.category(&post.category).unwrap()));
            for tag in post.tags.iter().filter_map(|t| routes.tag(t)) {
                assert!(pages.contains(tag));
                assert!(tag.output_path(&codec).is_some());
            }
        }
    }
}

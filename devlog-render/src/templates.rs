//! Askama template definitions.
//!
//! Every page extends `base.html`, which reads `chrome`, `t`, `page_title`
//! and `description` from the page struct.

use crate::view::{CategoryLink, Chrome, I18n, PostCard, TagLink};
use askama::Template;
use devlog_core::MessageKey;

/// Home page: hero, featured posts and the most recent posts
#[derive(Template)]
#[template(path = "home.html")]
pub struct HomeTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,

    pub featured: Vec<PostCard>,
    pub recent: Vec<PostCard>,
    pub categories: Vec<CategoryLink>,
}

/// Blog index: every post plus category and popular-tag sidebars
#[derive(Template)]
#[template(path = "blog.html")]
pub struct BlogTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,

    pub posts: Vec<PostCard>,
    pub categories: Vec<CategoryLink>,
    pub popular_tags: Vec<TagLink>,
}

/// Article page
#[derive(Template)]
#[template(path = "post.html")]
pub struct PostTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,

    pub post: PostCard,

    /// Rendered article body (trusted HTML)
    pub content: String,
}

#[derive(Template)]
#[template(path = "categories.html")]
pub struct CategoriesTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,

    pub categories: Vec<CategoryLink>,
}

/// One category: stats, featured and regular sections, other categories
#[derive(Template)]
#[template(path = "category.html")]
pub struct CategoryTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,

    pub category: CategoryLink,
    pub featured: Vec<PostCard>,
    pub regular: Vec<PostCard>,
    pub others: Vec<CategoryLink>,
}

#[derive(Template)]
#[template(path = "tags.html")]
pub struct TagsTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,

    pub popular: Vec<TagLink>,
    pub regular: Vec<TagLink>,
    pub total_tags: usize,
    pub total_posts: usize,
    pub avg_posts_per_tag: String,
}

/// One tag: stats, featured and regular sections, related tags
#[derive(Template)]
#[template(path = "tag.html")]
pub struct TagTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,

    pub tag: TagLink,
    pub featured_count: usize,
    pub featured: Vec<PostCard>,
    pub regular: Vec<PostCard>,
    pub related: Vec<TagLink>,
}

/// Search page; filtering runs client-side over the rendered cards
#[derive(Template)]
#[template(path = "search.html")]
pub struct SearchTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,

    pub posts: Vec<PostCard>,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
}

#[derive(Template)]
#[template(path = "about.html")]
pub struct AboutTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,
}

#[derive(Template)]
#[template(path = "contact.html")]
pub struct ContactTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,
}

/// 404 error page template
#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate<'a> {
    pub chrome: &'a Chrome,
    pub t: I18n<'a>,
    pub page_title: String,
    pub description: String,
}

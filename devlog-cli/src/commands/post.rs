//! Fetch a single post in structured form.

use crate::{agent, PostFormat};
use anyhow::{Context, Result};
use devlog_core::{models::Frontmatter, CmarkRenderer, Config, MarkdownRenderer, PostRepository};
use std::path::Path;

/// Fetch a single post and print it in the requested format.
pub fn show_post(config_path: &Path, slug: &str, format: PostFormat) -> Result<()> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let repository = PostRepository::new(config.posts_dir());

    let slug = normalize_slugish(slug);
    let post = repository
        .load_post(slug)
        .with_context(|| format!("Post '{}' not found", slug))?;

    match format {
        PostFormat::Json => {
            let html = CmarkRenderer::new()
                .render(&post.content)
                .with_context(|| format!("Failed to render '{}'", slug))?;
            let payload = agent::envelope(
                "post.full",
                agent::PostData {
                    post: &post,
                    url: post.url_with_base(&config.normalized_base_url()),
                    content_html: Some(&html),
                },
            );
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        PostFormat::Markdown => {
            let frontmatter = Frontmatter {
                title: post.title.clone(),
                excerpt: post.excerpt.clone(),
                date: post.iso_date(),
                author: post.author.clone(),
                category: post.category.clone(),
                tags: post.tags.clone(),
                featured: post.featured,
            };
            let fm = serde_yaml::to_string(&frontmatter)?;
            println!("---\n{}---\n{}", fm, post.content);
        }
        PostFormat::Html => {
            let html = CmarkRenderer::new()
                .render(&post.content)
                .with_context(|| format!("Failed to render '{}'", slug))?;
            println!("{html}");
        }
    }

    Ok(())
}

/// Accept `hello`, `/blog/hello/` or `hello.md`
fn normalize_slugish(s: &str) -> &str {
    let trimmed = s.trim().trim_matches('/');
    let trimmed = trimmed.strip_prefix("blog/").unwrap_or(trimmed);
    trimmed.strip_suffix(".md").unwrap_or(trimmed)
}

//! CLI command implementations.

pub mod build;
pub mod init;
pub mod post;
pub mod routes;
pub mod search;
pub mod taxonomy;

pub use build::build_site;
pub use init::init_project;
pub use post::show_post;
pub use routes::list_routes;
pub use search::{search_site, SearchOptions};
pub use taxonomy::{list_categories, list_tags, show_category, show_tag};

use anyhow::{Context, Result};
use devlog_core::{Config, Post, PostRepository};
use std::path::Path;

/// Load the config and every readable post, newest first
pub(crate) fn load_posts(config_path: &Path) -> Result<(Config, Vec<Post>)> {
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    let posts = PostRepository::new(config.posts_dir()).list_all_posts();
    tracing::debug!("Loaded {} posts from {:?}", posts.len(), config.posts_dir());
    Ok((config, posts))
}

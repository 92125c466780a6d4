//! Site building logic - loads posts, renders bodies, collects diagnostics.

use crate::{
    config::Config,
    i18n::{DirMessages, EmbeddedMessages, I18nError, MessageSource, TranslationCache},
    markdown::{CmarkRenderer, MarkdownRenderer},
    models::{Diagnostic, DiagnosticSeverity, SiteIndex},
    repository::{sort_by_date_desc, PostRepository},
};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Posts directory {0:?} does not exist")]
    MissingPostsDir(PathBuf),

    #[error("Locale messages are invalid: {0}")]
    Messages(#[from] I18nError),
}

/// Locale resources chosen by configuration
pub type SiteMessages = TranslationCache<Box<dyn MessageSource + Send + Sync>>;

/// Main site builder
pub struct SiteBuilder<R: MarkdownRenderer = CmarkRenderer> {
    config: Config,
    repository: PostRepository,
    renderer: R,
}

impl SiteBuilder<CmarkRenderer> {
    pub fn new(config: Config) -> Self {
        Self::with_renderer(config, CmarkRenderer::new())
    }
}

impl<R: MarkdownRenderer> SiteBuilder<R> {
    pub fn with_renderer(config: Config, renderer: R) -> Self {
        let repository = PostRepository::new(config.posts_dir());
        Self {
            config,
            repository,
            renderer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> &PostRepository {
        &self.repository
    }

    /// Message catalogs from `paths.messages`, or the embedded resources
    pub fn messages(&self) -> SiteMessages {
        let source: Box<dyn MessageSource + Send + Sync> = match self.config.messages_dir() {
            Some(dir) => Box::new(DirMessages::new(dir)),
            None => Box::new(EmbeddedMessages),
        };
        TranslationCache::new(source)
    }

    /// Build the site index.
    ///
    /// Fails only for site-wide problems. A post that cannot be parsed or
    /// rendered becomes a diagnostic and the rest of the site still builds.
    pub fn build(&self) -> Result<SiteIndex, BuildError> {
        self.messages().validate_all()?;

        let posts_dir = self.repository.dir();
        if !posts_dir.is_dir() {
            return Err(BuildError::MissingPostsDir(posts_dir.to_path_buf()));
        }

        let slugs = self.repository.list_slugs();
        tracing::info!("Found {} markdown files", slugs.len());

        let mut posts = Vec::with_capacity(slugs.len());
        let mut diagnostics = Vec::new();

        for slug in &slugs {
            match self.repository.load_post(slug) {
                Ok(post) => posts.push(post),
                Err(e) => {
                    tracing::warn!("Skipping post {}: {}", slug, e);
                    diagnostics.push(Diagnostic {
                        code: "post.invalid".to_string(),
                        message: e.to_string(),
                        severity: DiagnosticSeverity::Warning,
                        post_slug: Some(slug.clone()),
                    });
                }
            }
        }
        sort_by_date_desc(&mut posts);

        let mut rendered = HashMap::with_capacity(posts.len());
        for post in &posts {
            match self.renderer.render(&post.content) {
                Ok(html) => {
                    tracing::debug!("Rendered {} ({} bytes)", post.slug, html.len());
                    rendered.insert(post.slug.clone(), html);
                }
                Err(e) => {
                    tracing::error!("Failed to render {}: {}", post.slug, e);
                    diagnostics.push(Diagnostic {
                        code: "render.failed".to_string(),
                        message: e.to_string(),
                        severity: DiagnosticSeverity::Error,
                        post_slug: Some(post.slug.clone()),
                    });
                }
            }
        }

        tracing::info!("Built site index with {} posts", posts.len());

        Ok(SiteIndex {
            posts,
            rendered,
            diagnostics,
        })
    }
}

//! Build command implementation.

use anyhow::{Context, Result};
use askama::Template;
use chrono::Datelike;
use devlog_core::{
    taxonomy::POPULAR_TAG_MIN_POSTS, ClientSearchIndex, Config, Diagnostic, DiagnosticSeverity,
    Locale, MessageKey, MessageSource, PercentCodec, Route, SiteBuilder, SiteIndex, SiteMessages,
    SlugCodec, Taxonomy, TaxonomyKind, TaxonomyRoutes,
};
use devlog_render::{
    AboutTemplate, BlogTemplate, CategoriesTemplate, CategoryLink, CategoryTemplate, Chrome,
    ContactTemplate, HomeTemplate, I18n, Links, NotFoundTemplate, PostCard, PostTemplate,
    SearchTemplate, TagLink, TagTemplate, TagsTemplate,
};
use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;

// Embed static assets (CSS, JS) at compile time so they're available after cargo install
static STATIC_ASSETS: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/../static");

/// Number of sibling categories linked from a category page
const OTHER_CATEGORIES: usize = 6;

/// Number of co-occurring tags linked from a tag page
const RELATED_TAGS: usize = 6;

/// Build the static site
pub fn build_site(config_path: &Path) -> Result<()> {
    tracing::info!("Loading config from {:?}", config_path);
    let config = Config::from_file(config_path).context("Failed to load configuration")?;
    build_site_with_config(&config).map(|_| ())
}

/// Build the site from an already loaded config, writing output and returning the index.
pub fn build_site_with_config(config: &Config) -> Result<SiteIndex> {
    tracing::info!("Building site: {}", config.site.title);

    let builder = SiteBuilder::new(config.clone());
    let site_index = builder.build().context("Failed to build site")?;
    let messages = builder.messages();

    tracing::info!("Parsed {} posts", site_index.posts.len());

    let output_dir = config.output_dir();
    fs::create_dir_all(&output_dir).context("Failed to create output directory")?;

    let chrome = Chrome::new(config, chrono::Utc::now().year());
    let taxonomy_routes = TaxonomyRoutes::new(&site_index.posts, &PercentCodec);
    let routes = taxonomy_routes.site_routes(&site_index.posts);
    let site = SiteWriter {
        config,
        index: &site_index,
        taxonomy: Taxonomy::new(&site_index.posts),
        chrome: &chrome,
        links: Links::new(&chrome.base_url, &taxonomy_routes),
        i18n: I18n::new(messages.catalog(config.default_locale)),
        codec: PercentCodec,
        output_dir: &output_dir,
    };

    let mut pages = 0;
    for route in &routes {
        if site.write_route(route)? {
            pages += 1;
        }
    }

    generate_search_index(config, &site_index)?;
    write_messages(&output_dir, &messages)?;
    copy_assets(&output_dir)?;

    if config.enable_sitemap {
        generate_sitemap(config, &site_index, &routes)?;
    } else {
        tracing::info!("Sitemap disabled; skipping sitemap.xml");
    }

    if let Some(summary) = diagnostics_summary(&site_index.diagnostics) {
        tracing::warn!("{}", summary);
    }

    tracing::info!("✓ Built {} pages", pages);
    tracing::info!("✓ Output written to {:?}", output_dir);

    Ok(site_index)
}

/// Everything needed to render one route to disk
struct SiteWriter<'a> {
    config: &'a Config,
    index: &'a SiteIndex,
    taxonomy: Taxonomy<'a>,
    chrome: &'a Chrome,
    links: Links<'a>,
    i18n: I18n<'a>,
    codec: PercentCodec,
    output_dir: &'a Path,
}

impl SiteWriter<'_> {
    /// Render and write one route; `false` when the page was skipped
    fn write_route(&self, route: &Route) -> Result<bool> {
        let Some(rel_path) = route.output_path(&self.codec) else {
            tracing::warn!("Skipping {}: not a servable path", route.path());
            return Ok(false);
        };

        let Some(html) = self.render_route(route)? else {
            return Ok(false);
        };

        let target = self.output_dir.join(&rel_path);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {:?}", parent))?;
        }
        fs::write(&target, html).with_context(|| format!("Failed to write {:?}", target))?;

        tracing::debug!("Rendered: {}", route.path());
        Ok(true)
    }

    fn render_route(&self, route: &Route) -> Result<Option<String>> {
        let html = match route {
            Route::Home => self.render_home()?,
            Route::BlogIndex => self.render_blog()?,
            Route::Post(slug) => return self.render_post(slug),
            Route::CategoriesIndex => self.render_categories()?,
            Route::Category(slug) => {
                let name = self.codec.from_slug(TaxonomyKind::Category, slug)?;
                return self.render_category(&name);
            }
            Route::TagsIndex => self.render_tags()?,
            Route::Tag(slug) => {
                let name = self.codec.from_slug(TaxonomyKind::Tag, slug)?;
                return self.render_tag(&name);
            }
            Route::Search => self.render_search()?,
            Route::About => AboutTemplate {
                chrome: self.chrome,
                t: self.i18n,
                page_title: self.i18n.text(MessageKey::AboutTitle).to_string(),
                description: self.i18n.text(MessageKey::AboutDescription).to_string(),
            }
            .render()
            .context("Failed to render about template")?,
            Route::Contact => ContactTemplate {
                chrome: self.chrome,
                t: self.i18n,
                page_title: self.i18n.text(MessageKey::ContactTitle).to_string(),
                description: self.i18n.text(MessageKey::ContactDescription).to_string(),
            }
            .render()
            .context("Failed to render contact template")?,
            Route::NotFound => NotFoundTemplate {
                chrome: self.chrome,
                t: self.i18n,
                page_title: self.i18n.text(MessageKey::CommonNotFound).to_string(),
                description: self.i18n.text(MessageKey::CommonNotFoundDescription).to_string(),
            }
            .render()
            .context("Failed to render 404 template")?,
        };
        Ok(Some(html))
    }

    fn category_links(&self) -> Vec<CategoryLink> {
        self.taxonomy
            .categories_by_count()
            .iter()
            .map(|stats| CategoryLink::from_stats(stats, &self.links))
            .collect()
    }

    fn render_home(&self) -> Result<String> {
        let links = &self.links;
        HomeTemplate {
            chrome: self.chrome,
            t: self.i18n,
            page_title: self.config.site.title.clone(),
            description: self.config.site.description.clone(),
            featured: PostCard::many(self.index.featured(), links),
            recent: PostCard::many(self.index.recent(self.config.recent_posts), links),
            categories: self.category_links(),
        }
        .render()
        .context("Failed to render home template")
    }

    fn render_blog(&self) -> Result<String> {
        let links = &self.links;
        BlogTemplate {
            chrome: self.chrome,
            t: self.i18n,
            page_title: self.i18n.text(MessageKey::BlogTitle).to_string(),
            description: self.i18n.text(MessageKey::BlogDescription).to_string(),
            posts: PostCard::many(&self.index.posts, links),
            categories: self.category_links(),
            popular_tags: self
                .taxonomy
                .popular_tags(POPULAR_TAG_MIN_POSTS)
                .iter()
                .map(|stats| TagLink::from_stats(stats, links))
                .collect(),
        }
        .render()
        .context("Failed to render blog template")
    }

    fn render_post(&self, slug: &str) -> Result<Option<String>> {
        let Some(post) = self.index.find_by_slug(slug) else {
            return Ok(None);
        };
        let Some(content) = self.index.html_for(slug) else {
            tracing::warn!("Skipping page for {}: body failed to render", slug);
            return Ok(None);
        };

        let html = PostTemplate {
            chrome: self.chrome,
            t: self.i18n,
            page_title: post.title.clone(),
            description: post.excerpt.clone(),
            post: PostCard::new(post, &self.links),
            content: content.to_string(),
        }
        .render()
        .with_context(|| format!("Failed to render post template for {}", slug))?;
        Ok(Some(html))
    }

    fn render_categories(&self) -> Result<String> {
        CategoriesTemplate {
            chrome: self.chrome,
            t: self.i18n,
            page_title: self.i18n.text(MessageKey::CategoriesTitle).to_string(),
            description: self.i18n.text(MessageKey::CategoriesDescription).to_string(),
            categories: self.category_links(),
        }
        .render()
        .context("Failed to render categories template")
    }

    fn render_category(&self, name: &str) -> Result<Option<String>> {
        let links = &self.links;
        let (Some(stats), Some(listing)) = (
            self.taxonomy.category_stats(name),
            self.taxonomy.category_listing(name),
        ) else {
            return Ok(None);
        };

        let others = self
            .taxonomy
            .categories_by_count()
            .iter()
            .filter(|other| other.name.to_lowercase() != stats.name.to_lowercase())
            .take(OTHER_CATEGORIES)
            .map(|other| CategoryLink::from_stats(other, links))
            .collect();

        let html = CategoryTemplate {
            chrome: self.chrome,
            t: self.i18n,
            page_title: stats.name.clone(),
            description: format!(
                "{} {}",
                stats.count,
                self.i18n.text(MessageKey::CommonArticles)
            ),
            category: CategoryLink::from_stats(&stats, links),
            featured: PostCard::many(listing.featured.iter().copied(), links),
            regular: PostCard::many(listing.regular.iter().copied(), links),
            others,
        }
        .render()
        .with_context(|| format!("Failed to render category page for {}", name))?;
        Ok(Some(html))
    }

    fn render_tags(&self) -> Result<String> {
        let links = |stats: Vec<devlog_core::TagStats>| -> Vec<TagLink> {
            stats
                .iter()
                .map(|s| TagLink::from_stats(s, &self.links))
                .collect()
        };

        TagsTemplate {
            chrome: self.chrome,
            t: self.i18n,
            page_title: self.i18n.text(MessageKey::TagsTitle).to_string(),
            description: self.i18n.text(MessageKey::TagsDescription).to_string(),
            popular: links(self.taxonomy.popular_tags(POPULAR_TAG_MIN_POSTS)),
            regular: links(self.taxonomy.regular_tags(POPULAR_TAG_MIN_POSTS)),
            total_tags: self.taxonomy.tags_by_count().len(),
            total_posts: self.index.posts.len(),
            avg_posts_per_tag: format!("{:.1}", self.taxonomy.average_posts_per_tag()),
        }
        .render()
        .context("Failed to render tags template")
    }

    fn render_tag(&self, name: &str) -> Result<Option<String>> {
        let links = &self.links;
        let (Some(stats), Some(listing)) = (
            self.taxonomy.tag_stats(name),
            self.taxonomy.tag_listing(name),
        ) else {
            return Ok(None);
        };

        let related = self
            .taxonomy
            .related_tags(&stats.name, RELATED_TAGS)
            .iter()
            .filter_map(|t| self.taxonomy.tag_stats(t))
            .map(|s| TagLink::from_stats(&s, links))
            .collect();

        let html = TagTemplate {
            chrome: self.chrome,
            t: self.i18n,
            page_title: format!("#{}", stats.name),
            description: format!(
                "{} {}",
                stats.count,
                self.i18n.text(MessageKey::CommonArticles)
            ),
            tag: TagLink::from_stats(&stats, links),
            featured_count: stats.featured_count,
            featured: PostCard::many(listing.featured.iter().copied(), links),
            regular: PostCard::many(listing.regular.iter().copied(), links),
            related,
        }
        .render()
        .with_context(|| format!("Failed to render tag page for {}", name))?;
        Ok(Some(html))
    }

    fn render_search(&self) -> Result<String> {
        SearchTemplate {
            chrome: self.chrome,
            t: self.i18n,
            page_title: self.i18n.text(MessageKey::SearchTitle).to_string(),
            description: self.i18n.text(MessageKey::SearchDescription).to_string(),
            posts: PostCard::many(&self.index.posts, &self.links),
            categories: self
                .taxonomy
                .categories_by_count()
                .into_iter()
                .map(|c| c.name)
                .collect(),
            tags: self
                .taxonomy
                .tags_by_count()
                .into_iter()
                .map(|t| t.name)
                .collect(),
        }
        .render()
        .context("Failed to render search template")
    }
}

/// Generate search-index.json for the client-side search page
fn generate_search_index(config: &Config, site_index: &SiteIndex) -> Result<()> {
    let index = ClientSearchIndex::new(
        &site_index.posts,
        &config.normalized_base_url(),
        config.search.threshold,
    );
    let json = serde_json::to_string_pretty(&index)?;
    fs::write(config.output_dir().join("search-index.json"), json)
        .context("Failed to write search-index.json")?;
    tracing::info!(
        "Generated search-index.json ({} documents)",
        index.documents.len()
    );
    Ok(())
}

/// Copy the raw locale resources so the client script can switch languages
fn write_messages(output_dir: &Path, messages: &SiteMessages) -> Result<()> {
    let dir = output_dir.join("messages");
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create {:?}", dir))?;

    for locale in Locale::ALL {
        let json = messages
            .source()
            .load(locale)
            .with_context(|| format!("Failed to load messages for '{}'", locale))?;
        fs::write(dir.join(locale.file_name()), json)
            .with_context(|| format!("Failed to write messages for '{}'", locale))?;
    }
    Ok(())
}

/// Write embedded CSS/JS plus the generated highlight stylesheet
fn copy_assets(output_dir: &Path) -> Result<()> {
    for entry in STATIC_ASSETS.entries() {
        extract_entry(entry, output_dir)?;
    }

    let css_dir = output_dir.join("css");
    fs::create_dir_all(&css_dir).with_context(|| format!("Failed to create {:?}", css_dir))?;
    fs::write(
        css_dir.join("highlight.css"),
        devlog_core::markdown::highlight_css(),
    )
    .context("Failed to write highlight.css")?;

    tracing::debug!("Copied static assets");
    Ok(())
}

fn extract_entry(entry: &include_dir::DirEntry, dest: &Path) -> Result<()> {
    match entry {
        include_dir::DirEntry::Dir(dir) => {
            for sub_entry in dir.entries() {
                extract_entry(sub_entry, dest)?;
            }
        }
        include_dir::DirEntry::File(file) => {
            let target = dest.join(file.path());
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, file.contents())
                .with_context(|| format!("Failed to write embedded static file to {:?}", target))?;
        }
    }
    Ok(())
}

/// Generate sitemap.xml from the routes the build wrote
fn generate_sitemap(config: &Config, site_index: &SiteIndex, routes: &[Route]) -> Result<()> {
    let base_url = config.normalized_base_url();
    let mut urls = String::new();

    for route in routes {
        let lastmod = match route {
            Route::NotFound => continue,
            Route::Post(slug) if site_index.html_for(slug).is_none() => continue,
            Route::Post(slug) => site_index.find_by_slug(slug).map(|p| p.iso_date()),
            _ => None,
        };

        let loc = absolute_url(&config.site.url, &route.url(&base_url));
        urls.push_str("<url>");
        urls.push_str(&format!("<loc>{}</loc>", escape_xml(&loc)));
        if let Some(date) = lastmod {
            urls.push_str(&format!("<lastmod>{}</lastmod>", date));
        }
        urls.push_str("</url>");
    }

    let xml = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>
"#,
        urls
    );

    fs::write(config.output_dir().join("sitemap.xml"), xml)?;
    tracing::info!("Generated sitemap.xml");
    Ok(())
}

/// Tally of the problems `SiteBuilder` already logged one by one
fn diagnostics_summary(diagnostics: &[Diagnostic]) -> Option<String> {
    if diagnostics.is_empty() {
        return None;
    }
    let errors = diagnostics
        .iter()
        .filter(|d| d.severity == DiagnosticSeverity::Error)
        .count();
    Some(format!(
        "{} post(s) had problems ({} failed to render, {} skipped)",
        diagnostics.len(),
        errors,
        diagnostics.len() - errors
    ))
}

/// Join the absolute site URL with a base-prefixed path
fn absolute_url(site_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

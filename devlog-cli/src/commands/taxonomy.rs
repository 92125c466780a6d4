//! Category and tag listings.

use crate::agent;
use anyhow::{bail, Result};
use devlog_core::{Listing, PercentCodec, Taxonomy, TaxonomyRoutes};
use std::path::Path;

/// List categories, most posts first
pub fn list_categories(config_path: &Path, json: bool) -> Result<()> {
    let (_config, posts) = super::load_posts(config_path)?;
    let stats = Taxonomy::new(&posts).categories_by_count();

    if json {
        let payload = agent::envelope("categories.list", agent::CategoriesData::new(stats));
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if stats.is_empty() {
        println!("No categories yet");
        return Ok(());
    }
    for category in &stats {
        let latest = category
            .most_recent_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{:<24} {:>3} posts  {:>2} featured  {}",
            category.name, category.count, category.featured_count, latest
        );
    }
    Ok(())
}

/// List tags, most posts first
pub fn list_tags(config_path: &Path, json: bool) -> Result<()> {
    let (_config, posts) = super::load_posts(config_path)?;
    let stats = Taxonomy::new(&posts).tags_by_count();

    if json {
        let payload = agent::envelope("tags.list", agent::TagsData::new(stats));
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if stats.is_empty() {
        println!("No tags yet");
        return Ok(());
    }
    for tag in &stats {
        println!("#{:<23} {:>3} posts", tag.name, tag.count);
    }
    Ok(())
}

/// Show one category; an unknown name is an error
pub fn show_category(config_path: &Path, name: &str, json: bool) -> Result<()> {
    let (config, posts) = super::load_posts(config_path)?;
    let taxonomy = Taxonomy::new(&posts);

    let (Some(stats), Some(listing)) =
        (taxonomy.category_stats(name), taxonomy.category_listing(name))
    else {
        bail!("Category '{}' not found", name);
    };
    let url = TaxonomyRoutes::new(&posts, &PercentCodec)
        .category(&stats.name)
        .map(|route| route.url(&config.normalized_base_url()));

    if json {
        let payload = agent::envelope(
            "category.detail",
            agent::TaxonomyDetail::new(stats, url, &listing),
        );
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "{} ({} posts, {} featured)\n  {}\n",
        stats.name,
        stats.count,
        stats.featured_count,
        url.as_deref().unwrap_or("(no page)")
    );
    print_listing(&listing);
    Ok(())
}

/// Show one tag; an unknown name is an error
pub fn show_tag(config_path: &Path, name: &str, json: bool) -> Result<()> {
    let (config, posts) = super::load_posts(config_path)?;
    let taxonomy = Taxonomy::new(&posts);

    let (Some(stats), Some(listing)) = (taxonomy.tag_stats(name), taxonomy.tag_listing(name))
    else {
        bail!("Tag '{}' not found", name);
    };
    let url = TaxonomyRoutes::new(&posts, &PercentCodec)
        .tag(&stats.name)
        .map(|route| route.url(&config.normalized_base_url()));

    if json {
        let payload = agent::envelope(
            "tag.detail",
            agent::TaxonomyDetail::new(stats, url, &listing),
        );
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!(
        "#{} ({} posts, {} featured)\n  {}\n",
        stats.name,
        stats.count,
        stats.featured_count,
        url.as_deref().unwrap_or("(no page)")
    );
    print_listing(&listing);
    Ok(())
}

fn print_listing(listing: &Listing<'_>) {
    for post in listing.all() {
        let marker = if post.featured { "*" } else { " " };
        println!("{} {}  {}  ({})", marker, post.iso_date(), post.title, post.slug);
    }
}

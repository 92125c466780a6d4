//! Search command implementation

use crate::agent;
use anyhow::Result;
use devlog_core::{SearchEngine, SearchQuery};
use std::path::Path;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub limit: usize,
    pub json: bool,
}

/// Fuzzy-search the posts on disk
pub fn search_site(config_path: &Path, query: &str, opts: SearchOptions) -> Result<()> {
    let (config, posts) = super::load_posts(config_path)?;
    let base_url = config.normalized_base_url();

    let engine = SearchEngine::new(&posts, config.search.threshold);
    let search_query = SearchQuery {
        query: query.to_string(),
        category: opts.category.clone(),
        tags: opts
            .tags
            .iter()
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect(),
    };
    let results = engine.run_scored(&search_query);

    if opts.json {
        let payload = agent::envelope(
            "search.results",
            agent::SearchData {
                query: query.to_string(),
                category: search_query.category.clone(),
                tags: search_query.tags.clone(),
                limit: opts.limit,
                total: results.len(),
                results: results
                    .iter()
                    .take(opts.limit)
                    .map(|(post, score)| agent::SearchResult::new(post, *score, &base_url))
                    .collect(),
            },
        );
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if results.is_empty() {
        println!("No results found for '{}'", query);
        return Ok(());
    }

    println!("\n🔍 Found {} results for '{}':\n", results.len(), query);
    for (post, _score) in results.iter().take(opts.limit) {
        println!("[{}] {}", post.category, post.title);
        println!("  {}", post.url_with_base(&base_url));
        println!("  {} · {}", post.iso_date(), post.excerpt);
        if !post.tags.is_empty() {
            println!("  #{}", post.tags.join(" #"));
        }
        println!();
    }

    if results.len() > opts.limit {
        println!("  ... and {} more results", results.len() - opts.limit);
    }

    Ok(())
}

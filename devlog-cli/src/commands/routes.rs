//! Route table listing.

use crate::agent;
use anyhow::Result;
use devlog_core::{site_routes, PercentCodec};
use std::path::Path;

/// Print every route `devlog build` generates, with its output file
pub fn list_routes(config_path: &Path, json: bool) -> Result<()> {
    let (_config, posts) = super::load_posts(config_path)?;
    let codec = PercentCodec;

    let entries: Vec<agent::RouteEntry> = site_routes(&posts, &codec)
        .iter()
        .map(|route| {
            let output = route
                .output_path(&codec)
                .map(|p| p.to_string_lossy().replace('\\', "/"));
            agent::RouteEntry::new(route, output)
        })
        .collect();

    if json {
        let payload = agent::envelope("routes.list", entries);
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    for entry in &entries {
        let output = entry.output.as_deref().unwrap_or("(skipped)");
        println!("{:<40} {}", entry.path, output);
    }
    Ok(())
}

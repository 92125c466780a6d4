//! # devlog CLI
//!
//! Command-line interface for the devlog static blog generator.

mod agent;
mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "devlog")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "devlog.yml", env = "DEVLOG_CONFIG")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new devlog project
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Build the static site
    Build,

    /// Fuzzy-search posts by title, excerpt, content and tags
    Search {
        /// Search query (may be empty when filtering only)
        query: String,

        /// Only posts in this category
        #[arg(long)]
        category: Option<String>,

        /// Only posts carrying any of these tags (comma separated)
        #[arg(long, value_delimiter = ',')]
        tags: Vec<String>,

        /// Maximum results to return
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// Return JSON for machine consumption
        #[arg(long)]
        json: bool,
    },

    /// Fetch a single post
    Post {
        /// Post slug (file name without `.md`)
        slug: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = PostFormat::Json)]
        format: PostFormat,
    },

    /// List categories by post count, or the posts of one category
    Categories {
        /// Category to show (case-insensitive)
        name: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List tags by post count, or the posts of one tag
    Tags {
        /// Tag to show (case-insensitive)
        name: Option<String>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List every route the build generates
    Routes {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[derive(Copy, Clone, ValueEnum)]
pub enum PostFormat {
    Json,
    Markdown,
    Html,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build => commands::build_site(&cli.config),
        Commands::Search {
            query,
            category,
            tags,
            limit,
            json,
        } => {
            let opts = commands::SearchOptions {
                category,
                tags,
                limit,
                json,
            };
            commands::search_site(&cli.config, &query, opts)
        }
        Commands::Post { slug, format } => commands::show_post(&cli.config, &slug, format),
        Commands::Categories { name, json } => match name {
            Some(name) => commands::show_category(&cli.config, &name, json),
            None => commands::list_categories(&cli.config, json),
        },
        Commands::Tags { name, json } => match name {
            Some(name) => commands::show_tag(&cli.config, &name, json),
            None => commands::list_tags(&cli.config, json),
        },
        Commands::Routes { json } => commands::list_routes(&cli.config, json),
    }
}

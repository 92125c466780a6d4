//! Configuration parsing and management.

use crate::i18n::Locale;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    ParseError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration struct matching the devlog.yml schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub site: SiteConfig,

    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub default_locale: Locale,

    /// Number of posts in the home page "recent" section
    #[serde(default = "default_recent_posts")]
    pub recent_posts: usize,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default = "default_true")]
    pub enable_sitemap: bool,

    // Internal: path to config file (for relative path resolution)
    #[serde(skip)]
    config_path: Option<PathBuf>,
}

fn default_base_url() -> String {
    String::from("/")
}

fn default_recent_posts() -> usize {
    5
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    pub author: String,
    pub description: String,
    pub url: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub github: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_posts_dir")]
    pub posts: PathBuf,

    #[serde(default = "default_output_dir")]
    pub output: PathBuf,

    /// Directory with `ko.json` / `en.json` overriding the embedded messages
    #[serde(default)]
    pub messages: Option<PathBuf>,
}

fn default_posts_dir() -> PathBuf {
    PathBuf::from("posts")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("out")
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            posts: default_posts_dir(),
            output: default_output_dir(),
            messages: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Maximum field distance (0 = exact, 1 = anything) still counted as a match
    #[serde(default = "default_threshold")]
    pub threshold: f64,
}

fn default_threshold() -> f64 {
    crate::search::DEFAULT_THRESHOLD
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;

        // Store config file path for relative path resolution
        config.config_path = Some(path.to_path_buf());

        Ok(config)
    }

    /// Parse configuration from YAML text (paths resolve against the working directory)
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_yaml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.search.threshold) {
            return Err(ConfigError::Invalid(format!(
                "search.threshold must be within 0.0..=1.0, got {}",
                self.search.threshold
            )));
        }
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Invalid("site.title is empty".into()));
        }
        Ok(())
    }

    /// Get the posts directory, resolved relative to config file
    pub fn posts_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.posts)
    }

    /// Get the output directory, resolved relative to config file
    pub fn output_dir(&self) -> PathBuf {
        self.resolve_path(&self.paths.output)
    }

    /// Get the locale override directory (None means use the embedded messages)
    pub fn messages_dir(&self) -> Option<PathBuf> {
        self.paths.messages.as_ref().map(|p| self.resolve_path(p))
    }

    /// Resolve a path relative to the config file location
    fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            return path.to_path_buf();
        }
        match self.config_path.as_ref().and_then(|p| p.parent()) {
            Some(parent) => parent.join(path),
            None => path.to_path_buf(),
        }
    }

    /// Normalized base URL with leading and trailing slash ("/foo/" or "/")
    pub fn normalized_base_url(&self) -> String {
        normalize_base_url(&self.base_url)
    }
}

/// Ensure base URLs have a leading and trailing slash
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim();
    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", segments.join("/"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
site:
  title: "Tech Blog"
  author: "Kim"
  description: "Notes on the web"
  url: "https://example.com"
"#;

    #[test]
    fn test_default_values() {
        let config = Config::from_yaml(MINIMAL).unwrap();

        assert_eq!(config.base_url, "/");
        assert_eq!(config.paths.posts, PathBuf::from("posts"));
        assert_eq!(config.paths.output, PathBuf::from("out"));
        assert_eq!(config.default_locale, Locale::Ko);
        assert_eq!(config.recent_posts, 5);
        assert!((config.search.threshold - 0.3).abs() < f64::EPSILON);
        assert!(config.enable_sitemap);
        assert!(config.messages_dir().is_none());
    }

    #[test]
    fn test_paths_resolve_relative_to_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devlog.yml");
        std::fs::write(&path, format!("{MINIMAL}paths:\n  posts: content\n")).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.posts_dir(), dir.path().join("content"));
        assert_eq!(config.output_dir(), dir.path().join("out"));
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let yaml = format!("{MINIMAL}search:\n  threshold: 1.5\n");
        assert!(matches!(
            Config::from_yaml(&yaml),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_english_locale() {
        let yaml = format!("{MINIMAL}default_locale: en\n");
        assert_eq!(Config::from_yaml(&yaml).unwrap().default_locale, Locale::En);
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(""), "/");
        assert_eq!(normalize_base_url("/"), "/");
        assert_eq!(normalize_base_url("blog"), "/blog/");
        assert_eq!(normalize_base_url("//blog//posts/"), "/blog/posts/");
    }
}

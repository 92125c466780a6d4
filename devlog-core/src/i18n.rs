//! Locale catalogs: typed message keys over nested JSON resources.
//!
//! Every string the generated pages show is named by a [`MessageKey`]. A
//! catalog is flattened from a `{ "navigation": { "home": "홈" } }` tree into
//! dotted paths, and the build refuses to run unless every key resolves in
//! every locale. Lookups that still miss echo the dotted path back.

use include_dir::{include_dir, Dir};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

static EMBEDDED_MESSAGES: Dir = include_dir!("$CARGO_MANIFEST_DIR/messages");

/// Client-side storage key holding the selected locale
pub const LOCALE_STORAGE_KEY: &str = "locale";

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("No message resource for locale '{0}'")]
    MissingResource(Locale),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in '{locale}' messages: {source}")]
    Parse {
        locale: Locale,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{locale}' messages must be a JSON object at the top level")]
    NotAnObject { locale: Locale },

    #[error("'{locale}' messages are missing {} key(s): {}", .keys.len(), .keys.join(", "))]
    MissingKeys {
        locale: Locale,
        keys: Vec<&'static str>,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Ko,
    En,
}

impl Locale {
    pub const ALL: [Locale; 2] = [Locale::Ko, Locale::En];

    pub fn code(&self) -> &'static str {
        match self {
            Locale::Ko => "ko",
            Locale::En => "en",
        }
    }

    /// File name of this locale's resource, e.g. `ko.json`
    pub fn file_name(&self) -> String {
        format!("{}.json", self.code())
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ko" => Ok(Locale::Ko),
            "en" => Ok(Locale::En),
            other => Err(format!("unsupported locale '{other}' (expected ko or en)")),
        }
    }
}

macro_rules! message_keys {
    ($($variant:ident => $path:literal,)*) => {
        /// Every translatable string shown by the generated site
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum MessageKey {
            $($variant,)*
        }

        impl MessageKey {
            pub const ALL: &'static [MessageKey] = &[$(MessageKey::$variant,)*];

            /// Dotted path into the locale resource
            pub fn path(&self) -> &'static str {
                match self {
                    $(MessageKey::$variant => $path,)*
                }
            }
        }
    };
}

message_keys! {
    NavigationHome => "navigation.home",
    NavigationBlog => "navigation.blog",
    NavigationCategories => "navigation.categories",
    NavigationTags => "navigation.tags",
    NavigationAbout => "navigation.about",
    NavigationContact => "navigation.contact",
    NavigationSearch => "navigation.search",
    NavigationMenuToggle => "navigation.menuToggle",

    CommonReadMore => "common.readMore",
    CommonBackTo => "common.backTo",
    CommonFeaturedPosts => "common.featuredPosts",
    CommonRecentPosts => "common.recentPosts",
    CommonAllPosts => "common.allPosts",
    CommonNoResults => "common.noResults",
    CommonCopy => "common.copy",
    CommonCopied => "common.copied",
    CommonMinRead => "common.minRead",
    CommonFeatured => "common.featured",
    CommonBy => "common.by",
    CommonArticles => "common.articles",
    CommonNotFound => "common.notFound",
    CommonNotFoundDescription => "common.notFoundDescription",

    HomepageTitle => "homepage.title",
    HomepageSubtitle => "homepage.subtitle",
    HomepageDescription => "homepage.description",
    HomepageExploreArticles => "homepage.exploreArticles",
    HomepageLearnMore => "homepage.learnMore",
    HomepageNoPosts => "homepage.noPosts",
    HomepageNoPostsDescription => "homepage.noPostsDescription",

    BlogTitle => "blog.title",
    BlogDescription => "blog.description",
    BlogAdvancedSearch => "blog.advancedSearch",
    BlogViewAllCategories => "blog.viewAllCategories",
    BlogPopularTags => "blog.popularTags",
    BlogViewAllTags => "blog.viewAllTags",

    SearchTitle => "search.title",
    SearchDescription => "search.description",
    SearchPlaceholder => "search.placeholder",
    SearchCategory => "search.category",
    SearchAllCategories => "search.allCategories",
    SearchTags => "search.tags",
    SearchClearFilters => "search.clearFilters",
    SearchFiltersActive => "search.filtersActive",
    SearchFound => "search.found",
    SearchNoArticlesFound => "search.noArticlesFound",
    SearchAdjustSearch => "search.adjustSearch",
    SearchStartSearching => "search.startSearching",
    SearchEnterSearchTerm => "search.enterSearchTerm",

    CategoriesTitle => "categories.title",
    CategoriesDescription => "categories.description",
    CategoriesViewArticles => "categories.viewArticles",
    CategoriesLatest => "categories.latest",
    CategoriesNoCategoriesYet => "categories.noCategoriesYet",
    CategoriesNoCategoriesDescription => "categories.noCategoriesDescription",
    CategoriesBackToCategories => "categories.backToCategories",
    CategoriesFeaturedArticles => "categories.featuredArticles",
    CategoriesMoreArticles => "categories.moreArticles",
    CategoriesAllArticles => "categories.allArticles",
    CategoriesExploreOtherCategories => "categories.exploreOtherCategories",

    TagsTitle => "tags.title",
    TagsDescription => "tags.description",
    TagsPopularTags => "tags.popularTags",
    TagsAllTags => "tags.allTags",
    TagsTotalTags => "tags.totalTags",
    TagsAvgPostsPerTag => "tags.avgPostsPerTag",
    TagsNoTagsYet => "tags.noTagsYet",
    TagsNoTagsDescription => "tags.noTagsDescription",
    TagsBackToTags => "tags.backToTags",
    TagsRelatedTags => "tags.relatedTags",
    TagsTagStatistics => "tags.tagStatistics",

    AboutTitle => "about.title",
    AboutDescription => "about.description",
    AboutOurMission => "about.ourMission",
    AboutMissionDescription1 => "about.missionDescription1",
    AboutMissionDescription2 => "about.missionDescription2",
    AboutWhatWeCover => "about.whatWeCover",
    AboutWebDevelopment => "about.webDevelopment",
    AboutWebDevDescription => "about.webDevDescription",
    AboutBestPractices => "about.bestPractices",
    AboutBestPracticesDescription => "about.bestPracticesDescription",
    AboutCareerGrowth => "about.careerGrowth",
    AboutCareerGrowthDescription => "about.careerGrowthDescription",

    ContactTitle => "contact.title",
    ContactDescription => "contact.description",
    ContactContactInfo => "contact.contactInfo",
    ContactEmail => "contact.email",
    ContactEmailDescription => "contact.emailDescription",
    ContactSocialMedia => "contact.socialMedia",
    ContactSocialDescription => "contact.socialDescription",
    ContactWhatCanWeHelp => "contact.whatCanWeHelp",
    ContactArticleSuggestions => "contact.articleSuggestions",
    ContactTechnicalQuestions => "contact.technicalQuestions",
    ContactCollaborationOpportunities => "contact.collaborationOpportunities",
    ContactGuestPostInquiries => "contact.guestPostInquiries",
    ContactResponseTime => "contact.responseTime",

    FooterDescription => "footer.description",
    FooterQuickLinks => "footer.quickLinks",
    FooterConnect => "footer.connect",
    FooterAllRightsReserved => "footer.allRightsReserved",
    FooterBuiltWith => "footer.builtWith",

    LanguageKorean => "language.korean",
    LanguageEnglish => "language.english",
    LanguageSwitchLanguage => "language.switchLanguage",

    MetaDefaultTitle => "meta.defaultTitle",
    MetaDefaultDescription => "meta.defaultDescription",
    MetaKeywords => "meta.keywords",
}

/// Flattened strings of one locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    locale: Locale,
    strings: HashMap<String, String>,
}

impl Catalog {
    pub fn empty(locale: Locale) -> Self {
        Self {
            locale,
            strings: HashMap::new(),
        }
    }

    /// Parse a nested JSON resource; non-string leaves are ignored
    pub fn from_json(locale: Locale, json: &str) -> Result<Self, I18nError> {
        let value: serde_json::Value =
            serde_json::from_str(json).map_err(|source| I18nError::Parse { locale, source })?;
        let serde_json::Value::Object(map) = value else {
            return Err(I18nError::NotAnObject { locale });
        };

        let mut strings = HashMap::new();
        for (key, child) in &map {
            flatten_into(key.clone(), child, &mut strings);
        }
        Ok(Self { locale, strings })
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Keys without a string in this catalog, in declaration order
    pub fn missing_keys(&self) -> Vec<&'static str> {
        MessageKey::ALL
            .iter()
            .map(MessageKey::path)
            .filter(|path| !self.strings.contains_key(*path))
            .collect()
    }

    pub fn validate(&self) -> Result<(), I18nError> {
        let keys = self.missing_keys();
        if keys.is_empty() {
            Ok(())
        } else {
            Err(I18nError::MissingKeys {
                locale: self.locale,
                keys,
            })
        }
    }

    pub fn t(&self, key: MessageKey) -> &str {
        self.lookup(key.path())
    }

    /// Resolve a dotted path; a miss returns the path itself
    pub fn lookup<'s>(&'s self, path: &'s str) -> &'s str {
        match self.strings.get(path) {
            Some(text) => text,
            None => {
                tracing::debug!("Translation key not found: {} ({})", path, self.locale);
                path
            }
        }
    }
}

fn flatten_into(prefix: String, value: &serde_json::Value, out: &mut HashMap<String, String>) {
    match value {
        serde_json::Value::String(text) => {
            out.insert(prefix, text.clone());
        }
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                flatten_into(format!("{prefix}.{key}"), child, out);
            }
        }
        _ => {}
    }
}

/// Where raw locale resources come from
pub trait MessageSource {
    fn load(&self, locale: Locale) -> Result<String, I18nError>;
}

/// Resources compiled into the binary from `messages/`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedMessages;

impl MessageSource for EmbeddedMessages {
    fn load(&self, locale: Locale) -> Result<String, I18nError> {
        EMBEDDED_MESSAGES
            .get_file(locale.file_name())
            .and_then(|file| file.contents_utf8())
            .map(str::to_string)
            .ok_or(I18nError::MissingResource(locale))
    }
}

/// Resources read from `{dir}/{locale}.json`
#[derive(Debug, Clone)]
pub struct DirMessages {
    dir: PathBuf,
}

impl DirMessages {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl MessageSource for DirMessages {
    fn load(&self, locale: Locale) -> Result<String, I18nError> {
        let path = self.dir.join(locale.file_name());
        std::fs::read_to_string(&path).map_err(|source| I18nError::Io { path, source })
    }
}

impl<S: MessageSource + ?Sized> MessageSource for Box<S> {
    fn load(&self, locale: Locale) -> Result<String, I18nError> {
        (**self).load(locale)
    }
}

/// Populate-once catalogs, one per locale.
///
/// A locale is loaded on first access and never reloaded. A load failure is
/// logged and leaves an empty catalog, so every lookup echoes its key.
pub struct TranslationCache<S: MessageSource = EmbeddedMessages> {
    source: S,
    ko: OnceCell<Catalog>,
    en: OnceCell<Catalog>,
}

impl Default for TranslationCache<EmbeddedMessages> {
    fn default() -> Self {
        Self::new(EmbeddedMessages)
    }
}

impl<S: MessageSource> TranslationCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            ko: OnceCell::new(),
            en: OnceCell::new(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn catalog(&self, locale: Locale) -> &Catalog {
        let cell = match locale {
            Locale::Ko => &self.ko,
            Locale::En => &self.en,
        };
        cell.get_or_init(|| {
            match self
                .source
                .load(locale)
                .and_then(|json| Catalog::from_json(locale, &json))
            {
                Ok(catalog) => {
                    tracing::debug!("Loaded {} messages for '{}'", catalog.len(), locale);
                    catalog
                }
                Err(err) => {
                    tracing::error!("Failed to load messages for '{}': {}", locale, err);
                    Catalog::empty(locale)
                }
            }
        })
    }

    pub fn t(&self, locale: Locale, key: MessageKey) -> &str {
        self.catalog(locale).t(key)
    }

    /// Load and validate every locale straight from the source, bypassing the cache
    pub fn validate_all(&self) -> Result<(), I18nError> {
        for locale in Locale::ALL {
            let json = self.source.load(locale)?;
            Catalog::from_json(locale, &json)?.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct Counting<'a> {
        loads: &'a Cell<usize>,
    }

    impl MessageSource for Counting<'_> {
        fn load(&self, _locale: Locale) -> Result<String, I18nError> {
            self.loads.set(self.loads.get() + 1);
            Ok(r#"{"navigation": {"home": "Home"}}"#.to_string())
        }
    }

    struct Failing;

    impl MessageSource for Failing {
        fn load(&self, locale: Locale) -> Result<String, I18nError> {
            Err(I18nError::MissingResource(locale))
        }
    }

    #[test]
    fn test_flatten_and_lookup() {
        let catalog = Catalog::from_json(
            Locale::Ko,
            r#"{"navigation": {"home": "홈", "nested": {"deep": "깊이"}}, "count": 3}"#,
        )
        .unwrap();
        assert_eq!(catalog.t(MessageKey::NavigationHome), "홈");
        assert_eq!(catalog.lookup("navigation.nested.deep"), "깊이");
        assert_eq!(catalog.lookup("count"), "count");
        assert_eq!(catalog.lookup("navigation.missing"), "navigation.missing");
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn test_rejects_non_object() {
        assert!(matches!(
            Catalog::from_json(Locale::En, "[1, 2]"),
            Err(I18nError::NotAnObject { .. })
        ));
        assert!(matches!(
            Catalog::from_json(Locale::En, "{not json"),
            Err(I18nError::Parse { .. })
        ));
    }

    #[test]
    fn test_validate_lists_missing_keys() {
        let catalog = Catalog::from_json(Locale::En, r#"{"navigation": {"home": "Home"}}"#).unwrap();
        match catalog.validate() {
            Err(I18nError::MissingKeys { locale, keys }) => {
                assert_eq!(locale, Locale::En);
                assert_eq!(keys.len(), MessageKey::ALL.len() - 1);
                assert!(keys.contains(&"navigation.blog"));
                assert!(!keys.contains(&"navigation.home"));
            }
            other => panic!("expected MissingKeys, got {other:?}"),
        }
    }

    #[test]
    fn test_embedded_messages_are_complete() {
        for locale in Locale::ALL {
            let json = EmbeddedMessages.load(locale).unwrap();
            let catalog = Catalog::from_json(locale, &json).unwrap();
            catalog.validate().unwrap();
        }
        TranslationCache::default().validate_all().unwrap();
    }

    #[test]
    fn test_message_paths_are_unique() {
        let mut paths: Vec<&str> = MessageKey::ALL.iter().map(MessageKey::path).collect();
        paths.sort();
        let total = paths.len();
        paths.dedup();
        assert_eq!(paths.len(), total);
    }

    #[test]
    fn test_cache_loads_once_per_locale() {
        let loads = Cell::new(0);
        let cache = TranslationCache::new(Counting { loads: &loads });

        assert_eq!(cache.t(Locale::En, MessageKey::NavigationHome), "Home");
        assert_eq!(cache.t(Locale::En, MessageKey::NavigationHome), "Home");
        assert_eq!(loads.get(), 1);

        cache.catalog(Locale::Ko);
        assert_eq!(loads.get(), 2);
    }

    #[test]
    fn test_failed_load_echoes_keys() {
        let cache = TranslationCache::new(Failing);
        assert!(cache.catalog(Locale::Ko).is_empty());
        assert_eq!(cache.t(Locale::Ko, MessageKey::BlogTitle), "blog.title");
        assert!(cache.validate_all().is_err());
    }

    #[test]
    fn test_dir_messages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("en.json"), r#"{"blog": {"title": "Blog"}}"#).unwrap();
        let cache = TranslationCache::new(DirMessages::new(dir.path()));
        assert_eq!(cache.t(Locale::En, MessageKey::BlogTitle), "Blog");
        assert_eq!(cache.t(Locale::Ko, MessageKey::BlogTitle), "blog.title");
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("KO".parse::<Locale>().unwrap(), Locale::Ko);
        assert_eq!("en".parse::<Locale>().unwrap(), Locale::En);
        assert!("ja".parse::<Locale>().is_err());
        assert_eq!(Locale::default(), Locale::Ko);
        assert_eq!(serde_json::to_string(&Locale::En).unwrap(), "\"en\"");
    }
}

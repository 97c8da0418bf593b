//! Zendesk Guide API data types.
//!
//! These structs are decoded at the API boundary. Only the identifying fields
//! are required; everything else is optional so that the records survive
//! additions and omissions in the API responses.
//!
//! API docs: https://developer.zendesk.com/api-reference/help_center/help-center-api/

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A resource returned by a paginated list endpoint.
///
/// `COLLECTION_KEY` is the top-level envelope key holding the page's items.
pub trait Resource: DeserializeOwned {
    const COLLECTION_KEY: &'static str;
}

/// A help-center article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    /// Canonical API URL of the article.
    pub url: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub title: String,
    /// HTML body.
    #[serde(default)]
    pub body: Option<String>,
    pub locale: String,
    #[serde(default)]
    pub source_locale: Option<String>,
    #[serde(default)]
    pub section_id: Option<i64>,
    #[serde(default)]
    pub author_id: Option<i64>,
    #[serde(default)]
    pub user_segment_id: Option<i64>,
    #[serde(default)]
    pub permission_group_id: Option<i64>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub promoted: bool,
    #[serde(default)]
    pub outdated: bool,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub label_names: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub edited_at: Option<DateTime<Utc>>,
    /// Embedded when the listing asks for `include=translations`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<Translation>,
}

impl Resource for Article {
    const COLLECTION_KEY: &'static str = "articles";
}

/// A help-center section. Sections belong to a category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub id: i64,
    /// Canonical API URL, also the deduplication key for sideloaded sections.
    pub url: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub locale: String,
    #[serde(default)]
    pub source_locale: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub outdated: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Section {
    const COLLECTION_KEY: &'static str = "sections";
}

/// A help-center category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    /// Canonical API URL, also the deduplication key for sideloaded categories.
    pub url: String,
    #[serde(default)]
    pub html_url: Option<String>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub locale: String,
    #[serde(default)]
    pub source_locale: Option<String>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub outdated: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Category {
    const COLLECTION_KEY: &'static str = "categories";
}

/// A file attached to exactly one article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: i64,
    pub article_id: i64,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub content_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub inline: bool,
    /// Locale the attachment was fetched under.
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Attachment {
    const COLLECTION_KEY: &'static str = "article_attachments";
}

/// A translation of an article (or section/category).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    pub id: i64,
    #[serde(default)]
    pub source_id: Option<i64>,
    #[serde(default)]
    pub source_type: Option<String>,
    pub locale: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub draft: bool,
    #[serde(default)]
    pub outdated: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for Translation {
    const COLLECTION_KEY: &'static str = "translations";
}

/// A user segment restricting who can view content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSegment {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub user_type: Option<String>,
    #[serde(default)]
    pub group_ids: Vec<i64>,
    #[serde(default)]
    pub organization_ids: Vec<i64>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for UserSegment {
    const COLLECTION_KEY: &'static str = "user_segments";
}

/// A permission group controlling who can edit and publish content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PermissionGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub built_in: bool,
    #[serde(default)]
    pub edit: Vec<i64>,
    #[serde(default)]
    pub publish: Vec<i64>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Resource for PermissionGroup {
    const COLLECTION_KEY: &'static str = "permission_groups";
}

/// A locale code such as `en-us`.
///
/// The locales endpoint returns either bare codes or objects with a `locale`
/// field depending on the API flavour; both decode to the same value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "LocaleEntry", into = "String")]
pub struct Locale(String);

impl Locale {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// The empty locale, meaning "the account's default locale".
    pub fn default_locale() -> Self {
        Self(String::new())
    }

    pub fn code(&self) -> &str {
        &self.0
    }

    pub fn is_default(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocaleEntry {
    Code(String),
    Object { locale: String },
}

impl From<LocaleEntry> for Locale {
    fn from(entry: LocaleEntry) -> Self {
        match entry {
            LocaleEntry::Code(code) | LocaleEntry::Object { locale: code } => Locale(code),
        }
    }
}

impl Resource for Locale {
    const COLLECTION_KEY: &'static str = "locales";
}

/// A raw search result. Only the projected fields are decoded.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    pub id: i64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub snippet: Option<String>,
}

impl Resource for SearchResult {
    const COLLECTION_KEY: &'static str = "results";
}

/// One decoded page of a list endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items under the resource's collection key; `None` when the key is
    /// absent or null.
    pub items: Option<Vec<T>>,
    /// URL of the next page, `None` at the end of the stream.
    pub next_page: Option<String>,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, next_page: Option<String>) -> Self {
        Self {
            items: Some(items),
            next_page,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.as_ref().is_none_or(Vec::is_empty)
    }
}

/// A whole sideloaded articles envelope (`include=sections,categories`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SideloadPage {
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
    #[serde(default)]
    pub sections: Option<Vec<Section>>,
    #[serde(default)]
    pub categories: Option<Vec<Category>>,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl SideloadPage {
    /// True when the page carries no articles, sections or categories.
    pub fn is_exhausted(&self) -> bool {
        fn empty<T>(v: &Option<Vec<T>>) -> bool {
            v.as_ref().is_none_or(Vec::is_empty)
        }
        empty(&self.articles) && empty(&self.sections) && empty(&self.categories)
    }
}

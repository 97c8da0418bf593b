//! Sync options, the aggregate result, and sync errors.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;

use crate::storage::StorageError;
use crate::zendesk::{Article, Attachment, Category, Section, ZendeskError};

/// Options for a sync run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Sideload sections and categories with the articles. Default: false.
    pub sideload: bool,
    /// Retrieve every locale the account has. Default: false.
    pub all_locales: bool,
    /// Locale used when `all_locales` is off (or the account reports no
    /// locales). `None` means the account's default locale.
    pub locale: Option<String>,
}

impl SyncOptions {
    pub fn with_sideload(mut self, sideload: bool) -> Self {
        self.sideload = sideload;
        self
    }

    pub fn with_all_locales(mut self, all_locales: bool) -> Self {
        self.all_locales = all_locales;
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

/// Everything retrieved by one sync run.
///
/// Serialized counts are always computed from the collections at the moment
/// of serialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ArticleBackup {
    #[serde(default)]
    pub articles: Vec<Article>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub article_attachments: Vec<Attachment>,
}

impl ArticleBackup {
    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    pub fn article_attachment_count(&self) -> usize {
        self.article_attachments.len()
    }
}

impl Serialize for ArticleBackup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ArticleBackup", 8)?;
        state.serialize_field("article_count", &self.article_count())?;
        state.serialize_field("articles", &self.articles)?;
        state.serialize_field("section_count", &self.section_count())?;
        state.serialize_field("sections", &self.sections)?;
        state.serialize_field("category_count", &self.category_count())?;
        state.serialize_field("categories", &self.categories)?;
        state.serialize_field("article_attachment_count", &self.article_attachment_count())?;
        state.serialize_field("article_attachments", &self.article_attachments)?;
        state.end()
    }
}

/// Errors that abort a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Retrieval failed.
    #[error(transparent)]
    Zendesk(#[from] ZendeskError),

    /// The backup could not be stored.
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// The backup could not be serialized.
    #[error("Failed to serialize backup: {0}")]
    Serialize(#[source] serde_json::Error),
}

//! Import of retrieved content into local records.
//!
//! Records are matched to existing ones by their remote identifier and carry
//! only an allow-listed subset of the API attributes. The actual persistence
//! lives behind [`RecordStore`]; [`MemoryStore`] is the bundled
//! implementation.
//!
//! Parent links are resolved against the records imported earlier in the
//! same run: a section is linked to the first imported category whose
//! `category_id` matches, an article to the first imported section whose
//! `section_id` matches. When several imported records share that id (one per
//! locale, for example) only the first is used.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::sync::ArticleBackup;
use crate::zendesk::{Article, Category, Section};

/// Local identifier assigned by a store.
pub type RecordId = u64;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Record store error: {0}")]
    Backend(String),
}

/// Allow-listed category attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryRecord {
    pub category_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub locale: String,
    pub source_locale: Option<String>,
    pub url: String,
    pub html_url: Option<String>,
    pub outdated: bool,
    pub position: Option<i64>,
    pub category_created_at: Option<DateTime<Utc>>,
    pub category_updated_at: Option<DateTime<Utc>>,
}

impl From<&Category> for CategoryRecord {
    fn from(c: &Category) -> Self {
        Self {
            category_id: c.id,
            name: c.name.clone(),
            description: c.description.clone(),
            locale: c.locale.clone(),
            source_locale: c.source_locale.clone(),
            url: c.url.clone(),
            html_url: c.html_url.clone(),
            outdated: c.outdated,
            position: c.position,
            category_created_at: c.created_at,
            category_updated_at: c.updated_at,
        }
    }
}

/// Allow-listed section attributes plus the resolved category link.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionRecord {
    pub section_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub locale: String,
    pub source_locale: Option<String>,
    pub url: String,
    pub html_url: Option<String>,
    pub outdated: bool,
    pub position: Option<i64>,
    pub section_created_at: Option<DateTime<Utc>>,
    pub section_updated_at: Option<DateTime<Utc>>,
    /// Local id of the linked category record.
    pub category: Option<RecordId>,
}

impl From<&Section> for SectionRecord {
    fn from(s: &Section) -> Self {
        Self {
            section_id: s.id,
            category_id: s.category_id,
            name: s.name.clone(),
            description: s.description.clone(),
            locale: s.locale.clone(),
            source_locale: s.source_locale.clone(),
            url: s.url.clone(),
            html_url: s.html_url.clone(),
            outdated: s.outdated,
            position: s.position,
            section_created_at: s.created_at,
            section_updated_at: s.updated_at,
            category: None,
        }
    }
}

/// Allow-listed article attributes plus the resolved section link.
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleRecord {
    pub article_id: i64,
    pub section_id: Option<i64>,
    pub title: String,
    pub body: Option<String>,
    pub locale: String,
    pub source_locale: Option<String>,
    pub url: String,
    pub html_url: Option<String>,
    pub author_id: Option<i64>,
    pub user_segment_id: Option<i64>,
    pub permission_group_id: Option<i64>,
    pub draft: bool,
    pub promoted: bool,
    pub outdated: bool,
    pub position: Option<i64>,
    pub label_names: Vec<String>,
    pub article_created_at: Option<DateTime<Utc>>,
    pub article_updated_at: Option<DateTime<Utc>>,
    pub article_edited_at: Option<DateTime<Utc>>,
    /// Local id of the linked section record.
    pub section: Option<RecordId>,
}

impl From<&Article> for ArticleRecord {
    fn from(a: &Article) -> Self {
        Self {
            article_id: a.id,
            section_id: a.section_id,
            title: a.title.clone(),
            body: a.body.clone(),
            locale: a.locale.clone(),
            source_locale: a.source_locale.clone(),
            url: a.url.clone(),
            html_url: a.html_url.clone(),
            author_id: a.author_id,
            user_segment_id: a.user_segment_id,
            permission_group_id: a.permission_group_id,
            draft: a.draft,
            promoted: a.promoted,
            outdated: a.outdated,
            position: a.position,
            label_names: a.label_names.clone(),
            article_created_at: a.created_at,
            article_updated_at: a.updated_at,
            article_edited_at: a.edited_at,
            section: None,
        }
    }
}

/// A record as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Stored<T> {
    pub local_id: RecordId,
    /// True when the upsert created the record.
    pub created: bool,
    pub record: T,
}

/// Persistence boundary for imported records.
///
/// Each upsert matches an existing record by remote id (`category_id`,
/// `section_id`, `article_id`), replacing its attributes, or creates one.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn upsert_category(
        &self,
        record: CategoryRecord,
    ) -> Result<Stored<CategoryRecord>, StoreError>;

    async fn upsert_section(
        &self,
        record: SectionRecord,
    ) -> Result<Stored<SectionRecord>, StoreError>;

    async fn upsert_article(
        &self,
        record: ArticleRecord,
    ) -> Result<Stored<ArticleRecord>, StoreError>;
}

/// Outcome of an import.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub categories_created: usize,
    pub categories_updated: usize,
    pub sections_created: usize,
    pub sections_updated: usize,
    pub articles_created: usize,
    pub articles_updated: usize,
    /// Sections whose category was not among the imported categories.
    pub unlinked_sections: usize,
    /// Articles whose section was not among the imported sections.
    pub unlinked_articles: usize,
}

/// Upsert categories, then sections, then articles from a backup.
pub async fn import_backup(
    store: &dyn RecordStore,
    backup: &ArticleBackup,
) -> Result<ImportStats, StoreError> {
    let mut stats = ImportStats::default();

    let mut categories = ParentIndex::default();
    for category in &backup.categories {
        let stored = store.upsert_category(category.into()).await?;
        bump(stored.created, &mut stats.categories_created, &mut stats.categories_updated);
        categories.insert(stored.record.category_id, stored.local_id);
    }

    let mut sections = ParentIndex::default();
    for section in &backup.sections {
        let mut record = SectionRecord::from(section);
        record.category = categories.get(record.category_id);
        if record.category.is_none() {
            stats.unlinked_sections += 1;
        }
        let stored = store.upsert_section(record).await?;
        bump(stored.created, &mut stats.sections_created, &mut stats.sections_updated);
        sections.insert(stored.record.section_id, stored.local_id);
    }

    for article in &backup.articles {
        let mut record = ArticleRecord::from(article);
        record.section = sections.get(record.section_id);
        if record.section.is_none() {
            stats.unlinked_articles += 1;
        }
        let stored = store.upsert_article(record).await?;
        bump(stored.created, &mut stats.articles_created, &mut stats.articles_updated);
    }

    tracing::info!(
        categories = backup.categories.len(),
        sections = backup.sections.len(),
        articles = backup.articles.len(),
        unlinked_sections = stats.unlinked_sections,
        unlinked_articles = stats.unlinked_articles,
        "Import complete"
    );
    Ok(stats)
}

fn bump(created: bool, created_count: &mut usize, updated_count: &mut usize) {
    if created {
        *created_count += 1;
    } else {
        *updated_count += 1;
    }
}

/// Local ids of the parents imported so far, by remote id. The first import
/// of a remote id keeps the link.
#[derive(Debug, Default)]
struct ParentIndex(HashMap<i64, RecordId>);

impl ParentIndex {
    fn insert(&mut self, remote_id: i64, local_id: RecordId) {
        match self.0.entry(remote_id) {
            Entry::Vacant(entry) => {
                entry.insert(local_id);
            }
            Entry::Occupied(entry) if *entry.get() != local_id => {
                tracing::warn!(remote_id, "Several imported parents match, linking the first");
            }
            Entry::Occupied(_) => {}
        }
    }

    fn get(&self, remote_id: Option<i64>) -> Option<RecordId> {
        self.0.get(&remote_id?).copied()
    }
}

/// In-memory [`RecordStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryStoreInner>>,
}

#[derive(Debug, Default)]
struct MemoryStoreInner {
    next_id: RecordId,
    categories: Table<CategoryRecord>,
    sections: Table<SectionRecord>,
    articles: Table<ArticleRecord>,
}

/// Rows in insertion order, indexed by remote id.
#[derive(Debug)]
struct Table<T> {
    rows: Vec<(RecordId, T)>,
    by_remote_id: HashMap<i64, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_remote_id: HashMap::new(),
        }
    }
}

impl<T: Clone> Table<T> {
    /// Replace the row with the same remote id, or append a new one.
    fn upsert(
        &mut self,
        remote_id: i64,
        record: T,
        allocate: impl FnOnce() -> RecordId,
    ) -> Stored<T> {
        if let Some(&index) = self.by_remote_id.get(&remote_id) {
            let (local_id, existing) = &mut self.rows[index];
            *existing = record.clone();
            return Stored {
                local_id: *local_id,
                created: false,
                record,
            };
        }
        let local_id = allocate();
        self.by_remote_id.insert(remote_id, self.rows.len());
        self.rows.push((local_id, record.clone()));
        Stored {
            local_id,
            created: true,
            record,
        }
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryStoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn categories(&self) -> Vec<(RecordId, CategoryRecord)> {
        self.lock().categories.rows.clone()
    }

    pub fn sections(&self) -> Vec<(RecordId, SectionRecord)> {
        self.lock().sections.rows.clone()
    }

    pub fn articles(&self) -> Vec<(RecordId, ArticleRecord)> {
        self.lock().articles.rows.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert_category(
        &self,
        record: CategoryRecord,
    ) -> Result<Stored<CategoryRecord>, StoreError> {
        let mut inner = self.lock();
        let MemoryStoreInner {
            next_id,
            categories,
            ..
        } = &mut *inner;
        Ok(categories.upsert(record.category_id, record, || {
            *next_id += 1;
            *next_id
        }))
    }

    async fn upsert_section(
        &self,
        record: SectionRecord,
    ) -> Result<Stored<SectionRecord>, StoreError> {
        let mut inner = self.lock();
        let MemoryStoreInner {
            next_id, sections, ..
        } = &mut *inner;
        Ok(sections.upsert(record.section_id, record, || {
            *next_id += 1;
            *next_id
        }))
    }

    async fn upsert_article(
        &self,
        record: ArticleRecord,
    ) -> Result<Stored<ArticleRecord>, StoreError> {
        let mut inner = self.lock();
        let MemoryStoreInner {
            next_id, articles, ..
        } = &mut *inner;
        Ok(articles.upsert(record.article_id, record, || {
            *next_id += 1;
            *next_id
        }))
    }
}

//! Guidepost - backups of a Zendesk Guide help center.
//!
//! This library retrieves articles, sections, categories and attachments from
//! the Zendesk help-center API and writes them as one JSON document to blob
//! storage. It also offers article search and an import of backups into a
//! record store.
//!
//! # Example
//!
//! ```ignore
//! use guidepost::{Credentials, FileStorage, SyncOptions, ZendeskClient, backup};
//! use guidepost::zendesk::DEFAULT_TIMEOUT;
//!
//! let credentials = Credentials::new("agent@acme.com", "api-token")?;
//! let client = ZendeskClient::new("acme", credentials, DEFAULT_TIMEOUT)?;
//! let storage = FileStorage::new("./backups");
//!
//! // All locales, with sections and categories sideloaded
//! let options = SyncOptions::default().with_sideload(true).with_all_locales(true);
//! let articles = backup(&client, &storage, &options, None).await?;
//! ```

pub mod http;
pub mod pagination;
pub mod search;
pub mod storage;
pub mod store;
pub mod sync;
pub mod zendesk;

pub use search::{SearchHit, SearchQuery, search_articles};
pub use storage::{BlobStorage, FileStorage, MemoryStorage, StorageError};
pub use store::{ImportStats, MemoryStore, RecordStore, StoreError, import_backup};
pub use sync::{ArticleBackup, SyncError, SyncOptions, SyncProgress, backup, retrieve_all};
pub use zendesk::{Credentials, Locale, ZendeskClient, ZendeskError};

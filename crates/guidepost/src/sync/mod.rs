//! Retrieval and backup of help-center content.
//!
//! # Module Structure
//!
//! - [`types`] - `SyncOptions`, `ArticleBackup`, `SyncError`
//! - [`progress`] - Progress reporting: `SyncProgress`, `ProgressCallback`, `emit()`
//! - [`sideload`] - Sideloaded article retrieval with section/category deduplication
//! - [`engine`] - Orchestration: `retrieve_all()`, `backup()`
//!
//! # Example
//!
//! ```ignore
//! use guidepost::sync::{SyncOptions, SyncProgress, retrieve_all};
//!
//! let options = SyncOptions::default().with_sideload(true);
//! let on_progress: guidepost::sync::ProgressCallback = Box::new(|event| {
//!     if let SyncProgress::LocaleComplete { locale, articles } = event {
//!         println!("{locale}: {articles} articles");
//!     }
//! });
//! let backup = retrieve_all(&client, &options, Some(&on_progress)).await?;
//! ```

mod attachments;
pub mod engine;
mod locales;
mod progress;
pub mod sideload;
mod types;

pub use types::{ArticleBackup, SyncError, SyncOptions};

pub use progress::{ProgressCallback, SyncProgress, emit};

pub use attachments::expand_attachments;
pub use locales::resolve_locales;
pub use sideload::{AbsorbStats, SideloadAggregator, retrieve_sideloaded};

pub use engine::{backup, retrieve_all};

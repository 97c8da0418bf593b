//! Progress reporting types for sync operations.
//!
//! The sync engine emits these events so that a UI (progress bars, structured
//! logs) can follow a run without the engine knowing how it is displayed.

/// Progress events emitted during a sync run.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SyncProgress {
    /// Fetching the account's locale list.
    FetchingLocales,

    /// The locale set for this run is fixed.
    LocalesResolved {
        /// Locale codes in iteration order (empty string = default locale).
        locales: Vec<String>,
    },

    /// Starting retrieval of one locale.
    FetchingLocale {
        /// Locale code (empty string = default locale).
        locale: String,
        /// Whether sections and categories are sideloaded.
        sideload: bool,
    },

    /// Fetched one sideloaded page.
    FetchedPage {
        /// Locale this page belongs to.
        locale: String,
        /// Page number within the locale (1-indexed).
        page: u32,
        /// Articles on this page.
        articles: usize,
        /// Sections on this page that had not been seen earlier in the run.
        new_sections: usize,
        /// Categories on this page that had not been seen earlier in the run.
        new_categories: usize,
    },

    /// Finished retrieving articles for one locale.
    LocaleComplete {
        /// Locale code.
        locale: String,
        /// Articles retrieved for this locale.
        articles: usize,
    },

    /// Starting attachment expansion for one locale's articles.
    ExpandingAttachments {
        /// Locale code.
        locale: String,
        /// Number of articles whose attachments will be listed.
        articles: usize,
    },

    /// Attachment expansion finished for one locale.
    AttachmentsComplete {
        /// Locale code.
        locale: String,
        /// Attachments found for this locale.
        attachments: usize,
    },

    /// Retrieval finished for the whole run.
    RetrievalComplete {
        articles: usize,
        sections: usize,
        categories: usize,
        attachments: usize,
    },

    /// Uploading the serialized backup.
    Uploading {
        /// Storage path of the backup.
        path: String,
        /// Size of the serialized backup in bytes.
        bytes: usize,
    },

    /// Backup stored successfully.
    BackupComplete {
        /// Storage path of the backup.
        path: String,
        /// Number of articles in the backup.
        articles: usize,
    },
}

/// Callback type for progress reporting.
pub type ProgressCallback = Box<dyn Fn(SyncProgress) + Send + Sync>;

/// Emit a progress event if a callback is provided.
///
/// This is a convenience function to avoid repetitive `if let Some(cb) = ...` patterns.
#[inline]
pub fn emit(on_progress: Option<&ProgressCallback>, event: SyncProgress) {
    if let Some(cb) = on_progress {
        cb(event);
    }
}

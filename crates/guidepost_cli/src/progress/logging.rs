use guidepost::sync::SyncProgress;

use super::locale_label;

/// Logging reporter using tracing for structured output.
pub(crate) struct LoggingReporter;

impl LoggingReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn handle(&self, event: SyncProgress) {
        match event {
            SyncProgress::FetchingLocales => {
                tracing::debug!("Fetching locales");
            }

            SyncProgress::LocalesResolved { locales } => {
                let labels: Vec<&str> = locales.iter().map(|l| locale_label(l)).collect();
                tracing::info!(count = labels.len(), locales = ?labels, "Locales resolved");
            }

            SyncProgress::FetchingLocale { locale, sideload } => {
                tracing::info!(locale = locale_label(&locale), sideload, "Fetching articles");
            }

            SyncProgress::FetchedPage {
                locale,
                page,
                articles,
                new_sections,
                new_categories,
            } => {
                tracing::debug!(
                    locale = locale_label(&locale),
                    page,
                    articles,
                    new_sections,
                    new_categories,
                    "Fetched page"
                );
            }

            SyncProgress::LocaleComplete { locale, articles } => {
                tracing::info!(locale = locale_label(&locale), articles, "Locale complete");
            }

            SyncProgress::ExpandingAttachments { locale, articles } => {
                tracing::debug!(locale = locale_label(&locale), articles, "Listing attachments");
            }

            SyncProgress::AttachmentsComplete {
                locale,
                attachments,
            } => {
                tracing::info!(locale = locale_label(&locale), attachments, "Attachments listed");
            }

            SyncProgress::RetrievalComplete {
                articles,
                sections,
                categories,
                attachments,
            } => {
                tracing::info!(
                    articles,
                    sections,
                    categories,
                    attachments,
                    "Retrieval complete"
                );
            }

            SyncProgress::Uploading { path, bytes } => {
                tracing::debug!(path = %path, bytes, "Uploading backup");
            }

            SyncProgress::BackupComplete { path, articles } => {
                tracing::info!(path = %path, articles, "Backup stored");
            }

            _ => {}
        }
    }
}

impl Default for LoggingReporter {
    fn default() -> Self {
        Self::new()
    }
}

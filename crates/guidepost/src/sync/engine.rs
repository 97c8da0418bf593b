//! Sync orchestrator: full retrieval and backup.
//!
//! Every run walks the resolved locales in order and, within a locale, the
//! API's pages in order, one request at a time. The resulting article
//! sequence is therefore locale-major and reproducible between runs.
//!
//! | sideload | all_locales | retrieval                                              |
//! |----------|-------------|--------------------------------------------------------|
//! | false    | false       | one locale, articles only                              |
//! | false    | true        | every locale, articles + attachments                   |
//! | true     | false       | one locale, articles + sections + categories + attachments |
//! | true     | true        | every locale, sections/categories deduplicated globally |
//!
//! # Example
//!
//! ```ignore
//! use guidepost::storage::FileStorage;
//! use guidepost::sync::{SyncOptions, backup};
//!
//! let storage = FileStorage::new("./backups");
//! let options = SyncOptions::default().with_sideload(true).with_all_locales(true);
//! let count = backup(&client, &storage, &options, None).await?;
//! println!("Backed up {count} articles");
//! ```

use chrono::Utc;

use super::attachments::expand_attachments;
use super::locales::resolve_locales;
use super::progress::{ProgressCallback, SyncProgress, emit};
use super::sideload::{SideloadAggregator, retrieve_sideloaded};
use super::types::{ArticleBackup, SyncError, SyncOptions};
use crate::storage::{BACKUP_NAMESPACE, BlobStorage, backup_path};
use crate::zendesk::{ZendeskClient, ZendeskError};

/// Retrieve everything the options ask for into one [`ArticleBackup`].
///
/// The first error aborts the run; nothing retrieved before it is returned.
pub async fn retrieve_all(
    client: &ZendeskClient,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<ArticleBackup, ZendeskError> {
    let locales = resolve_locales(client, options, on_progress).await?;
    let expand = options.sideload || options.all_locales;

    let mut aggregator = SideloadAggregator::new();
    let mut article_attachments = Vec::new();

    for locale in &locales {
        tracing::info!(locale = %locale, sideload = options.sideload, "Fetching articles");
        emit(
            on_progress,
            SyncProgress::FetchingLocale {
                locale: locale.code().to_string(),
                sideload: options.sideload,
            },
        );

        let start = aggregator.articles().len();
        if options.sideload {
            retrieve_sideloaded(client, locale, &mut aggregator, on_progress).await?;
        } else {
            let articles = client.retrieve_all_articles(locale).await?;
            aggregator.absorb_articles(articles);
        }

        let locale_articles = &aggregator.articles()[start..];
        emit(
            on_progress,
            SyncProgress::LocaleComplete {
                locale: locale.code().to_string(),
                articles: locale_articles.len(),
            },
        );

        if expand {
            emit(
                on_progress,
                SyncProgress::ExpandingAttachments {
                    locale: locale.code().to_string(),
                    articles: locale_articles.len(),
                },
            );
            let attachments = expand_attachments(client, locale_articles, locale).await?;
            emit(
                on_progress,
                SyncProgress::AttachmentsComplete {
                    locale: locale.code().to_string(),
                    attachments: attachments.len(),
                },
            );
            article_attachments.extend(attachments);
        }
    }

    let (articles, sections, categories) = aggregator.into_parts();
    let backup = ArticleBackup {
        articles,
        sections,
        categories,
        article_attachments,
    };

    tracing::info!(
        articles = backup.article_count(),
        sections = backup.section_count(),
        categories = backup.category_count(),
        attachments = backup.article_attachment_count(),
        "Retrieval complete"
    );
    emit(
        on_progress,
        SyncProgress::RetrievalComplete {
            articles: backup.article_count(),
            sections: backup.section_count(),
            categories: backup.category_count(),
            attachments: backup.article_attachment_count(),
        },
    );

    Ok(backup)
}

/// Retrieve everything, store it as one JSON blob, and return the article count.
///
/// The blob is stored under
/// `zendesk/<subdomain>/article_backups/<YYYYMMDDHHMMSS>[_with_sideload].json`.
/// Nothing is uploaded when retrieval fails.
pub async fn backup(
    client: &ZendeskClient,
    storage: &dyn BlobStorage,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<usize, SyncError> {
    let backup = retrieve_all(client, options, on_progress).await?;

    let content = serde_json::to_string(&backup).map_err(SyncError::Serialize)?;
    let path = backup_path(
        BACKUP_NAMESPACE,
        client.subdomain(),
        Utc::now(),
        options.sideload,
    );

    emit(
        on_progress,
        SyncProgress::Uploading {
            path: path.clone(),
            bytes: content.len(),
        },
    );
    storage.upload(&path, &content).await?;

    let articles = backup.article_count();
    tracing::info!(path = %path, articles, "Backup stored");
    emit(on_progress, SyncProgress::BackupComplete { path, articles });

    Ok(articles)
}

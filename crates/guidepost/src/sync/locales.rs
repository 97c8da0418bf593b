//! Locale resolution for a sync run.

use super::progress::{ProgressCallback, SyncProgress, emit};
use super::types::SyncOptions;
use crate::zendesk::{Locale, ZendeskClient, ZendeskError};

/// Decide which locales a run iterates over, in order.
///
/// With `all_locales` the account's locale list is fetched once; an empty list
/// falls back to the single configured locale, as does `all_locales = false`.
/// The configured locale defaults to the account's default locale.
pub async fn resolve_locales(
    client: &ZendeskClient,
    options: &SyncOptions,
    on_progress: Option<&ProgressCallback>,
) -> Result<Vec<Locale>, ZendeskError> {
    let fallback = || {
        vec![
            options
                .locale
                .as_deref()
                .map(Locale::new)
                .unwrap_or_else(Locale::default_locale),
        ]
    };

    let locales = if options.all_locales {
        emit(on_progress, SyncProgress::FetchingLocales);
        let locales = client.retrieve_all_locales().await?;
        if locales.is_empty() {
            tracing::warn!("Account reported no locales, using the default locale");
            fallback()
        } else {
            locales
        }
    } else {
        fallback()
    };

    emit(
        on_progress,
        SyncProgress::LocalesResolved {
            locales: locales.iter().map(|l| l.code().to_string()).collect(),
        },
    );

    Ok(locales)
}

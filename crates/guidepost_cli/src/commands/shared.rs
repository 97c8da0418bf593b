use console::{Term, style};
use guidepost::sync::SyncError;
use guidepost::zendesk::short_error_message;
use guidepost::{SyncOptions, ZendeskClient, ZendeskError};
use tokio_util::sync::CancellationToken;

use crate::SyncArgs;
use crate::config::Config;

/// Build an API client from config, honoring a `--subdomain` override.
pub(crate) fn build_client(
    config: &Config,
    subdomain: Option<&str>,
    cancel: CancellationToken,
) -> Result<ZendeskClient, Box<dyn std::error::Error>> {
    let subdomain = subdomain
        .filter(|s| !s.trim().is_empty())
        .or_else(|| config.subdomain())
        .ok_or(
            "No Zendesk subdomain configured. Pass --subdomain, set [zendesk] subdomain \
             in guidepost.toml, or set GUIDEPOST_ZENDESK__SUBDOMAIN.",
        )?;

    let credentials = config.credentials()?;
    let client = ZendeskClient::new(subdomain, credentials, config.timeout())?;
    Ok(client.with_cancellation(cancel))
}

/// Merge command-line sync flags over the configured defaults.
pub(crate) fn sync_options(args: &SyncArgs, config: &Config) -> SyncOptions {
    let defaults = config.sync_options();
    let mut options = SyncOptions::default()
        .with_sideload(args.sideload || defaults.sideload)
        .with_all_locales(args.all_locales || defaults.all_locales);
    if let Some(locale) = args.locale.clone().or(defaults.locale) {
        options = options.with_locale(locale);
    }
    options
}

/// Print a one-line explanation of a failed run.
pub(crate) fn report_sync_error(err: &SyncError) {
    let message = match err {
        SyncError::Zendesk(ZendeskError::Cancelled) => "Cancelled, no backup written".to_string(),
        SyncError::Zendesk(e) if e.is_auth_error() => format!(
            "{} (check the agent email and API token)",
            short_error_message(e)
        ),
        SyncError::Zendesk(e) => short_error_message(e),
        other => other.to_string(),
    };

    if Term::stdout().is_term() {
        eprintln!("{} {}", style("✗").red().bold(), message);
    } else {
        tracing::error!(error = %err, "{}", message);
    }
}

//! `guidepost backup`: retrieve everything and store one JSON blob.

use std::path::PathBuf;
use std::sync::Arc;

use console::{Term, style};
use guidepost::{FileStorage, backup};
use tokio_util::sync::CancellationToken;

use crate::SyncArgs;
use crate::commands::shared::{build_client, report_sync_error, sync_options};
use crate::config::Config;
use crate::progress::ProgressReporter;

pub(crate) async fn handle_backup(
    args: SyncArgs,
    dir: Option<PathBuf>,
    config: &Config,
    cancel: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(config, args.subdomain.as_deref(), cancel)?;
    let options = sync_options(&args, config);
    let root = dir
        .or_else(|| config.backup_dir())
        .ok_or("Could not determine a backup directory; pass --dir")?;
    let storage = FileStorage::new(root.clone());

    tracing::info!(
        subdomain = client.subdomain(),
        dir = %root.display(),
        sideload = options.sideload,
        all_locales = options.all_locales,
        "Starting backup"
    );

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.callback();
    let result = backup(&client, &storage, &options, Some(&callback)).await;
    reporter.finish();

    match result {
        Ok(articles) => {
            if Term::stdout().is_term() {
                println!(
                    "{} Backed up {} articles to {}",
                    style("✓").green().bold(),
                    articles,
                    root.display()
                );
            }
            Ok(())
        }
        Err(e) => {
            report_sync_error(&e);
            Err(e.into())
        }
    }
}

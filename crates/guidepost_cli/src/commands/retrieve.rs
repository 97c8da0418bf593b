//! `guidepost retrieve`: print the aggregate result as JSON without storing it.

use std::path::PathBuf;
use std::sync::Arc;

use guidepost::retrieve_all;
use guidepost::sync::SyncError;
use tokio_util::sync::CancellationToken;

use crate::SyncArgs;
use crate::commands::shared::{build_client, report_sync_error, sync_options};
use crate::config::Config;
use crate::progress::ProgressReporter;

pub(crate) async fn handle_retrieve(
    args: SyncArgs,
    output: Option<PathBuf>,
    compact: bool,
    config: &Config,
    cancel: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(config, args.subdomain.as_deref(), cancel)?;
    let options = sync_options(&args, config);

    let reporter = Arc::new(ProgressReporter::new());
    let callback = reporter.callback();
    let result = retrieve_all(&client, &options, Some(&callback)).await;
    reporter.finish();

    let aggregate = match result {
        Ok(aggregate) => aggregate,
        Err(e) => {
            let err = SyncError::from(e);
            report_sync_error(&err);
            return Err(err.into());
        }
    };

    let json = if compact {
        serde_json::to_string(&aggregate)?
    } else {
        serde_json::to_string_pretty(&aggregate)?
    };

    match output {
        Some(path) => {
            tokio::fs::write(&path, json).await?;
            tracing::info!(path = %path.display(), articles = aggregate.article_count(), "Wrote result");
        }
        None => println!("{}", json),
    }
    Ok(())
}

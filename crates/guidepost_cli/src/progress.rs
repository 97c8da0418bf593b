//! Progress reporting for backup runs.
//!
//! This module provides two modes of progress reporting:
//! - Interactive mode (TTY): spinners using indicatif, one per locale
//! - Logging mode (non-TTY): structured logging using tracing

mod interactive;
mod logging;

use std::sync::Arc;

use console::Term;
use guidepost::sync::{ProgressCallback, SyncProgress};

pub(crate) use interactive::InteractiveReporter;
pub(crate) use logging::LoggingReporter;

/// Progress reporter that handles both interactive and logging modes.
pub(crate) enum ProgressReporter {
    /// Interactive spinners for TTY.
    Interactive(InteractiveReporter),
    /// Structured logging for non-TTY (CI, pipes, cron).
    Logging(LoggingReporter),
}

impl ProgressReporter {
    /// Create a new progress reporter, auto-detecting TTY mode.
    pub fn new() -> Self {
        if Term::stdout().is_term() {
            Self::Interactive(InteractiveReporter::new())
        } else {
            Self::Logging(LoggingReporter::new())
        }
    }

    pub fn handle(&self, event: SyncProgress) {
        match self {
            Self::Interactive(r) => r.handle(event),
            Self::Logging(r) => r.handle(event),
        }
    }

    /// Convert to a [`ProgressCallback`] for the library.
    pub fn callback(self: &Arc<Self>) -> ProgressCallback {
        let reporter = Arc::clone(self);
        Box::new(move |event| reporter.handle(event))
    }

    /// Finish all spinners (interactive mode only).
    pub fn finish(&self) {
        if let Self::Interactive(r) = self {
            r.finish();
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Display label for a locale code; the empty code is the account default.
pub(crate) fn locale_label(locale: &str) -> &str {
    if locale.is_empty() { "default" } else { locale }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn test_locale_label() {
        assert_eq!(locale_label(""), "default");
        assert_eq!(locale_label("en-us"), "en-us");
    }

    #[test]
    fn test_callback_forwards_to_logging_reporter() {
        let reporter = Arc::new(ProgressReporter::Logging(LoggingReporter::new()));
        let callback = reporter.callback();
        callback(SyncProgress::FetchingLocales);
        callback(SyncProgress::LocaleComplete {
            locale: "es".to_string(),
            articles: 3,
        });
        reporter.finish();
    }

    #[test]
    fn test_interactive_reporter_handles_full_run() {
        let reporter = ProgressReporter::Interactive(InteractiveReporter::new());
        for event in [
            SyncProgress::LocalesResolved {
                locales: vec!["en-us".to_string(), "es".to_string()],
            },
            SyncProgress::FetchingLocale {
                locale: "en-us".to_string(),
                sideload: true,
            },
            SyncProgress::FetchedPage {
                locale: "en-us".to_string(),
                page: 1,
                articles: 25,
                new_sections: 2,
                new_categories: 1,
            },
            SyncProgress::LocaleComplete {
                locale: "en-us".to_string(),
                articles: 25,
            },
            SyncProgress::ExpandingAttachments {
                locale: "en-us".to_string(),
                articles: 25,
            },
            SyncProgress::AttachmentsComplete {
                locale: "en-us".to_string(),
                attachments: 4,
            },
            SyncProgress::Uploading {
                path: "zendesk/acme/article_backups/1.json".to_string(),
                bytes: 1024,
            },
            SyncProgress::BackupComplete {
                path: "zendesk/acme/article_backups/1.json".to_string(),
                articles: 25,
            },
        ] {
            reporter.handle(event);
        }
        reporter.finish();
    }
}

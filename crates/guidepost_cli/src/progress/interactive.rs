use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use guidepost::sync::SyncProgress;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

use super::locale_label;

#[derive(Default)]
struct ProgressState {
    /// Spinner per locale, keyed by locale code.
    locale_bars: HashMap<String, ProgressBar>,
    /// Running article count per locale.
    articles: HashMap<String, usize>,
    upload_bar: Option<ProgressBar>,
}

/// Interactive progress reporter using indicatif.
pub(crate) struct InteractiveReporter {
    multi: MultiProgress,
    state: Mutex<ProgressState>,
}

impl InteractiveReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            state: Mutex::new(ProgressState::default()),
        }
    }

    fn spinner(&self, prefix: &str) -> ProgressBar {
        let pb = self.multi.add(ProgressBar::new_spinner());
        pb.set_style(Self::spinner_style());
        pb.set_prefix(format!("{:12}", prefix));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }

    pub fn handle(&self, event: SyncProgress) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        match event {
            SyncProgress::FetchingLocale { locale, sideload } => {
                let pb = self.spinner(locale_label(&locale));
                let what = if sideload {
                    "articles, sections and categories"
                } else {
                    "articles"
                };
                pb.set_message(format!("Fetching {}...", what));
                state.locale_bars.insert(locale, pb);
            }

            SyncProgress::FetchedPage {
                locale,
                page,
                articles,
                ..
            } => {
                let total = {
                    let count = state.articles.entry(locale.clone()).or_default();
                    *count += articles;
                    *count
                };
                if let Some(pb) = state.locale_bars.get(&locale) {
                    pb.set_message(format!("Page {} ({} articles)", page, total));
                }
            }

            SyncProgress::LocaleComplete { locale, articles } => {
                if let Some(pb) = state.locale_bars.get(&locale) {
                    pb.set_message(format!("{} articles", articles));
                }
                state.articles.insert(locale, articles);
            }

            SyncProgress::ExpandingAttachments { locale, articles } => {
                if let Some(pb) = state.locale_bars.get(&locale) {
                    pb.set_message(format!("Listing attachments of {} articles...", articles));
                }
            }

            SyncProgress::AttachmentsComplete {
                locale,
                attachments,
            } => {
                let articles = state.articles.get(&locale).copied();
                if let Some(pb) = state.locale_bars.get(&locale) {
                    match articles {
                        Some(n) => pb.finish_with_message(format!(
                            "✓ {} articles, {} attachments",
                            n, attachments
                        )),
                        None => pb.finish_with_message(format!("✓ {} attachments", attachments)),
                    }
                }
            }

            SyncProgress::RetrievalComplete { .. } => {
                for pb in state.locale_bars.values() {
                    if !pb.is_finished() {
                        pb.finish();
                    }
                }
            }

            SyncProgress::Uploading { path, bytes } => {
                let pb = self.spinner("Uploading");
                pb.set_message(format!("{} ({} bytes)", path, bytes));
                state.upload_bar = Some(pb);
            }

            SyncProgress::BackupComplete { path, articles } => {
                if let Some(pb) = state.upload_bar.take() {
                    pb.finish_with_message(format!("✓ {} articles → {}", articles, path));
                }
            }

            _ => {}
        }
    }

    pub fn finish(&self) {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        for pb in state.locale_bars.values() {
            if !pb.is_finished() {
                pb.finish();
            }
        }
        if let Some(ref pb) = state.upload_bar
            && !pb.is_finished()
        {
            pb.finish();
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .template("{prefix:.bold.cyan} {spinner:.green} {msg}")
            .expect("Invalid template")
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
    }
}

impl Default for InteractiveReporter {
    fn default() -> Self {
        Self::new()
    }
}

//! Merging of sideloaded article pages.
//!
//! A sideloaded articles page carries the sections and categories its
//! articles reference. The same section shows up on every page (and every
//! locale) that references it, so sections and categories are deduplicated
//! by canonical url across the whole run. Articles are never deduplicated.

use std::collections::HashMap;

use super::progress::{ProgressCallback, SyncProgress, emit};
use crate::zendesk::{Article, Category, Locale, Section, SideloadPage, ZendeskClient, ZendeskError};

/// Counts added by one [`SideloadAggregator::absorb`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AbsorbStats {
    pub articles: usize,
    pub new_sections: usize,
    pub new_categories: usize,
}

/// Run-wide accumulator for sideloaded pages.
#[derive(Debug, Default)]
pub struct SideloadAggregator {
    articles: Vec<Article>,
    sections: Vec<Section>,
    categories: Vec<Category>,
    section_occurrences: HashMap<String, usize>,
    category_occurrences: HashMap<String, usize>,
}

impl SideloadAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one page. Sections and categories are kept only the first time
    /// their url is seen; later occurrences are counted and dropped.
    pub fn absorb(
        &mut self,
        articles: Vec<Article>,
        sections: Vec<Section>,
        categories: Vec<Category>,
    ) -> AbsorbStats {
        let mut stats = AbsorbStats {
            articles: articles.len(),
            ..Default::default()
        };
        self.articles.extend(articles);

        for section in sections {
            if first_occurrence(&mut self.section_occurrences, &section.url) {
                self.sections.push(section);
                stats.new_sections += 1;
            }
        }

        for category in categories {
            if first_occurrence(&mut self.category_occurrences, &category.url) {
                self.categories.push(category);
                stats.new_categories += 1;
            }
        }

        stats
    }

    /// Merge a page of articles only (non-sideloaded retrieval).
    pub fn absorb_articles(&mut self, articles: Vec<Article>) {
        self.articles.extend(articles);
    }

    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// How many times a section url has been seen so far in this run.
    pub fn section_occurrences(&self, url: &str) -> usize {
        self.section_occurrences.get(url).copied().unwrap_or(0)
    }

    /// How many times a category url has been seen so far in this run.
    pub fn category_occurrences(&self, url: &str) -> usize {
        self.category_occurrences.get(url).copied().unwrap_or(0)
    }

    pub fn into_parts(self) -> (Vec<Article>, Vec<Section>, Vec<Category>) {
        (self.articles, self.sections, self.categories)
    }
}

/// Bump the occurrence counter for `url`; true on the 0 -> 1 transition.
fn first_occurrence(occurrences: &mut HashMap<String, usize>, url: &str) -> bool {
    let count = occurrences.entry(url.to_string()).or_insert(0);
    *count += 1;
    *count == 1
}

/// Walk every sideloaded articles page of one locale into `aggregator`.
///
/// Stops on a page carrying no articles, sections or categories, or after a
/// page without a next cursor. Returns the locale's article count.
pub async fn retrieve_sideloaded(
    client: &ZendeskClient,
    locale: &Locale,
    aggregator: &mut SideloadAggregator,
    on_progress: Option<&ProgressCallback>,
) -> Result<usize, ZendeskError> {
    let mut url = client.articles_url(locale, true);
    let mut page = 1u32;
    let mut locale_articles = 0usize;

    loop {
        let page_data = client.fetch_sideload_page(&url).await?;
        if page_data.is_exhausted() {
            tracing::debug!(locale = %locale, page, "Empty sideload page, stopping");
            break;
        }

        let SideloadPage {
            articles,
            sections,
            categories,
            next_page,
        } = page_data;

        let stats = aggregator.absorb(
            articles.unwrap_or_default(),
            sections.unwrap_or_default(),
            categories.unwrap_or_default(),
        );
        locale_articles += stats.articles;

        tracing::debug!(
            locale = %locale,
            page,
            articles = stats.articles,
            new_sections = stats.new_sections,
            new_categories = stats.new_categories,
            "Fetched sideload page"
        );
        emit(
            on_progress,
            SyncProgress::FetchedPage {
                locale: locale.code().to_string(),
                page,
                articles: stats.articles,
                new_sections: stats.new_sections,
                new_categories: stats.new_categories,
            },
        );

        match next_page {
            Some(next) => {
                url = next;
                page += 1;
            }
            None => break,
        }
    }

    Ok(locale_articles)
}

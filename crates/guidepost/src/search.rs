//! Free-text article search.
//!
//! Search is a single request against the search endpoint; only the first
//! page of results is returned.

use serde::Serialize;

use crate::zendesk::{SearchResult, ZendeskClient, ZendeskError};

/// A search request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    /// Free-text query. Empty means "no search".
    pub query: String,
    /// Restrict results to one locale.
    pub locale: Option<String>,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            locale: None,
        }
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

/// Slim projection of one search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub id: i64,
    pub title: String,
    pub snippet: String,
}

impl From<SearchResult> for SearchHit {
    fn from(result: SearchResult) -> Self {
        Self {
            id: result.id,
            title: result.title.unwrap_or_default(),
            snippet: result.snippet.unwrap_or_default(),
        }
    }
}

/// Search articles, returning at most one page of hits.
///
/// A blank query returns no hits without contacting the API.
pub async fn search_articles(
    client: &ZendeskClient,
    query: &SearchQuery,
) -> Result<Vec<SearchHit>, ZendeskError> {
    let text = query.query.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let url = client.search_url(text, query.locale.as_deref());
    let page = client.fetch_page::<SearchResult>(&url).await?;
    let hits: Vec<SearchHit> = page
        .items
        .unwrap_or_default()
        .into_iter()
        .map(SearchHit::from)
        .collect();

    tracing::debug!(query = text, hits = hits.len(), "Search complete");
    Ok(hits)
}

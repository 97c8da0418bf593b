//! `guidepost search`: free-text article search.

use clap::ValueEnum;
use guidepost::{SearchHit, SearchQuery, search_articles};
use scraper::Html;
use tokio_util::sync::CancellationToken;

use crate::commands::shared::build_client;
use crate::config::Config;

/// Longest snippet shown in table output, in characters.
const SNIPPET_WIDTH: usize = 60;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Display as a formatted table (default)
    #[default]
    Table,
    /// Display as JSON
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, tabled::Tabled)]
struct SearchRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Snippet")]
    snippet: String,
}

impl From<&SearchHit> for SearchRow {
    fn from(hit: &SearchHit) -> Self {
        Self {
            id: hit.id,
            title: hit.title.clone(),
            snippet: truncate(&snippet_text(&hit.snippet), SNIPPET_WIDTH),
        }
    }
}

/// Plain text of a snippet, without the highlight markup the API puts around
/// matched terms. Entities are decoded.
fn snippet_text(html: &str) -> String {
    Html::parse_fragment(html).root_element().text().collect()
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        text.to_string()
    }
}

pub(crate) async fn handle_search(
    query: String,
    locale: Option<String>,
    subdomain: Option<String>,
    output: OutputFormat,
    config: &Config,
    cancel: CancellationToken,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = build_client(config, subdomain.as_deref(), cancel)?;
    let mut request = SearchQuery::new(query);
    if let Some(locale) = locale {
        request = request.with_locale(locale);
    }

    let hits = search_articles(&client, &request).await?;
    print_hits(&hits, output)?;
    Ok(())
}

fn print_hits(hits: &[SearchHit], output: OutputFormat) -> Result<(), serde_json::Error> {
    match output {
        OutputFormat::Table => {
            if hits.is_empty() {
                println!("No articles found.");
                return Ok(());
            }
            let rows: Vec<SearchRow> = hits.iter().map(SearchRow::from).collect();
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(hits)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(snippet: &str) -> SearchHit {
        SearchHit {
            id: 7,
            title: "Reset your password".to_string(),
            snippet: snippet.to_string(),
        }
    }

    #[test]
    fn test_default_output_format_is_table() {
        assert!(matches!(OutputFormat::default(), OutputFormat::Table));
    }

    #[test]
    fn test_row_strips_highlight_markup() {
        let row = SearchRow::from(&hit("How to <em>reset</em> it"));
        assert_eq!(row.snippet, "How to reset it");
        assert_eq!(row.id, 7);
    }

    #[test]
    fn test_row_decodes_entities() {
        let row = SearchRow::from(&hit(
            "Reset &amp; restore your &quot;<em>password</em>&quot;",
        ));
        assert_eq!(row.snippet, "Reset & restore your \"password\"");
    }

    #[test]
    fn test_row_truncates_long_snippets() {
        let row = SearchRow::from(&hit(&"x".repeat(200)));
        assert_eq!(row.snippet.chars().count(), SNIPPET_WIDTH);
        assert!(row.snippet.ends_with("..."));
    }

    #[test]
    fn test_print_hits_both_formats() {
        let hits = vec![hit("a"), hit("b")];
        print_hits(&hits, OutputFormat::Table).unwrap();
        print_hits(&hits, OutputFormat::Json).unwrap();
        print_hits(&[], OutputFormat::Table).unwrap();
    }
}

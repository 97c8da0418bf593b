//! `guidepost import`: load a backup file into the record store.
//!
//! The bundled store is in memory, so this reports what an import would
//! create and which parent links it could not resolve.

use std::path::Path;

use guidepost::{ArticleBackup, ImportStats, MemoryStore, import_backup};

use crate::commands::search::OutputFormat;

#[derive(Debug, Clone, serde::Serialize, tabled::Tabled)]
struct ImportRow {
    #[tabled(rename = "Records")]
    kind: &'static str,
    #[tabled(rename = "Created")]
    created: usize,
    #[tabled(rename = "Updated")]
    updated: usize,
    #[tabled(rename = "Unlinked")]
    unlinked: usize,
}

fn rows(stats: &ImportStats) -> Vec<ImportRow> {
    vec![
        ImportRow {
            kind: "categories",
            created: stats.categories_created,
            updated: stats.categories_updated,
            unlinked: 0,
        },
        ImportRow {
            kind: "sections",
            created: stats.sections_created,
            updated: stats.sections_updated,
            unlinked: stats.unlinked_sections,
        },
        ImportRow {
            kind: "articles",
            created: stats.articles_created,
            updated: stats.articles_updated,
            unlinked: stats.unlinked_articles,
        },
    ]
}

pub(crate) async fn import_file(path: &Path) -> Result<ImportStats, Box<dyn std::error::Error>> {
    let content = tokio::fs::read_to_string(path).await?;
    let backup: ArticleBackup = serde_json::from_str(&content)?;
    let store = MemoryStore::new();
    Ok(import_backup(&store, &backup).await?)
}

pub(crate) async fn handle_import(
    path: &Path,
    output: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let stats = import_file(path).await?;
    let rows = rows(&stats);
    match output {
        OutputFormat::Table => {
            let mut table = tabled::Table::new(rows);
            table.with(tabled::settings::Style::rounded());
            println!("{}", table);
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&rows)?),
    }
    Ok(())
}

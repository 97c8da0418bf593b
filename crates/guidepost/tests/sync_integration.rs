//! Integration tests for backup runs through the public API.
//!
//! A scripted transport stands in for the Zendesk API so that full runs
//! (locale resolution, sideloading, attachment expansion, upload and import)
//! are exercised end to end without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use guidepost::http::{HttpError, HttpRequest, HttpResponse, HttpTransport};
use guidepost::sync::{ProgressCallback, SyncError, SyncProgress};
use guidepost::{
    Credentials, FileStorage, Locale, MemoryStore, SyncOptions, ZendeskClient, ZendeskError,
    backup, import_backup,
};
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

/// Anything that takes longer than this is hanging.
const RUN_TIMEOUT: Duration = Duration::from_secs(5);

const BASE: &str = "https://acme.zendesk.com/api/v2";

/// Serves queued JSON bodies per URL and records every requested URL.
#[derive(Clone, Default)]
struct ScriptedTransport {
    routes: Arc<Mutex<HashMap<String, VecDeque<Value>>>>,
    requested: Arc<Mutex<Vec<String>>>,
}

impl ScriptedTransport {
    fn route(&self, url: impl Into<String>, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .entry(url.into())
            .or_default()
            .push_back(body);
    }

    fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        self.requested.lock().unwrap().push(request.url.clone());
        let body = self
            .routes
            .lock()
            .unwrap()
            .get_mut(&request.url)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| HttpError::NoMockResponse {
                url: request.url.clone(),
            })?;
        Ok(HttpResponse {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: serde_json::to_vec(&body).unwrap(),
        })
    }
}

fn client(transport: &ScriptedTransport) -> ZendeskClient {
    let credentials = Credentials::new("agent@acme.com", "secret").unwrap();
    ZendeskClient::new_with_transport("acme", credentials, Arc::new(transport.clone())).unwrap()
}

fn article(id: i64, locale: &str, section_id: i64) -> Value {
    json!({
        "id": id,
        "url": format!("{BASE}/help_center/{locale}/articles/{id}.json"),
        "title": format!("{locale} article {id}"),
        "body": "<p>Hello</p>",
        "locale": locale,
        "section_id": section_id,
    })
}

fn section(id: i64, locale: &str, category_id: i64) -> Value {
    json!({
        "id": id,
        "url": format!("{BASE}/help_center/{locale}/sections/{id}.json"),
        "name": format!("Section {id}"),
        "locale": locale,
        "category_id": category_id,
    })
}

fn category(id: i64, locale: &str) -> Value {
    json!({
        "id": id,
        "url": format!("{BASE}/help_center/{locale}/categories/{id}.json"),
        "name": format!("Category {id}"),
        "locale": locale,
    })
}

/// Two locales, sideloaded, the first spanning two pages.
fn script_sideloaded_account(transport: &ScriptedTransport, c: &ZendeskClient) {
    let en = Locale::new("en-us");
    let es = Locale::new("es");
    let en_page_2 =
        format!("{BASE}/help_center/en-us/articles.json?include=sections,categories&per_page=25&page=2");

    transport.route(
        c.locales_url(),
        json!({"locales": ["en-us", "es"], "next_page": null}),
    );
    transport.route(
        c.articles_url(&en, true),
        json!({
            "articles": [article(1, "en-us", 10)],
            "sections": [section(10, "en-us", 100)],
            "categories": [category(100, "en-us")],
            "next_page": en_page_2,
        }),
    );
    transport.route(
        en_page_2,
        json!({
            "articles": [article(2, "en-us", 10)],
            "sections": [section(10, "en-us", 100)],
            "categories": [category(100, "en-us")],
            "next_page": null,
        }),
    );
    transport.route(
        c.articles_url(&es, true),
        json!({
            "articles": [article(1, "es", 10)],
            "sections": [section(10, "es", 100)],
            "categories": [category(100, "es")],
            "next_page": null,
        }),
    );
    transport.route(
        c.attachments_url(&en, 1),
        json!({
            "article_attachments": [{"id": 500, "article_id": 1, "file_name": "diagram.png"}],
            "next_page": null,
        }),
    );
    transport.route(
        c.attachments_url(&en, 2),
        json!({"article_attachments": [], "next_page": null}),
    );
    transport.route(
        c.attachments_url(&es, 1),
        json!({"article_attachments": [], "next_page": null}),
    );
}

#[tokio::test]
async fn test_sideloaded_backup_writes_file_and_imports() {
    let transport = ScriptedTransport::default();
    let c = client(&transport);
    script_sideloaded_account(&transport, &c);

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());
    let options = SyncOptions::default()
        .with_sideload(true)
        .with_all_locales(true);

    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);
    let callback: ProgressCallback = Box::new(move |event| sink.lock().unwrap().push(event));

    let articles = tokio::time::timeout(
        RUN_TIMEOUT,
        backup(&c, &storage, &options, Some(&callback)),
    )
    .await
    .expect("backup timed out")
    .unwrap();
    assert_eq!(articles, 3);

    let path = events
        .lock()
        .unwrap()
        .iter()
        .find_map(|event| match event {
            SyncProgress::BackupComplete { path, .. } => Some(path.clone()),
            _ => None,
        })
        .expect("no BackupComplete event");
    assert!(path.starts_with("zendesk/acme/article_backups/"));
    assert!(path.ends_with("_with_sideload.json"));

    let content = std::fs::read_to_string(dir.path().join(&path)).unwrap();
    let json: Value = serde_json::from_str(&content).unwrap();
    assert_eq!(json["article_count"], 3);
    // Per-locale URLs differ, so each locale keeps its own section and category.
    assert_eq!(json["section_count"], 2);
    assert_eq!(json["category_count"], 2);
    assert_eq!(json["article_attachment_count"], 1);
    assert_eq!(json["article_attachments"][0]["locale"], "en-us");

    let restored: guidepost::ArticleBackup = serde_json::from_value(json).unwrap();
    let store = MemoryStore::new();
    let stats = import_backup(&store, &restored).await.unwrap();

    // Records are keyed by remote id, so locale variants collapse.
    assert_eq!(store.categories().len(), 1);
    assert_eq!(store.sections().len(), 1);
    assert_eq!(store.articles().len(), 2);
    assert_eq!(stats.unlinked_sections, 0);
    assert_eq!(stats.unlinked_articles, 0);
}

#[tokio::test]
async fn test_locale_major_request_order() {
    let transport = ScriptedTransport::default();
    let c = client(&transport);
    script_sideloaded_account(&transport, &c);

    let storage = guidepost::MemoryStorage::new();
    let options = SyncOptions::default()
        .with_sideload(true)
        .with_all_locales(true);
    backup(&c, &storage, &options, None).await.unwrap();

    let requested = transport.requested();
    let first_es = requested
        .iter()
        .position(|u| u.contains("/help_center/es/"))
        .unwrap();
    let last_en = requested
        .iter()
        .rposition(|u| u.contains("/help_center/en-us/"))
        .unwrap();
    assert!(last_en < first_es, "locales interleaved: {requested:?}");
    assert_eq!(requested[0], c.locales_url());
}

#[tokio::test]
async fn test_cancelled_run_uploads_nothing() {
    let transport = ScriptedTransport::default();
    let token = CancellationToken::new();
    token.cancel();
    let c = client(&transport).with_cancellation(token);

    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::new(dir.path());

    let err = backup(&c, &storage, &SyncOptions::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SyncError::Zendesk(ZendeskError::Cancelled)
    ));
    assert!(transport.requested().is_empty());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_missing_page_aborts_run() {
    let transport = ScriptedTransport::default();
    let c = client(&transport);
    let next = format!("{BASE}/help_center/articles.json?per_page=25&page=2");
    transport.route(
        c.articles_url(&Locale::default_locale(), false),
        json!({"articles": [article(1, "en-us", 10)], "next_page": next}),
    );

    let storage = guidepost::MemoryStorage::new();
    let err = backup(&c, &storage, &SyncOptions::default(), None)
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Zendesk(ZendeskError::Http(_))));
    assert!(storage.blobs().is_empty());
}

//! Zendesk Guide API client: authenticated page fetching and list retrieval.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use base64::Engine;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use super::error::ZendeskError;
use super::types::{
    Article, Attachment, Locale, Page, PermissionGroup, Resource, SideloadPage, Translation,
    UserSegment,
};
use crate::http::reqwest_transport::ReqwestTransport;
use crate::http::{HttpRequest, HttpTransport};
use crate::pagination::paginate;

/// Page size used for every paginated list request.
pub const PER_PAGE: u32 = 25;

/// Page size used for search requests.
pub const SEARCH_PER_PAGE: u32 = 10;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

/// Suffix appended to the account email for API-token authentication.
const TOKEN_USER_SUFFIX: &str = "/token";

/// API-token credentials for HTTP Basic authentication.
#[derive(Clone)]
pub struct Credentials {
    email: String,
    api_token: String,
}

impl Credentials {
    /// Create credentials, rejecting empty values.
    pub fn new(email: impl Into<String>, api_token: impl Into<String>) -> Result<Self, ZendeskError> {
        let email = email.into();
        let api_token = api_token.into();
        if email.trim().is_empty() {
            return Err(ZendeskError::Config("missing account email".to_string()));
        }
        if api_token.trim().is_empty() {
            return Err(ZendeskError::Config("missing API token".to_string()));
        }
        Ok(Self { email, api_token })
    }

    /// Basic auth username: the account email with the token marker.
    pub fn username(&self) -> String {
        format!("{}{}", self.email, TOKEN_USER_SUFFIX)
    }

    /// Value for the `Authorization` header.
    pub fn authorization_header(&self) -> String {
        let raw = format!("{}:{}", self.username(), self.api_token);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(raw)
        )
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

/// Zendesk Guide API client.
///
/// Every request is an authenticated GET. Requests are issued one at a time
/// by the callers in this crate; the client itself holds no per-run state.
#[derive(Clone)]
pub struct ZendeskClient {
    transport: Arc<dyn HttpTransport>,
    subdomain: String,
    credentials: Credentials,
    cancel: CancellationToken,
}

impl ZendeskClient {
    /// Create a client backed by reqwest with the given per-request timeout.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let credentials = Credentials::new("agent@acme.com", "api-token")?;
    /// let client = ZendeskClient::new("acme", credentials, DEFAULT_TIMEOUT)?;
    /// let locales = client.retrieve_all_locales().await?;
    /// ```
    pub fn new(
        subdomain: &str,
        credentials: Credentials,
        timeout: StdDuration,
    ) -> Result<Self, ZendeskError> {
        let transport = ReqwestTransport::with_timeout(timeout)
            .map_err(|e| ZendeskError::Config(e.to_string()))?;
        Self::new_with_transport(subdomain, credentials, Arc::new(transport))
    }

    pub fn new_with_transport(
        subdomain: &str,
        credentials: Credentials,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ZendeskError> {
        let subdomain = subdomain.trim();
        if subdomain.is_empty() {
            return Err(ZendeskError::Config("missing subdomain".to_string()));
        }
        Ok(Self {
            transport,
            subdomain: subdomain.to_string(),
            credentials,
            cancel: CancellationToken::new(),
        })
    }

    /// Abort in-flight and future requests when `token` is cancelled.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn subdomain(&self) -> &str {
        &self.subdomain
    }

    /// Root of the v2 API for this account.
    pub fn base_api_url(&self) -> String {
        format!("https://{}.zendesk.com/api/v2", self.subdomain)
    }

    // ─── URL builders ──────────────────────────────────────────────────────

    /// First page of the articles list.
    ///
    /// The default locale uses the locale-less path; translations are included
    /// there since articles are not otherwise split per locale.
    pub fn articles_url(&self, locale: &Locale, sideload: bool) -> String {
        let base = self.base_api_url();
        match (locale.is_default(), sideload) {
            (true, false) => format!(
                "{base}/help_center/articles.json?include=translations&per_page={PER_PAGE}&page=1"
            ),
            (true, true) => format!(
                "{base}/help_center/articles.json?include=sections,categories,translations&per_page={PER_PAGE}&page=1"
            ),
            (false, false) => {
                format!("{base}/help_center/{locale}/articles.json?per_page={PER_PAGE}&page=1")
            }
            (false, true) => format!(
                "{base}/help_center/{locale}/articles.json?include=sections,categories&per_page={PER_PAGE}&page=1"
            ),
        }
    }

    pub fn attachments_url(&self, locale: &Locale, article_id: i64) -> String {
        let base = self.base_api_url();
        if locale.is_default() {
            format!(
                "{base}/help_center/articles/{article_id}/attachments.json?per_page={PER_PAGE}&page=1"
            )
        } else {
            format!(
                "{base}/help_center/{locale}/articles/{article_id}/attachments.json?per_page={PER_PAGE}&page=1"
            )
        }
    }

    pub fn translations_url(&self, article_id: i64) -> String {
        format!(
            "{}/help_center/articles/{}/translations.json",
            self.base_api_url(),
            article_id
        )
    }

    pub fn user_segments_url(&self) -> String {
        format!(
            "{}/help_center/user_segments.json?per_page={}&page=1",
            self.base_api_url(),
            PER_PAGE
        )
    }

    pub fn permission_groups_url(&self) -> String {
        format!(
            "{}/guide/permission_groups.json?per_page={}&page=1",
            self.base_api_url(),
            PER_PAGE
        )
    }

    pub fn locales_url(&self) -> String {
        format!("{}/locales.json", self.base_api_url())
    }

    pub fn search_url(&self, query: &str, locale: Option<&str>) -> String {
        let mut url = format!(
            "{}/help_center/articles/search.json?query={}&per_page={}",
            self.base_api_url(),
            urlencoding::encode(query),
            SEARCH_PER_PAGE
        );
        if let Some(locale) = locale.filter(|l| !l.is_empty()) {
            url.push_str("&locale=");
            url.push_str(&urlencoding::encode(locale));
        }
        url
    }

    // ─── Fetching ──────────────────────────────────────────────────────────

    /// Make an authenticated GET request and decode the body as JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ZendeskError> {
        if self.cancel.is_cancelled() {
            return Err(ZendeskError::Cancelled);
        }

        let request = HttpRequest {
            url: url.to_string(),
            headers: vec![
                ("Accept".to_string(), "application/json".to_string()),
                ("User-Agent".to_string(), "guidepost".to_string()),
                (
                    "Authorization".to_string(),
                    self.credentials.authorization_header(),
                ),
            ],
        };

        let response = tokio::select! {
            _ = self.cancel.cancelled() => return Err(ZendeskError::Cancelled),
            result = self.transport.send(request) => {
                result.map_err(|e| ZendeskError::Http(e.to_string()))?
            }
        };

        if !response.is_success() {
            let message = String::from_utf8_lossy(&response.body).to_string();
            return Err(ZendeskError::Api {
                status: response.status,
                message,
            });
        }

        serde_json::from_slice(&response.body).map_err(ZendeskError::Json)
    }

    /// Fetch one page of a list endpoint.
    ///
    /// Items are read from the resource's collection key; a missing or null
    /// key yields `items: None`. A missing, null or empty `next_page` ends the
    /// stream.
    pub async fn fetch_page<T: Resource>(&self, url: &str) -> Result<Page<T>, ZendeskError> {
        let mut envelope: serde_json::Map<String, Value> = self.get_json(url).await?;

        let items = match envelope.remove(T::COLLECTION_KEY) {
            None | Some(Value::Null) => None,
            Some(value) => Some(serde_json::from_value::<Vec<T>>(value)?),
        };

        Ok(Page {
            items,
            next_page: next_page_cursor(&mut envelope),
        })
    }

    /// Fetch one sideloaded articles page as a whole envelope.
    pub async fn fetch_sideload_page(&self, url: &str) -> Result<SideloadPage, ZendeskError> {
        let mut page: SideloadPage = self.get_json(url).await?;
        page.next_page = page.next_page.filter(|next| !next.is_empty());
        Ok(page)
    }

    /// Retrieve every page of a list endpoint starting at `first_url`.
    pub async fn retrieve_all<T: Resource>(&self, first_url: &str) -> Result<Vec<T>, ZendeskError> {
        paginate(T::COLLECTION_KEY, |cursor| {
            let url = cursor.unwrap_or_else(|| first_url.to_string());
            async move { self.fetch_page::<T>(&url).await }
        })
        .await
    }

    // ─── Resource retrieval ────────────────────────────────────────────────

    /// All articles for a locale (non-sideloaded).
    pub async fn retrieve_all_articles(&self, locale: &Locale) -> Result<Vec<Article>, ZendeskError> {
        self.retrieve_all(&self.articles_url(locale, false)).await
    }

    pub async fn retrieve_all_user_segments(&self) -> Result<Vec<UserSegment>, ZendeskError> {
        self.retrieve_all(&self.user_segments_url()).await
    }

    pub async fn retrieve_all_permission_groups(
        &self,
    ) -> Result<Vec<PermissionGroup>, ZendeskError> {
        self.retrieve_all(&self.permission_groups_url()).await
    }

    /// All attachments of one article.
    ///
    /// Attachments without a locale are stamped with the locale they were
    /// fetched under.
    pub async fn retrieve_all_attachments(
        &self,
        article_id: i64,
        locale: &Locale,
    ) -> Result<Vec<Attachment>, ZendeskError> {
        let mut attachments: Vec<Attachment> = self
            .retrieve_all(&self.attachments_url(locale, article_id))
            .await?;
        if !locale.is_default() {
            for attachment in &mut attachments {
                attachment
                    .locale
                    .get_or_insert_with(|| locale.code().to_string());
            }
        }
        Ok(attachments)
    }

    pub async fn retrieve_all_locales(&self) -> Result<Vec<Locale>, ZendeskError> {
        self.retrieve_all(&self.locales_url()).await
    }

    pub async fn retrieve_all_translations(
        &self,
        article_id: i64,
    ) -> Result<Vec<Translation>, ZendeskError> {
        self.retrieve_all(&self.translations_url(article_id)).await
    }
}

fn next_page_cursor(envelope: &mut serde_json::Map<String, Value>) -> Option<String> {
    match envelope.remove("next_page") {
        Some(Value::String(next)) if !next.is_empty() => Some(next),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::{HttpResponse, MockTransport};

    const BASE: &str = "https://acme.zendesk.com/api/v2";

    fn client(transport: &MockTransport) -> ZendeskClient {
        let credentials = Credentials::new("agent@acme.com", "secret").unwrap();
        ZendeskClient::new_with_transport("acme", credentials, Arc::new(transport.clone())).unwrap()
    }

    #[test]
    fn test_credentials_reject_empty_values() {
        assert!(matches!(
            Credentials::new("", "secret"),
            Err(ZendeskError::Config(_))
        ));
        assert!(matches!(
            Credentials::new("agent@acme.com", "  "),
            Err(ZendeskError::Config(_))
        ));
    }

    #[test]
    fn test_credentials_basic_auth_uses_token_username() {
        let credentials = Credentials::new("agent@acme.com", "secret").unwrap();
        assert_eq!(credentials.username(), "agent@acme.com/token");
        let expected = base64::engine::general_purpose::STANDARD.encode("agent@acme.com/token:secret");
        assert_eq!(credentials.authorization_header(), format!("Basic {expected}"));
        assert!(!format!("{credentials:?}").contains("secret"));
    }

    #[test]
    fn test_missing_subdomain_is_config_error() {
        let credentials = Credentials::new("agent@acme.com", "secret").unwrap();
        let result =
            ZendeskClient::new_with_transport(" ", credentials, Arc::new(MockTransport::new()));
        assert!(matches!(result, Err(ZendeskError::Config(_))));
    }

    #[test]
    fn test_url_builders() {
        let client = client(&MockTransport::new());
        let en = Locale::new("en-us");
        let default = Locale::default_locale();

        assert_eq!(
            client.articles_url(&default, false),
            format!("{BASE}/help_center/articles.json?include=translations&per_page=25&page=1")
        );
        assert_eq!(
            client.articles_url(&default, true),
            format!(
                "{BASE}/help_center/articles.json?include=sections,categories,translations&per_page=25&page=1"
            )
        );
        assert_eq!(
            client.articles_url(&en, false),
            format!("{BASE}/help_center/en-us/articles.json?per_page=25&page=1")
        );
        assert_eq!(
            client.articles_url(&en, true),
            format!(
                "{BASE}/help_center/en-us/articles.json?include=sections,categories&per_page=25&page=1"
            )
        );
        assert_eq!(
            client.attachments_url(&en, 42),
            format!("{BASE}/help_center/en-us/articles/42/attachments.json?per_page=25&page=1")
        );
        assert_eq!(
            client.attachments_url(&default, 42),
            format!("{BASE}/help_center/articles/42/attachments.json?per_page=25&page=1")
        );
        assert_eq!(
            client.translations_url(42),
            format!("{BASE}/help_center/articles/42/translations.json")
        );
        assert_eq!(
            client.user_segments_url(),
            format!("{BASE}/help_center/user_segments.json?per_page=25&page=1")
        );
        assert_eq!(
            client.permission_groups_url(),
            format!("{BASE}/guide/permission_groups.json?per_page=25&page=1")
        );
        assert_eq!(client.locales_url(), format!("{BASE}/locales.json"));
        assert_eq!(
            client.search_url("reset password", Some("en-us")),
            format!(
                "{BASE}/help_center/articles/search.json?query=reset%20password&per_page=10&locale=en-us"
            )
        );
        assert_eq!(
            client.search_url("a&b", None),
            format!("{BASE}/help_center/articles/search.json?query=a%26b&per_page=10")
        );
    }

    #[tokio::test]
    async fn test_fetch_page_sends_basic_auth_and_decodes_envelope() {
        let transport = MockTransport::new();
        let url = client(&transport).user_segments_url();
        transport.push_json(
            &url,
            json!({
                "user_segments": [{"id": 1, "name": "Signed-in users", "user_type": "signed_in_users"}],
                "next_page": "https://acme.zendesk.com/api/v2/help_center/user_segments.json?page=2",
                "count": 26,
            }),
        );

        let page: Page<UserSegment> = client(&transport).fetch_page(&url).await.unwrap();

        let items = page.items.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "Signed-in users");
        assert_eq!(
            page.next_page.as_deref(),
            Some("https://acme.zendesk.com/api/v2/help_center/user_segments.json?page=2")
        );

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        let auth = crate::http::header_get(&requests[0].headers, "authorization").unwrap();
        assert!(auth.starts_with("Basic "));
    }

    #[tokio::test]
    async fn test_fetch_page_missing_key_and_null_cursor() {
        let transport = MockTransport::new();
        let url = client(&transport).locales_url();
        transport.push_json(&url, json!({"next_page": null}));

        let page: Page<Locale> = client(&transport).fetch_page(&url).await.unwrap();
        assert!(page.items.is_none());
        assert!(page.next_page.is_none());
    }

    #[tokio::test]
    async fn test_non_json_body_is_decode_error() {
        let transport = MockTransport::new();
        let url = client(&transport).locales_url();
        transport.push_response(
            &url,
            HttpResponse {
                status: 200,
                headers: Vec::new(),
                body: b"<html>maintenance</html>".to_vec(),
            },
        );

        let err = client(&transport)
            .fetch_page::<Locale>(&url)
            .await
            .unwrap_err();
        assert!(matches!(err, ZendeskError::Json(_)));
    }

    #[tokio::test]
    async fn test_error_status_is_api_error() {
        let transport = MockTransport::new();
        let url = client(&transport).locales_url();
        transport.push_response(
            &url,
            HttpResponse {
                status: 401,
                headers: Vec::new(),
                body: b"Couldn't authenticate you".to_vec(),
            },
        );

        let err = client(&transport)
            .fetch_page::<Locale>(&url)
            .await
            .unwrap_err();
        assert!(err.is_auth_error());
    }

    #[tokio::test]
    async fn test_transport_error_is_http_error() {
        let transport = MockTransport::new();
        let err = client(&transport)
            .retrieve_all_locales()
            .await
            .unwrap_err();
        assert!(matches!(err, ZendeskError::Http(_)));
    }

    #[tokio::test]
    async fn test_cancelled_client_issues_no_request() {
        let transport = MockTransport::new();
        let token = CancellationToken::new();
        token.cancel();
        let client = client(&transport).with_cancellation(token);

        let err = client.retrieve_all_locales().await.unwrap_err();
        assert!(matches!(err, ZendeskError::Cancelled));
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_retrieve_all_follows_next_page() {
        let transport = MockTransport::new();
        let c = client(&transport);
        let first = c.permission_groups_url();
        let second = format!("{BASE}/guide/permission_groups.json?per_page=25&page=2");
        transport.push_json(
            &first,
            json!({"permission_groups": [{"id": 1, "name": "Admins"}], "next_page": second}),
        );
        transport.push_json(
            &second,
            json!({"permission_groups": [{"id": 2, "name": "Agents", "built_in": true}], "next_page": null}),
        );

        let groups = c.retrieve_all_permission_groups().await.unwrap();

        assert_eq!(
            groups.iter().map(|g| g.id).collect::<Vec<_>>(),
            vec![1, 2]
        );
        assert!(groups[1].built_in);
        assert_eq!(transport.requested_urls(), vec![first, second]);
    }

    #[tokio::test]
    async fn test_retrieve_all_attachments_stamps_locale() {
        let transport = MockTransport::new();
        let c = client(&transport);
        let es = Locale::new("es");
        transport.push_json(
            c.attachments_url(&es, 9),
            json!({
                "article_attachments": [
                    {"id": 1, "article_id": 9, "file_name": "a.png"},
                    {"id": 2, "article_id": 9, "locale": "es-mx"},
                ],
                "next_page": null,
            }),
        );

        let attachments = c.retrieve_all_attachments(9, &es).await.unwrap();

        assert_eq!(attachments[0].locale.as_deref(), Some("es"));
        assert_eq!(attachments[1].locale.as_deref(), Some("es-mx"));
    }

    #[tokio::test]
    async fn test_retrieve_all_translations() {
        let transport = MockTransport::new();
        let c = client(&transport);
        transport.push_json(
            c.translations_url(5),
            json!({
                "translations": [
                    {"id": 10, "source_id": 5, "source_type": "Article", "locale": "en-us", "title": "Hello"},
                    {"id": 11, "source_id": 5, "source_type": "Article", "locale": "es", "title": "Hola"},
                ],
                "next_page": null,
            }),
        );

        let translations = c.retrieve_all_translations(5).await.unwrap();
        assert_eq!(translations.len(), 2);
        assert_eq!(translations[1].title.as_deref(), Some("Hola"));
    }

    #[tokio::test]
    async fn test_fetch_sideload_page_returns_whole_envelope() {
        let transport = MockTransport::new();
        let c = client(&transport);
        let url = c.articles_url(&Locale::new("en-us"), true);
        transport.push_json(
            &url,
            json!({
                "articles": [{"id": 1, "url": "a1", "title": "A", "locale": "en-us", "section_id": 3}],
                "sections": [{"id": 3, "url": "s3", "name": "S", "locale": "en-us", "category_id": 4}],
                "categories": [{"id": 4, "url": "c4", "name": "C", "locale": "en-us"}],
                "next_page": "",
            }),
        );

        let page = c.fetch_sideload_page(&url).await.unwrap();
        assert_eq!(page.articles.unwrap().len(), 1);
        assert_eq!(page.sections.unwrap()[0].category_id, Some(4));
        assert_eq!(page.categories.unwrap()[0].url, "c4");
        assert!(page.next_page.is_none());
    }

    #[tokio::test]
    async fn test_default_locale_articles_decode_embedded_translations() {
        let transport = MockTransport::new();
        let c = client(&transport);
        let url = c.articles_url(&Locale::default_locale(), false);
        transport.push_json(
            &url,
            json!({
                "articles": [{
                    "id": 1,
                    "url": "a1",
                    "title": "A",
                    "locale": "en-us",
                    "translations": [{"id": 9, "source_id": 1, "locale": "es", "title": "Hola"}],
                }],
                "next_page": null,
            }),
        );

        let page: Page<Article> = c.fetch_page(&url).await.unwrap();
        let articles = page.items.unwrap();
        assert_eq!(articles[0].translations.len(), 1);
        assert_eq!(articles[0].translations[0].locale, "es");
        assert_eq!(articles[0].translations[0].source_id, Some(1));
    }
}

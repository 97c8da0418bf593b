//! Attachment expansion for a batch of articles.

use crate::zendesk::{Article, Attachment, Locale, ZendeskClient, ZendeskError};

/// List the attachments of every article, in article order.
///
/// Each article's attachments are paginated to exhaustion before moving on to
/// the next article. Articles without attachments contribute nothing.
pub async fn expand_attachments(
    client: &ZendeskClient,
    articles: &[Article],
    locale: &Locale,
) -> Result<Vec<Attachment>, ZendeskError> {
    let mut all_attachments = Vec::new();

    for article in articles {
        let attachments = client.retrieve_all_attachments(article.id, locale).await?;
        if !attachments.is_empty() {
            tracing::debug!(
                article_id = article.id,
                locale = %locale,
                count = attachments.len(),
                "Fetched attachments"
            );
        }
        all_attachments.extend(attachments);
    }

    Ok(all_attachments)
}

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::models::{ApiErrorBody, FilterCriteria, NewSnippet, Snippet};
use reqwest::Client;
use tracing::{debug, info, warn};

/// HTTP access to the snippet service.
#[derive(Debug, Clone)]
pub struct SnippetApi {
    client: Client,
    endpoint: String,
}

impl SnippetApi {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            endpoint: config.snippets_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// GET the snippet list. Unset criteria never reach the query string.
    pub async fn list_snippets(&self, criteria: &FilterCriteria) -> Result<Vec<Snippet>> {
        let query = list_query(criteria);
        debug!(endpoint = %self.endpoint, ?query, "fetching snippets");

        let res = self.client.get(&self.endpoint).query(&query).send().await?;
        let status = res.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "snippet list request failed");
            return Err(ClientError::FetchFailed {
                status: status.as_u16(),
            });
        }

        let body = res.text().await?;
        let snippets: Vec<Snippet> = serde_json::from_str(&body)?;
        for snippet in &snippets {
            snippet.validate()?;
        }

        info!(count = snippets.len(), "snippets loaded");
        Ok(snippets)
    }

    /// POST a new snippet and return the stored record.
    pub async fn create_snippet(&self, payload: &NewSnippet) -> Result<Snippet> {
        debug!(endpoint = %self.endpoint, title = %payload.title, "creating snippet");

        let res = self.client.post(&self.endpoint).json(payload).send().await?;
        let status = res.status();
        if !status.is_success() {
            // The error body is optional and may not be JSON at all.
            let message = res
                .json::<ApiErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .filter(|message| !message.is_empty());
            warn!(status = status.as_u16(), ?message, "snippet create rejected");
            return Err(ClientError::CreateFailed {
                status: status.as_u16(),
                message,
            });
        }

        let body = res.text().await?;
        let created: Snippet = serde_json::from_str(&body)?;
        created.validate()?;

        info!(id = %created.id, "snippet created");
        Ok(created)
    }
}

/// Query parameters for a list request.
pub fn list_query(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut query = Vec::new();
    if let Some(language) = criteria.language.as_deref().filter(|l| !l.is_empty()) {
        query.push(("lang", language.to_string()));
    }
    if let Some(limit) = criteria.limit.filter(|l| *l > 0) {
        query.push(("limit", limit.to_string()));
    }
    query
}

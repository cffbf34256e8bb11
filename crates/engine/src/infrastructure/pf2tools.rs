//! character.pf2.tools client
//!
//! Implements the DocumentSource port over the service's public JSON API.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use sheetsync_domain::{Document, RemoteId};

use crate::infrastructure::ports::{DocumentSource, FetchError, Subresource};

/// Default API base URL.
pub const DEFAULT_SHEET_API_URL: &str = "http://character.pf2.tools/api/characters";

/// Client for the character sheet API
#[derive(Clone)]
pub struct Pf2ToolsClient {
    client: Client,
    base_url: String,
}

impl Pf2ToolsClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, 30)
    }

    /// Create client with custom timeout.
    pub fn with_timeout(base_url: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, remote_id: &RemoteId, subresource: Subresource) -> String {
        format!(
            "{}/{}{}",
            self.base_url,
            remote_id,
            subresource.path_suffix()
        )
    }
}

impl Default for Pf2ToolsClient {
    fn default() -> Self {
        Self::new(DEFAULT_SHEET_API_URL)
    }
}

#[async_trait]
impl DocumentSource for Pf2ToolsClient {
    async fn fetch(
        &self,
        remote_id: &RemoteId,
        subresource: Subresource,
    ) -> Result<Document, FetchError> {
        let url = self.url_for(remote_id, subresource);
        tracing::debug!(url = %url, subresource = %subresource, "Fetching sheet document");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Unreachable(e.to_string()))?;

        interpret_response(status, &body)
    }
}

/// Maps a raw HTTP answer onto the fetch error kinds.
fn interpret_response(status: u16, body: &str) -> Result<Document, FetchError> {
    match status {
        200..=299 => {}
        401 | 403 | 404 => return Err(FetchError::Unauthorized),
        500..=599 => return Err(FetchError::Unreachable(format!("HTTP {status}"))),
        other => return Err(FetchError::Unreachable(format!("unexpected HTTP {other}"))),
    }

    let document =
        Document::from_json_str(body).map_err(|e| FetchError::Malformed(e.to_string()))?;

    if !document.is_object() {
        return Err(FetchError::Malformed(
            "expected a JSON object at the top level".to_string(),
        ));
    }

    if document.contains_key("error") {
        return Err(FetchError::Unauthorized);
    }

    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_subresource_urls() {
        let client = Pf2ToolsClient::new("http://sheets.example/api/characters/");
        let id = RemoteId::new("abc123").unwrap();
        assert_eq!(
            client.url_for(&id, Subresource::Sheet),
            "http://sheets.example/api/characters/abc123"
        );
        assert_eq!(
            client.url_for(&id, Subresource::Activities),
            "http://sheets.example/api/characters/abc123/activities"
        );
    }

    #[test]
    fn success_body_becomes_document() {
        let doc = interpret_response(200, r#"{"data":{"name":"Kyra"},"values":{}}"#).unwrap();
        assert_eq!(doc.node().get_str(&["data", "name"], "").unwrap(), "Kyra");
    }

    #[test]
    fn error_payload_is_unauthorized() {
        assert_eq!(
            interpret_response(200, r#"{"error":"not public"}"#),
            Err(FetchError::Unauthorized)
        );
        assert_eq!(interpret_response(404, "nope"), Err(FetchError::Unauthorized));
    }

    #[test]
    fn server_failures_are_unreachable() {
        assert!(matches!(
            interpret_response(503, ""),
            Err(FetchError::Unreachable(_))
        ));
        assert!(matches!(
            interpret_response(429, ""),
            Err(FetchError::Unreachable(_))
        ));
    }

    #[test]
    fn unparsable_bodies_are_malformed() {
        assert!(matches!(
            interpret_response(200, "<html>"),
            Err(FetchError::Malformed(_))
        ));
        assert!(matches!(
            interpret_response(200, "[1,2]"),
            Err(FetchError::Malformed(_))
        ));
    }
}

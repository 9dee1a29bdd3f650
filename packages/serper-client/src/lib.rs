//! Pure Serper.dev REST API client.
//!
//! A minimal client for Serper's Google search API. One call per query;
//! the caller owns pacing and API-key selection, so the key is passed per
//! request rather than held by the client.
//!
//! # Example
//!
//! ```rust,ignore
//! use serper_client::{SearchQuery, SerperClient};
//!
//! let client = SerperClient::new();
//!
//! let query = SearchQuery::new("مطلوب شقة التجمع الخامس").locale("eg", "ar").num(20);
//! let response = client.search(&query, api_key).await?;
//! for hit in &response.organic {
//!     println!("{}", hit.snippet.as_deref().unwrap_or("(no snippet)"));
//! }
//! ```

pub mod error;
pub mod types;

pub use error::{Result, SerperError};
pub use types::{OrganicResult, SearchQuery, SearchResponse};

const BASE_URL: &str = "https://google.serper.dev";

pub struct SerperClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for SerperClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SerperClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Override the base URL (for test servers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Run one search. Returns the organic results; a 429 from the
    /// provider maps to [`SerperError::RateLimited`] so callers can
    /// apply their own cool-down.
    pub async fn search(&self, query: &SearchQuery, api_key: &str) -> Result<SearchResponse> {
        let url = format!("{}/search", self.base_url);
        let resp = self
            .client
            .post(&url)
            .header("X-API-KEY", api_key)
            .json(query)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 429 {
            tracing::warn!(q = %query.q, "Serper rate limit hit");
            return Err(SerperError::RateLimited);
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SerperError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let parsed: SearchResponse = resp.json().await?;
        tracing::debug!(q = %query.q, results = parsed.organic.len(), "Serper search completed");
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_serializes_without_empty_filters() {
        let query = SearchQuery::new("test");
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json, serde_json::json!({"q": "test"}));
    }

    #[test]
    fn query_builder_sets_locale_and_num() {
        let query = SearchQuery::new("مطلوب شقة").locale("eg", "ar").num(20);
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["gl"], "eg");
        assert_eq!(json["hl"], "ar");
        assert_eq!(json["num"], 20);
    }

    #[test]
    fn response_tolerates_missing_organic_section() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.organic.is_empty());
    }

    #[test]
    fn organic_result_parses_sparse_fields() {
        let parsed: SearchResponse = serde_json::from_str(
            r#"{"organic": [{"link": "https://example.com", "snippet": "للبيع شقة"}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.organic.len(), 1);
        assert!(parsed.organic[0].title.is_none());
        assert_eq!(parsed.organic[0].snippet.as_deref(), Some("للبيع شقة"));
    }
}

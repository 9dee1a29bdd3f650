use serde::{Deserialize, Serialize};

/// Body for the `/search` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SearchQuery {
    pub q: String,
    /// Country code for result localization (e.g. "eg").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gl: Option<String>,
    /// Interface language (e.g. "ar").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hl: Option<String>,
    /// Number of results to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub num: Option<u32>,
    /// Time-range filter in Serper's `tbs` syntax (e.g. "qdr:w").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tbs: Option<String>,
}

impl SearchQuery {
    /// A query with no locale or range filters.
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: q.into(),
            gl: None,
            hl: None,
            num: None,
            tbs: None,
        }
    }

    pub fn locale(mut self, gl: impl Into<String>, hl: impl Into<String>) -> Self {
        self.gl = Some(gl.into());
        self.hl = Some(hl.into());
        self
    }

    pub fn num(mut self, num: u32) -> Self {
        self.num = Some(num);
        self
    }

    pub fn time_range(mut self, tbs: impl Into<String>) -> Self {
        self.tbs = Some(tbs.into());
        self
    }
}

/// A single organic search result.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    pub title: Option<String>,
    pub link: String,
    pub snippet: Option<String>,
    pub position: Option<u32>,
}

/// Top-level response from the `/search` endpoint.
///
/// Serper returns more sections (knowledge graph, people-also-ask, ...);
/// only the organic list is consumed here.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

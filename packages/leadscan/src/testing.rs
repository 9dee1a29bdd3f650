//! In-memory fakes for hunt tests.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{SearchError, SinkError};
use crate::traits::{LeadSearcher, LeadSink};
use crate::types::{HuntSummary, LeadCandidate, SearchHit};

/// Scripted searcher: canned hits, optional error script, and a record
/// of every call made.
#[derive(Default)]
pub struct MockSearcher {
    hits: Vec<SearchHit>,
    /// Errors returned before any successful call, in order.
    error_script: Mutex<Vec<SearchError>>,
    calls: Mutex<Vec<RecordedCall>>,
}

/// One recorded search call.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub query: String,
    pub api_key: String,
}

impl MockSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return these hits from every successful call.
    pub fn with_hits(mut self, hits: Vec<SearchHit>) -> Self {
        self.hits = hits;
        self
    }

    /// Convenience: one hit with the given snippet text.
    pub fn with_snippet(self, url: &str, snippet: &str) -> Self {
        let mut hits = self.hits.clone();
        hits.push(SearchHit {
            url: url.to_string(),
            title: None,
            snippet: Some(snippet.to_string()),
        });
        Self { hits, ..self }
    }

    /// Fail the next calls with this script before succeeding.
    pub fn with_error_script(self, errors: Vec<SearchError>) -> Self {
        *self.error_script.lock().unwrap() = errors;
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadSearcher for MockSearcher {
    async fn search(
        &self,
        query: &str,
        api_key: &str,
        _max_results: u32,
    ) -> Result<Vec<SearchHit>, SearchError> {
        self.calls.lock().unwrap().push(RecordedCall {
            query: query.to_string(),
            api_key: api_key.to_string(),
        });

        let mut script = self.error_script.lock().unwrap();
        if !script.is_empty() {
            return Err(script.remove(0));
        }
        Ok(self.hits.clone())
    }
}

/// Upsert-semantics sink over a phone-keyed map.
#[derive(Default)]
pub struct MemorySink {
    leads: Mutex<HashMap<String, LeadCandidate>>,
    hunts: Mutex<Vec<HuntSummary>>,
    fail_upserts: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every upsert fail, to exercise the loop's resilience.
    pub fn failing() -> Self {
        Self {
            fail_upserts: true,
            ..Self::default()
        }
    }

    pub fn leads(&self) -> Vec<LeadCandidate> {
        self.leads.lock().unwrap().values().cloned().collect()
    }

    pub fn lead_count(&self) -> usize {
        self.leads.lock().unwrap().len()
    }

    pub fn lead(&self, phone: &str) -> Option<LeadCandidate> {
        self.leads.lock().unwrap().get(phone).cloned()
    }

    pub fn hunts(&self) -> Vec<HuntSummary> {
        self.hunts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LeadSink for MemorySink {
    async fn upsert_lead(&self, candidate: &LeadCandidate) -> Result<(), SinkError> {
        if self.fail_upserts {
            return Err(SinkError::msg("store unavailable"));
        }
        // Last write wins, like the store's ON CONFLICT DO UPDATE.
        self.leads
            .lock()
            .unwrap()
            .insert(candidate.phone.clone(), candidate.clone());
        Ok(())
    }

    async fn record_hunt(&self, summary: &HuntSummary) -> Result<(), SinkError> {
        self.hunts.lock().unwrap().push(summary.clone());
        Ok(())
    }
}

//! Trait seams between the hunt loop and the outside world.
//!
//! The loop never talks to a provider or a database directly; it drives
//! a [`LeadSearcher`] and a [`LeadSink`]. The server wires real
//! implementations, tests wire the fakes in [`crate::testing`].

use async_trait::async_trait;

use crate::error::{SearchError, SinkError};
use crate::types::{HuntSummary, LeadCandidate, SearchHit};

/// A search provider the hunt loop can query.
///
/// The API key is passed per call: key selection belongs to the pacer's
/// rotation, not to the provider client.
#[async_trait]
pub trait LeadSearcher: Send + Sync {
    async fn search(
        &self,
        query: &str,
        api_key: &str,
        max_results: u32,
    ) -> Result<Vec<SearchHit>, SearchError>;
}

/// Where discovered leads and run summaries land.
#[async_trait]
pub trait LeadSink: Send + Sync {
    /// Insert or refresh a lead keyed by its normalized phone. The
    /// implementation's upsert is the only duplicate guard in the
    /// system.
    async fn upsert_lead(&self, candidate: &LeadCandidate) -> Result<(), SinkError>;

    /// Record the write-once summary of a finished run.
    async fn record_hunt(&self, summary: &HuntSummary) -> Result<(), SinkError>;
}

//! Hunt dispatch and the adapters between the scan library and the
//! server's store and search provider.

use std::sync::Arc;

use async_trait::async_trait;
use leadscan::{
    run_hunt, HuntMode, HuntPlan, HuntSummary, LeadCandidate, LeadSearcher, LeadSink, Pacer,
    PacerConfig, SearchError, SearchHit, SinkError, Tier,
};
use serper_client::{SearchQuery, SerperClient, SerperError};
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use super::models::Hunt;
use crate::common::{ApiError, ApiResult};
use crate::domains::leads::models::{Lead, LeadSource, UpsertLead};

/// Serper-backed implementation of the scan library's search seam.
pub struct SerperSearcher {
    client: SerperClient,
}

impl SerperSearcher {
    pub fn new() -> Self {
        Self {
            client: SerperClient::new(),
        }
    }
}

impl Default for SerperSearcher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadSearcher for SerperSearcher {
    async fn search(
        &self,
        query: &str,
        api_key: &str,
        max_results: u32,
    ) -> Result<Vec<SearchHit>, SearchError> {
        let request = SearchQuery::new(query).locale("eg", "ar").num(max_results);
        match self.client.search(&request, api_key).await {
            Ok(response) => Ok(response
                .organic
                .into_iter()
                .map(|r| SearchHit {
                    url: r.link,
                    title: r.title,
                    snippet: r.snippet,
                })
                .collect()),
            Err(SerperError::RateLimited) => Err(SearchError::RateLimited),
            Err(e) => Err(SearchError::Provider(e.to_string())),
        }
    }
}

/// Postgres-backed implementation of the scan library's sink seam.
/// `record_hunt` doubles as the run finalizer.
pub struct PgLeadSink {
    pool: PgPool,
}

impl PgLeadSink {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// A discovered tier seeds the score the quality band derives from:
/// excellent lands hot, good lands warm.
fn tier_score(tier: Tier) -> f64 {
    match tier {
        Tier::Excellent => 4.0,
        Tier::Good => 2.5,
        Tier::Reject => 0.0,
    }
}

#[async_trait]
impl LeadSink for PgLeadSink {
    async fn upsert_lead(&self, candidate: &LeadCandidate) -> Result<(), SinkError> {
        let mut tags = vec![candidate.intent.clone(), candidate.tier.to_string()];
        if let Some(domain) = &candidate.source_domain {
            tags.push(domain.clone());
        }

        let input = UpsertLead {
            phone: candidate.phone.clone(),
            name: None,
            email: None,
            company: None,
            source: LeadSource::Hunt,
            score: tier_score(candidate.tier),
            notes: Some(candidate.snippet.chars().take(500).collect()),
            tags,
            created_by: Some(candidate.user_id),
        };

        Lead::upsert(input, &self.pool)
            .await
            .map_err(|e| SinkError(e.into()))?;
        Ok(())
    }

    async fn record_hunt(&self, summary: &HuntSummary) -> Result<(), SinkError> {
        Hunt::finalize(summary, &self.pool)
            .await
            .map_err(|e| SinkError(e.into()))
    }
}

/// Dispatches hunts as detached background runs. All runs share one
/// pacer, so concurrent hunts count against the same request window.
pub struct HuntService {
    pool: PgPool,
    pacer: Option<Arc<Pacer>>,
    searcher: Arc<dyn LeadSearcher>,
}

impl HuntService {
    pub fn new(pool: PgPool, api_keys: Vec<String>) -> Self {
        let pacer = if api_keys.is_empty() {
            None
        } else {
            Some(Arc::new(Pacer::new(PacerConfig::default(), api_keys)))
        };
        Self {
            pool,
            pacer,
            searcher: Arc::new(SerperSearcher::new()),
        }
    }

    /// Swap the search seam (tests).
    pub fn with_searcher(mut self, searcher: Arc<dyn LeadSearcher>) -> Self {
        self.searcher = searcher;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.pacer.is_some()
    }

    /// Validate, record the run, and dispatch it onto a detached task.
    /// Returns immediately with the running hunt row; there is no way
    /// to cancel a run once dispatched.
    pub async fn dispatch(
        &self,
        intent: &str,
        city: &str,
        mode: HuntMode,
        user_id: Uuid,
    ) -> ApiResult<Hunt> {
        let intent = intent.trim();
        let city = city.trim();
        if intent.len() < 2 || intent.len() > 200 {
            return Err(ApiError::Validation(
                "intent must be between 2 and 200 characters".into(),
            ));
        }
        if city.len() < 2 || city.len() > 50 {
            return Err(ApiError::Validation(
                "city must be between 2 and 50 characters".into(),
            ));
        }
        let pacer = self
            .pacer
            .clone()
            .ok_or_else(|| ApiError::Provider("search is not configured".into()))?;

        let hunt = Hunt::start(intent, city, &mode.to_string(), user_id, &self.pool)
            .await
            .map_err(ApiError::Internal)?;

        let plan = HuntPlan {
            intent: intent.to_string(),
            city: city.to_string(),
            user_id,
            mode,
        };
        let pool = self.pool.clone();
        let searcher = self.searcher.clone();
        let hunt_id = hunt.id;

        tokio::spawn(async move {
            let sink = PgLeadSink::new(pool.clone());
            if let Err(e) = run_hunt(hunt_id, &plan, searcher.as_ref(), &sink, &pacer).await {
                error!(hunt_id = %hunt_id, error = %e, "Hunt run failed");
                if let Err(e) = Hunt::mark_failed(hunt_id, &e.to_string(), &pool).await {
                    error!(hunt_id = %hunt_id, error = %e, "Could not mark hunt failed");
                }
            }
        });

        Ok(hunt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tier_scores_map_to_quality_bands() {
        use crate::domains::leads::models::LeadQuality;

        assert_eq!(LeadQuality::for_score(tier_score(Tier::Excellent)), LeadQuality::Hot);
        assert_eq!(LeadQuality::for_score(tier_score(Tier::Good)), LeadQuality::Warm);
    }
}

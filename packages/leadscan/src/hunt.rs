//! The hunt loop.
//!
//! Expands a city into areas, builds the query set per area, paces each
//! outbound call, classifies and extracts from every result snippet, and
//! upserts qualifying leads. Iteration is strictly sequential within one
//! run; concurrent runs share only the pacer.

use std::time::Instant;

use indexmap::IndexSet;
use tokio::time::sleep;
use tracing::{info, warn};
use uuid::Uuid;

use crate::classify::classify;
use crate::error::{Result, SearchError};
use crate::geo::expand_city;
use crate::pacing::Pacer;
use crate::phones::extract_phones;
use crate::queries::build_queries;
use crate::traits::{LeadSearcher, LeadSink};
use crate::types::{HuntPlan, HuntSummary, LeadCandidate, SearchHit};

/// Execute one hunt run to completion and record its summary.
///
/// Per-query provider failures never abort the run: a rate-limit
/// response earns one cool-down-and-retry, anything else is logged and
/// skipped. The summary is recorded even when every query failed.
pub async fn run_hunt(
    hunt_id: Uuid,
    plan: &HuntPlan,
    searcher: &dyn LeadSearcher,
    sink: &dyn LeadSink,
    pacer: &Pacer,
) -> Result<HuntSummary> {
    let started = Instant::now();
    let max_results = plan.mode.results_per_query();

    let mut queries_executed = 0u32;
    let mut results_scanned = 0u32;
    let mut leads_found = 0u32;
    let mut domains: IndexSet<String> = IndexSet::new();

    info!(
        hunt_id = %hunt_id,
        intent = %plan.intent,
        city = %plan.city,
        mode = %plan.mode,
        "Starting hunt"
    );

    for area in expand_city(&plan.city) {
        for query in build_queries(&plan.intent, &area) {
            let permit = pacer.acquire();
            sleep(permit.delay).await;
            queries_executed += 1;

            let hits = match searcher.search(&query, &permit.api_key, max_results).await {
                Ok(hits) => hits,
                Err(SearchError::RateLimited) => {
                    warn!(hunt_id = %hunt_id, query = %query, "Rate limited, cooling down");
                    sleep(pacer.cooldown()).await;

                    // One retry with a freshly rotated key, then move on.
                    let retry = pacer.acquire();
                    match searcher.search(&query, &retry.api_key, max_results).await {
                        Ok(hits) => hits,
                        Err(e) => {
                            warn!(hunt_id = %hunt_id, query = %query, error = %e, "Retry failed, skipping query");
                            continue;
                        }
                    }
                }
                Err(e) => {
                    warn!(hunt_id = %hunt_id, query = %query, error = %e, "Search failed, skipping query");
                    continue;
                }
            };

            results_scanned += hits.len() as u32;
            for hit in &hits {
                if let Some(domain) = hit.domain() {
                    domains.insert(domain);
                }
                leads_found += harvest_hit(hunt_id, plan, hit, sink).await;
            }
        }
    }

    let summary = HuntSummary {
        hunt_id,
        intent: plan.intent.clone(),
        city: plan.city.clone(),
        queries_executed,
        results_scanned,
        leads_found,
        domains: domains.into_iter().collect(),
        duration: started.elapsed(),
        mode: plan.mode,
    };

    sink.record_hunt(&summary).await?;

    info!(
        hunt_id = %hunt_id,
        queries = summary.queries_executed,
        results = summary.results_scanned,
        leads = summary.leads_found,
        duration_ms = summary.duration.as_millis(),
        "Hunt completed"
    );

    Ok(summary)
}

/// Classify one hit and upsert every phone it yields. Returns how many
/// upserts succeeded.
async fn harvest_hit(
    hunt_id: Uuid,
    plan: &HuntPlan,
    hit: &SearchHit,
    sink: &dyn LeadSink,
) -> u32 {
    let text = hit.text();
    let tier = classify(&text);
    if !tier.is_lead() {
        return 0;
    }

    let mut stored = 0u32;
    for phone in extract_phones(&text) {
        let candidate = LeadCandidate {
            phone,
            tier,
            snippet: text.clone(),
            source_domain: hit.domain(),
            intent: plan.intent.clone(),
            user_id: plan.user_id,
        };
        match sink.upsert_lead(&candidate).await {
            Ok(()) => stored += 1,
            Err(e) => {
                warn!(hunt_id = %hunt_id, phone = %candidate.phone, error = %e, "Lead upsert failed");
            }
        }
    }
    stored
}

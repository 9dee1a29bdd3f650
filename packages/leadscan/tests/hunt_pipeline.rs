//! End-to-end hunt pipeline tests over the in-memory fakes.

use std::time::Duration;

use leadscan::testing::{MemorySink, MockSearcher};
use leadscan::{
    run_hunt, HuntMode, HuntPlan, Pacer, PacerConfig, SearchError, SearchHit, Tier,
};
use uuid::Uuid;

fn fast_pacer(keys: &[&str]) -> Pacer {
    Pacer::new(
        PacerConfig {
            window: Duration::from_secs(60),
            baseline: Duration::from_millis(1),
            short: Duration::from_millis(1),
            medium: Duration::from_millis(1),
            longest: Duration::from_millis(1),
            cooldown: Duration::from_millis(5),
        },
        keys.iter().map(|k| k.to_string()).collect(),
    )
}

fn plan_for(city: &str) -> HuntPlan {
    HuntPlan {
        intent: "شقة في التجمع الخامس".to_string(),
        city: city.to_string(),
        user_id: Uuid::now_v7(),
        mode: HuntMode::Standard,
    }
}

#[tokio::test]
async fn buyer_snippet_becomes_an_excellent_lead() {
    let searcher = MockSearcher::new().with_snippet(
        "https://www.facebook.com/groups/aqarat/posts/1",
        "مطلوب شقة في التجمع الخامس 01012345678",
    );
    let sink = MemorySink::new();
    let pacer = fast_pacer(&["k1"]);
    let plan = plan_for("مدينة بدر");

    let summary = run_hunt(Uuid::now_v7(), &plan, &searcher, &sink, &pacer)
        .await
        .unwrap();

    assert_eq!(sink.lead_count(), 1);
    let lead = sink.lead("01012345678").expect("lead stored");
    assert_eq!(lead.tier, Tier::Excellent);
    assert_eq!(lead.intent, plan.intent);
    assert_eq!(lead.source_domain.as_deref(), Some("facebook.com"));
    assert!(summary.leads_found >= 1);
    assert_eq!(summary.domains, vec!["facebook.com"]);
}

#[tokio::test]
async fn seller_snippet_never_becomes_a_lead() {
    let searcher = MockSearcher::new().with_snippet(
        "https://olx.com.eg/ad/9",
        "للبيع شقة فرصة 01099998888",
    );
    let sink = MemorySink::new();
    let pacer = fast_pacer(&["k1"]);

    let summary = run_hunt(
        Uuid::now_v7(),
        &plan_for("مدينة بدر"),
        &searcher,
        &sink,
        &pacer,
    )
    .await
    .unwrap();

    assert_eq!(sink.lead_count(), 0);
    assert_eq!(summary.leads_found, 0);
    // The run still scanned the results and recorded a summary.
    assert!(summary.results_scanned > 0);
    assert_eq!(sink.hunts().len(), 1);
}

#[tokio::test]
async fn malformed_phones_are_never_stored() {
    let searcher = MockSearcher::new().with_snippet(
        "https://facebook.com/p/2",
        "مطلوب شقة بجدية اتصل 0101234567",
    );
    let sink = MemorySink::new();
    let pacer = fast_pacer(&["k1"]);

    run_hunt(
        Uuid::now_v7(),
        &plan_for("مدينة بدر"),
        &searcher,
        &sink,
        &pacer,
    )
    .await
    .unwrap();

    assert_eq!(sink.lead_count(), 0);
}

#[tokio::test]
async fn repeated_phone_upserts_to_a_single_lead() {
    let searcher = MockSearcher::new()
        .with_snippet("https://facebook.com/p/1", "مطلوب شقة 01012345678")
        .with_snippet("https://olx.com.eg/ad/2", "محتاج شقة كاش 010-1234-5678");
    let sink = MemorySink::new();
    let pacer = fast_pacer(&["k1"]);

    run_hunt(
        Uuid::now_v7(),
        &plan_for("مدينة بدر"),
        &searcher,
        &sink,
        &pacer,
    )
    .await
    .unwrap();

    assert_eq!(sink.lead_count(), 1);
}

#[tokio::test]
async fn rate_limit_is_retried_once_and_run_continues() {
    let searcher = MockSearcher::new()
        .with_snippet("https://facebook.com/p/1", "مطلوب شقة 01012345678")
        .with_error_script(vec![SearchError::RateLimited]);
    let sink = MemorySink::new();
    let pacer = fast_pacer(&["k1", "k2"]);

    let summary = run_hunt(
        Uuid::now_v7(),
        &plan_for("مدينة بدر"),
        &searcher,
        &sink,
        &pacer,
    )
    .await
    .unwrap();

    // 4 queries for an unknown city, plus one retry call.
    assert_eq!(searcher.calls().len(), 5);
    assert_eq!(summary.queries_executed, 4);
    assert_eq!(sink.lead_count(), 1);
}

#[tokio::test]
async fn provider_errors_skip_the_query_but_not_the_run() {
    let searcher = MockSearcher::new()
        .with_snippet("https://facebook.com/p/1", "مطلوب شقة 01012345678")
        .with_error_script(vec![
            SearchError::Provider("timeout".into()),
            SearchError::Provider("502".into()),
        ]);
    let sink = MemorySink::new();
    let pacer = fast_pacer(&["k1"]);

    let summary = run_hunt(
        Uuid::now_v7(),
        &plan_for("مدينة بدر"),
        &searcher,
        &sink,
        &pacer,
    )
    .await
    .unwrap();

    // Two queries lost to provider errors, the rest harvested.
    assert_eq!(summary.queries_executed, 4);
    assert_eq!(sink.lead_count(), 1);
    assert_eq!(sink.hunts().len(), 1);
}

#[tokio::test]
async fn failing_sink_does_not_abort_the_run() {
    let searcher =
        MockSearcher::new().with_snippet("https://facebook.com/p/1", "مطلوب شقة 01012345678");
    let sink = MemorySink::failing();
    let pacer = fast_pacer(&["k1"]);

    let summary = run_hunt(
        Uuid::now_v7(),
        &plan_for("مدينة بدر"),
        &searcher,
        &sink,
        &pacer,
    )
    .await
    .unwrap();

    assert_eq!(summary.leads_found, 0);
    assert!(summary.results_scanned > 0);
}

#[tokio::test]
async fn api_keys_rotate_across_calls() {
    let searcher = MockSearcher::new();
    let sink = MemorySink::new();
    let pacer = fast_pacer(&["a", "b"]);

    run_hunt(
        Uuid::now_v7(),
        &plan_for("مدينة بدر"),
        &searcher,
        &sink,
        &pacer,
    )
    .await
    .unwrap();

    let keys: Vec<String> = searcher.calls().iter().map(|c| c.api_key.clone()).collect();
    assert_eq!(keys, vec!["a", "b", "a", "b"]);
}

#[tokio::test]
async fn known_city_fans_out_to_every_sub_area() {
    let searcher = MockSearcher::new();
    let sink = MemorySink::new();
    let pacer = fast_pacer(&["k1"]);

    let summary = run_hunt(
        Uuid::now_v7(),
        &plan_for("القاهرة"),
        &searcher,
        &sink,
        &pacer,
    )
    .await
    .unwrap();

    let areas = leadscan::expand_city("القاهرة").len() as u32;
    assert_eq!(summary.queries_executed, areas * 4);
}

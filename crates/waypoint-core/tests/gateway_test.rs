//! Integration tests for the oracle gateway: memoization, TTL behavior,
//! parse fallbacks, and failure classification.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, Utc};

use waypoint_core::cache::{CACHE_TTL_SECS, ResponseCache};
use waypoint_core::model::ItineraryStyle;
use waypoint_core::oracle::gateway::suggestions_cache_key;
use waypoint_core::oracle::{Oracle, OracleError, OracleGateway, OracleRequest};

// ---------------------------------------------------------------------------
// Test oracle
// ---------------------------------------------------------------------------

/// Replays a scripted sequence of responses, recording every prompt.
struct ScriptedOracle {
    responses: Mutex<VecDeque<Result<String>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedOracle {
    fn new(responses: Vec<Result<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Oracle for &'static ScriptedOracle {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: &OracleRequest) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(request.prompt.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("scripted oracle exhausted")))
    }
}

/// Leak a scripted oracle so both the gateway and the assertions can see it.
fn scripted(responses: Vec<Result<String>>) -> (&'static ScriptedOracle, OracleGateway) {
    let oracle: &'static ScriptedOracle = Box::leak(Box::new(ScriptedOracle::new(responses)));
    let gateway = OracleGateway::new(Box::new(oracle), ResponseCache::in_memory());
    (oracle, gateway)
}

fn suggestion_json(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "country": name,
        "description": "Lovely.",
        "visa_note": "e-visa available",
        "average_cost": 900.0,
        "cost_breakdown": {"accommodation": 400.0, "food": 300.0, "activities": 200.0},
        "currency": {
            "code": "EUR", "symbol": "€",
            "usd_to_local_rate": 0.9, "usd_to_home_rate": 1.0
        }
    })
}

fn suggestions_body(names: &[&str]) -> Result<String> {
    let list: Vec<_> = names.iter().map(|n| suggestion_json(n)).collect();
    Ok(serde_json::to_string(&list).unwrap())
}

fn plan_body() -> Result<String> {
    Ok(serde_json::json!({
        "days": [{
            "day": 1,
            "title": "Rome",
            "activities": [{
                "name": "Colosseum",
                "description": "Amphitheatre",
                "city": "Rome",
                "kind": "Touristy",
                "average_cost": 20.0,
                "cost_breakdown": {"accommodation": 0.0, "food": 5.0, "activities": 15.0},
                "lat": 41.89,
                "lng": 12.49,
                "links": []
            }],
            "tips": []
        }],
        "optimization_note": "Go early.",
        "official_links": [],
        "city_stay_costs": []
    })
    .to_string())
}

// ---------------------------------------------------------------------------
// Memoization
// ---------------------------------------------------------------------------

#[tokio::test]
async fn identical_suggestion_requests_hit_oracle_once() {
    let (oracle, mut gateway) = scripted(vec![suggestions_body(&["Portugal"])]);

    let first = gateway.suggestions("Mid-range", "October", "Europe").await.unwrap();
    // Same parameters with incidental formatting differences.
    let second = gateway.suggestions(" mid-range ", "OCTOBER", "europe").await.unwrap();

    assert_eq!(oracle.call_count(), 1);
    assert_eq!(first, second);
    assert_eq!(first[0].name, "Portugal");
}

#[tokio::test]
async fn expired_entry_triggers_a_second_call() {
    let (oracle, mut gateway) = scripted(vec![
        suggestions_body(&["Portugal"]),
        suggestions_body(&["Vietnam"]),
    ]);

    gateway.suggestions("Budget", "June", "Asia").await.unwrap();
    assert_eq!(oracle.call_count(), 1);

    // Age the entry past the TTL, as if an hour passed.
    let key = suggestions_cache_key("Budget", "June", "Asia");
    let payload = serde_json::json!([suggestion_json("Portugal")]);
    gateway.cache_mut().set_at(
        &key,
        payload,
        Utc::now() - Duration::seconds(CACHE_TTL_SECS + 1),
    );

    let refreshed = gateway.suggestions("Budget", "June", "Asia").await.unwrap();
    assert_eq!(oracle.call_count(), 2);
    assert_eq!(refreshed[0].name, "Vietnam");
}

#[tokio::test]
async fn refinement_requests_are_never_cached() {
    let (oracle, mut gateway) = scripted(vec![plan_body(), plan_body()]);

    for _ in 0..2 {
        gateway
            .refine_plan("Italy", 1, ItineraryStyle::Mixed, &[], "more food", &[])
            .await
            .unwrap();
    }
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn distinct_parameters_are_distinct_entries() {
    let (oracle, mut gateway) = scripted(vec![
        suggestions_body(&["Portugal"]),
        suggestions_body(&["Chile"]),
    ]);

    gateway.suggestions("Budget", "June", "Europe").await.unwrap();
    let other = gateway.suggestions("Budget", "June", "South America").await.unwrap();

    assert_eq!(oracle.call_count(), 2);
    assert_eq!(other[0].name, "Chile");
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_payload_parses_to_empty_default() {
    let (_, mut gateway) = scripted(vec![Ok("   ".to_string())]);
    let list = gateway.suggestions("Budget", "June", "Asia").await.unwrap();
    assert!(list.is_empty());
}

#[tokio::test]
async fn empty_payload_for_plan_is_the_empty_plan() {
    let (_, mut gateway) = scripted(vec![Ok(String::new())]);
    let plan = gateway
        .full_plan("Italy", 3, ItineraryStyle::Mixed, "")
        .await
        .unwrap();
    assert!(plan.days.is_empty());
}

#[tokio::test]
async fn malformed_payload_is_a_parse_error() {
    let (_, mut gateway) = scripted(vec![Ok("{\"days\": \"not an array\"}".to_string())]);
    let err = gateway
        .full_plan("Italy", 3, ItineraryStyle::Mixed, "")
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::Parse { .. }));
    assert!(err.to_string().contains("create a travel plan for Italy"));
}

#[tokio::test]
async fn parse_failures_are_not_cached() {
    let (oracle, mut gateway) = scripted(vec![
        Ok("garbage".to_string()),
        suggestions_body(&["Portugal"]),
    ]);

    assert!(gateway.suggestions("Budget", "June", "Asia").await.is_err());
    let retry = gateway.suggestions("Budget", "June", "Asia").await.unwrap();
    assert_eq!(oracle.call_count(), 2);
    assert_eq!(retry[0].name, "Portugal");
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

#[tokio::test]
async fn quota_failures_get_actionable_guidance() {
    let (_, mut gateway) = scripted(vec![Err(anyhow!("provider said: RESOURCE EXHAUSTED"))]);
    let err = gateway.suggestions("Budget", "June", "Asia").await.unwrap_err();
    assert!(matches!(err, OracleError::Quota { .. }));
    assert!(err.to_string().contains("billing"));
}

#[tokio::test]
async fn generic_failures_name_the_action() {
    let (_, mut gateway) = scripted(vec![Err(anyhow!("connection refused"))]);
    let err = gateway
        .packing_list("Italy", 7, &["Colosseum".to_string()])
        .await
        .unwrap_err();
    assert!(matches!(err, OracleError::Transport { .. }));
    assert!(
        err.to_string()
            .contains("failed to generate a packing list for Italy")
    );
}

// ---------------------------------------------------------------------------
// Exclusion rendering
// ---------------------------------------------------------------------------

#[tokio::test]
async fn exclusion_fingerprints_render_human_readable() {
    let (oracle, mut gateway) = scripted(vec![plan_body()]);

    gateway
        .refine_plan(
            "Italy",
            1,
            ItineraryStyle::Mixed,
            &[],
            "notes",
            &["colosseum|rome".to_string(), "duomo|florence".to_string()],
        )
        .await
        .unwrap();

    let prompts = oracle.prompts.lock().unwrap();
    let prompt = &prompts[0];
    assert!(prompt.contains("- colosseum in rome"));
    assert!(prompt.contains("- duomo in florence"));
    assert!(!prompt.contains("colosseum|rome"));
    assert!(prompt.contains("MUST NOT include"));
}

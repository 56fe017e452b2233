use areaquery::collab::{Center, Element, IntentClassifier, QueryExecutor, QueryResponse};
use areaquery::config::AppConfig;
use areaquery::errors::AreaQueryError;
use areaquery::query::{CompiledQuery, ParseConfidence, telemetry};
use areaquery::service::{FilterSource, SearchService};
use serde_json::json;

use crate::integration_tests::SAMPLE_LOCK;

struct CannedExecutor;

impl QueryExecutor for CannedExecutor {
    fn execute(&self, query: &CompiledQuery) -> Result<QueryResponse, AreaQueryError> {
        let body = json!({"elements": [
            {"type": "node", "id": 1, "lat": 52.48, "lon": -1.90, "tags": {"amenity": query.values()[0], "name": "One"}},
            {"type": "way", "id": 2, "center": {"lat": 52.481, "lon": -1.901}, "tags": {"amenity": "cafe"}}
        ]});
        Ok(serde_json::from_value(body)?)
    }
}

struct DownExecutor;

impl QueryExecutor for DownExecutor {
    fn execute(&self, _query: &CompiledQuery) -> Result<QueryResponse, AreaQueryError> {
        Err(AreaQueryError::CollaboratorUnavailable("overpass: connection refused".into()))
    }
}

struct ProseClassifier;

impl IntentClassifier for ProseClassifier {
    fn classify(&self, _prompt: &str) -> Result<String, AreaQueryError> {
        Ok("Here are the filters: [\"amenity=cafe\", \"amenity=bar\"]".into())
    }
}

fn payload() -> serde_json::Value {
    json!([{"geometry": [
        {"lat": 52.4866351, "lng": -1.9114572},
        {"lat": 52.4773476, "lng": -1.9132928},
        {"lat": 52.4772993, "lng": -1.8930263},
        {"lat": 52.4827054, "lng": -1.8936392}
    ]}])
}

#[test]
fn classified_prompt_searches_with_alternation() {
    let svc = SearchService::new(AppConfig::default(), Box::new(CannedExecutor))
        .with_classifier(Box::new(ProseClassifier));
    let output = svc.classify_intent("drinks or coffee").unwrap();
    let outcome = svc.search(&payload(), Some(&output), None).unwrap();
    assert_eq!(
        outcome.filter_source,
        FilterSource::Classifier { confidence: ParseConfidence::Structured, values: vec!["cafe".into(), "bar".into()] }
    );
    assert_eq!(outcome.elements.len(), 2);
    assert_eq!(outcome.elements[1].center, Some(Center { lat: 52.481, lon: -1.901 }));
    assert!(outcome.elements.iter().all(|e: &Element| e.coordinate().is_some()));
}

#[test]
fn unreachable_executor_reports_degraded_outcome() {
    let before = telemetry::snapshot();
    let svc = SearchService::new(AppConfig::default(), Box::new(DownExecutor));
    let outcome = svc.search(&payload(), None, None).unwrap();
    assert!(outcome.is_degraded());
    assert!(outcome.elements.is_empty());
    assert_eq!(outcome.filter_source, FilterSource::Fallback { value: "restaurant".into() });
    let after = telemetry::snapshot();
    assert!(after.degraded_searches > before.degraded_searches);
    assert!(after.collaborator_failures > before.collaborator_failures);

    let v = serde_json::to_value(&outcome).unwrap();
    assert_eq!(v["filter_source"]["source"], "fallback");
    assert!(v["degraded"].as_str().unwrap().contains("connection refused"));
}

#[test]
fn configured_category_and_timeout_are_used() {
    let cfg = AppConfig { category_key: "shop".into(), default_category: "bakery".into(), timeout_secs: 60, ..AppConfig::default() };
    let svc = SearchService::new(cfg, Box::new(CannedExecutor));
    let outcome = svc.search(&payload(), Some("['amenity=cafe']"), None).unwrap();
    assert_eq!(outcome.filter_source, FilterSource::Fallback { value: "bakery".into() });
    assert!(outcome.query.as_str().starts_with("[out:json][timeout:60];"));
    assert!(outcome.query.as_str().contains(r#"["shop"="bakery"]"#));
}

#[test]
fn blank_default_category_is_rejected_instead_of_compiled() {
    let cfg = AppConfig { default_category: String::new(), ..AppConfig::default() };
    let svc = SearchService::new(cfg, Box::new(CannedExecutor));
    let err = svc.search(&payload(), None, None).unwrap_err();
    assert!(matches!(err, AreaQueryError::InvalidFilterSet(_)));
}

#[test]
fn sample_search_uses_current_sample() {
    let _guard = SAMPLE_LOCK.lock();
    areaquery::sample::reset_sample();
    let svc = SearchService::new(AppConfig::default(), Box::new(CannedExecutor));
    let outcome = svc.search_sample(Some(r#"["amenity=pub"]"#), None).unwrap();
    assert!(outcome.query.as_str().contains("52.4866351 -1.9114572"));
    assert_eq!(outcome.query.values(), &["pub".to_string()]);
}

#[test]
fn from_config_without_keys_has_no_optional_collaborators() {
    let cfg = AppConfig { classifier_api_key: None, places_api_key: None, ..AppConfig::default() };
    let svc = SearchService::from_config(cfg);
    assert_eq!(svc.classify_intent("anything"), None);
    assert!(matches!(svc.summarize_places(&[], 3, 3), Err(AreaQueryError::CollaboratorUnavailable(_))));
}

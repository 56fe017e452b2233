//! Search orchestration: polygon + classifier output in, geodata elements out.

use crate::collab::{
    Element, GeminiClassifier, GooglePlacesClient, IntentClassifier, OverpassClient, PlaceLookup, QueryExecutor,
};
use crate::config::AppConfig;
use crate::errors::AreaQueryError;
use crate::geometry::first_ring;
use crate::query::{
    CompiledQuery, ParseConfidence, compile_query_single, parse_filter_list_detailed, route_filters, telemetry,
};
use crate::sample;
use crate::summary::{PlaceSummary, summarize_places};
use crate::types::Ring;
use serde::Serialize;
use serde_json::Value;

/// Where the category values of a search came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum FilterSource {
    Classifier { confidence: ParseConfidence, values: Vec<String> },
    Fallback { value: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: CompiledQuery,
    pub filter_source: FilterSource,
    pub elements: Vec<Element>,
    /// Set when the executor failed; `elements` is then empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degraded: Option<String>,
}

impl SearchOutcome {
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.degraded.is_some()
    }
}

pub struct SearchService {
    cfg: AppConfig,
    executor: Box<dyn QueryExecutor>,
    classifier: Option<Box<dyn IntentClassifier>>,
    places: Option<Box<dyn PlaceLookup>>,
}

impl SearchService {
    pub fn new(cfg: AppConfig, executor: Box<dyn QueryExecutor>) -> Self {
        Self { cfg, executor, classifier: None, places: None }
    }

    #[must_use]
    pub fn with_classifier(mut self, classifier: Box<dyn IntentClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    #[must_use]
    pub fn with_places(mut self, places: Box<dyn PlaceLookup>) -> Self {
        self.places = Some(places);
        self
    }

    /// Wires the HTTP collaborators. Missing credentials leave the matching
    /// collaborator unset instead of failing.
    #[must_use]
    pub fn from_config(cfg: AppConfig) -> Self {
        let mut svc = Self::new(cfg.clone(), Box::new(OverpassClient::from_config(&cfg)));
        match GeminiClassifier::from_config(&cfg) {
            Ok(c) => svc.classifier = Some(Box::new(c)),
            Err(e) => log::info!("intent classification disabled: {e}"),
        }
        match GooglePlacesClient::from_config(&cfg) {
            Ok(p) => svc.places = Some(Box::new(p)),
            Err(e) => log::info!("place summaries disabled: {e}"),
        }
        svc
    }

    #[must_use]
    pub const fn config(&self) -> &AppConfig {
        &self.cfg
    }

    /// Raw classifier output for `prompt`, or `None` when no classifier is
    /// configured or it failed.
    pub fn classify_intent(&self, prompt: &str) -> Option<String> {
        let classifier = self.classifier.as_ref()?;
        match classifier.classify(prompt) {
            Ok(text) => Some(text),
            Err(e) => {
                log::warn!("intent classification failed: {e}");
                telemetry::record_collaborator_failure("classifier", &e.to_string());
                None
            }
        }
    }

    /// Compiles the outbound query for `ring`.
    ///
    /// Category values come from the classifier output when it yields any;
    /// otherwise the single `fallback` category (or the configured default) is used.
    ///
    /// # Errors
    /// Compiler errors only. A classifier output without usable filters is not an error.
    pub fn plan(
        &self,
        ring: &Ring,
        classifier_output: Option<&str>,
        fallback: Option<&str>,
    ) -> Result<(CompiledQuery, FilterSource), AreaQueryError> {
        let key = self.cfg.category_key.as_str();
        if let Some(output) = classifier_output {
            let parsed = parse_filter_list_detailed(output);
            match route_filters(&parsed.tags, ring, key, self.cfg.timeout_secs) {
                Ok(query) => {
                    let values = query.values().to_vec();
                    return Ok((query, FilterSource::Classifier { confidence: parsed.confidence, values }));
                }
                Err(AreaQueryError::NoUsableFilters) => {
                    log::info!(
                        "classifier output gave no '{key}' filters (strategy={}), using fallback",
                        parsed.strategy
                    );
                }
                Err(e) => return Err(e),
            }
        }
        let value = fallback
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .unwrap_or(self.cfg.default_category.as_str())
            .to_string();
        let query = compile_query_single(ring, key, &value, self.cfg.timeout_secs)?;
        Ok((query, FilterSource::Fallback { value }))
    }

    /// Searches the first polygon of a client payload.
    ///
    /// # Errors
    /// `InvalidGeometry` when the payload holds no polygon. An executor failure
    /// is reported through `SearchOutcome::degraded`, not as an error.
    pub fn search(
        &self,
        payload: &Value,
        classifier_output: Option<&str>,
        fallback: Option<&str>,
    ) -> Result<SearchOutcome, AreaQueryError> {
        let ring = first_ring(payload)
            .ok_or_else(|| AreaQueryError::InvalidGeometry("no polygon with usable points in payload".into()))?;
        self.search_ring(&ring, classifier_output, fallback)
    }

    /// [`search`](Self::search) against the process-wide current sample.
    ///
    /// # Errors
    /// Same as [`search`](Self::search).
    pub fn search_sample(
        &self,
        classifier_output: Option<&str>,
        fallback: Option<&str>,
    ) -> Result<SearchOutcome, AreaQueryError> {
        let ring = sample::with_sample(first_ring)
            .ok_or_else(|| AreaQueryError::InvalidGeometry("current sample holds no polygon".into()))?;
        self.search_ring(&ring, classifier_output, fallback)
    }

    /// # Errors
    /// Compiler errors from [`plan`](Self::plan).
    pub fn search_ring(
        &self,
        ring: &Ring,
        classifier_output: Option<&str>,
        fallback: Option<&str>,
    ) -> Result<SearchOutcome, AreaQueryError> {
        let (query, filter_source) = self.plan(ring, classifier_output, fallback)?;
        match self.executor.execute(&query) {
            Ok(resp) => {
                telemetry::record_search(resp.elements.len(), None);
                Ok(SearchOutcome { query, filter_source, elements: resp.elements, degraded: None })
            }
            Err(e) => {
                let reason = e.to_string();
                telemetry::record_collaborator_failure("executor", &reason);
                telemetry::record_search(0, Some(&reason));
                Ok(SearchOutcome { query, filter_source, elements: Vec::new(), degraded: Some(reason) })
            }
        }
    }

    /// Place details for the first `top_n` elements.
    ///
    /// # Errors
    /// `CollaboratorUnavailable` when no place lookup is configured.
    pub fn summarize_places(
        &self,
        elements: &[Element],
        top_n: usize,
        reviews_n: usize,
    ) -> Result<Vec<PlaceSummary>, AreaQueryError> {
        let places = self
            .places
            .as_deref()
            .ok_or_else(|| AreaQueryError::CollaboratorUnavailable("places: no lookup configured".into()))?;
        Ok(summarize_places(places, elements, top_n, reviews_n, &self.cfg.category_key))
    }
}

//! Outbound collaborators: query execution, intent classification and place details.
//!
//! The traits are the seams the service depends on; the HTTP clients are the
//! production implementations. Tests substitute in-memory doubles.

mod gemini;
mod overpass;
mod places;

pub use gemini::GeminiClassifier;
pub use overpass::OverpassClient;
pub use places::GooglePlacesClient;

use crate::errors::AreaQueryError;
use crate::query::CompiledQuery;
use crate::types::Coordinate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Runs a compiled query against the geodata service.
pub trait QueryExecutor: Send + Sync {
    /// # Errors
    /// `CollaboratorUnavailable` on transport or decode failure.
    fn execute(&self, query: &CompiledQuery) -> Result<QueryResponse, AreaQueryError>;
}

/// Turns a free-text request into unstructured classifier output.
pub trait IntentClassifier: Send + Sync {
    /// # Errors
    /// `CollaboratorUnavailable` when the classifier cannot be reached or answers nothing.
    fn classify(&self, prompt: &str) -> Result<String, AreaQueryError>;
}

/// Looks up rating and reviews for a named place near a coordinate.
pub trait PlaceLookup: Send + Sync {
    /// `Ok(None)` when the place is simply not known.
    ///
    /// # Errors
    /// `CollaboratorUnavailable` on transport or decode failure.
    fn lookup(&self, name: &str, at: Coordinate, radius_m: u32) -> Result<Option<PlaceDetails>, AreaQueryError>;
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Center {
    pub lat: f64,
    pub lon: f64,
}

/// One result entity. Points carry `lat`/`lon`; ways and relations carry `center`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Center>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl Element {
    /// Direct coordinates first, then the centroid.
    #[must_use]
    pub fn coordinate(&self) -> Option<Coordinate> {
        match (self.lat, self.lon, self.center) {
            (Some(lat), Some(lon), _) => Some(Coordinate::new(lat, lon)),
            (_, _, Some(c)) => Some(Coordinate::new(c.lat, c.lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author_name: Option<String>,
    pub author_url: Option<String>,
    pub rating: Option<f64>,
    pub relative_time_description: Option<String>,
    pub time: Option<i64>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceDetails {
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

pub(crate) fn http_agent(timeout: Duration) -> ureq::Agent {
    ureq::Agent::config_builder().timeout_global(Some(timeout)).build().into()
}

pub(crate) fn unavailable(collaborator: &'static str) -> impl Fn(ureq::Error) -> AreaQueryError {
    move |e| AreaQueryError::CollaboratorUnavailable(format!("{collaborator}: {e}"))
}

//! Place-detail summaries for the first few search results.

use crate::collab::{Element, PlaceLookup, Review};
use serde::Serialize;
use std::collections::BTreeMap;

/// Search radius around an element when looking up its details, in metres.
pub const LOOKUP_RADIUS_M: u32 = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceSummary {
    pub element_id: Option<i64>,
    pub osm_type: Option<String>,
    #[serde(flatten)]
    pub status: PlaceStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PlaceStatus {
    Skipped { reason: String },
    NotFound { name: String, lat: f64, lon: f64 },
    Found { name: String, lat: f64, lon: f64, rating: Option<f64>, reviews: Vec<Review> },
    Failed { name: String, lat: f64, lon: f64, error: String },
}

/// Human-searchable name from an element's tags.
///
/// `name`, `brand` or `operator`, then house number and street, then city.
/// Falls back to the category value when nothing else is tagged.
#[must_use]
pub fn build_search_name(tags: &BTreeMap<String, String>, category_key: &str) -> String {
    let get = |keys: &[&str]| first_tag(tags, keys);
    let mut parts: Vec<String> = Vec::new();
    if let Some(name) = get(&["name", "brand", "operator"]) {
        parts.push(name.to_string());
    }
    let street = get(&["addr:street", "addr:place"]);
    match (get(&["addr:housenumber"]), street) {
        (Some(number), Some(street)) => parts.push(format!("{number} {street}")),
        (Some(number), None) => parts.push(number.to_string()),
        (None, Some(street)) => parts.push(street.to_string()),
        (None, None) => {}
    }
    if let Some(city) = get(&["addr:city", "addr:town", "addr:village"]) {
        parts.push(city.to_string());
    }
    if parts.is_empty()
        && let Some(category) = get(&[category_key])
    {
        parts.push(category.to_string());
    }
    parts.join(" ")
}

fn first_tag<'a>(tags: &'a BTreeMap<String, String>, keys: &[&str]) -> Option<&'a str> {
    keys.iter().find_map(|k| tags.get(*k).map(|v| v.trim()).filter(|v| !v.is_empty()))
}

/// Looks up the first `top_n` elements. A failed lookup only marks its own entry.
pub fn summarize_places(
    lookup: &dyn PlaceLookup,
    elements: &[Element],
    top_n: usize,
    reviews_n: usize,
    category_key: &str,
) -> Vec<PlaceSummary> {
    elements
        .iter()
        .take(top_n)
        .map(|el| PlaceSummary {
            element_id: el.id,
            osm_type: el.kind.clone(),
            status: summarize_one(lookup, el, reviews_n, category_key),
        })
        .collect()
}

fn summarize_one(lookup: &dyn PlaceLookup, el: &Element, reviews_n: usize, category_key: &str) -> PlaceStatus {
    let Some(at) = el.coordinate() else {
        return PlaceStatus::Skipped { reason: "no lat/lon or center available in element".into() };
    };
    let name = build_search_name(&el.tags, category_key);
    if name.is_empty() {
        return PlaceStatus::Skipped { reason: "no searchable name in element tags".into() };
    }
    match lookup.lookup(&name, at, LOOKUP_RADIUS_M) {
        Ok(Some(details)) => PlaceStatus::Found {
            name: details.name.filter(|n| !n.is_empty()).unwrap_or(name),
            lat: at.lat,
            lon: at.lon,
            rating: details.rating,
            reviews: details.reviews.into_iter().take(reviews_n).collect(),
        },
        Ok(None) => PlaceStatus::NotFound { name, lat: at.lat, lon: at.lon },
        Err(e) => {
            log::warn!("place lookup failed for element {:?}: {e}", el.id);
            crate::query::telemetry::record_collaborator_failure("places", &e.to_string());
            PlaceStatus::Failed { name, lat: at.lat, lon: at.lon, error: e.to_string() }
        }
    }
}

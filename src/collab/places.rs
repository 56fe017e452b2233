use super::{PlaceDetails, PlaceLookup, http_agent, unavailable};
use crate::config::AppConfig;
use crate::errors::AreaQueryError;
use crate::types::Coordinate;
use serde_json::Value;
use std::time::Duration;
use ureq::Agent;

const NEARBY_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";
const DETAILS_URL: &str = "https://maps.googleapis.com/maps/api/place/details/json";
const DETAIL_FIELDS: &str = "name,rating,user_ratings_total,reviews";

/// Google Places lookup: nearby keyword search for a place id, then its details.
#[derive(Clone)]
pub struct GooglePlacesClient {
    api_key: String,
    agent: Agent,
}

impl GooglePlacesClient {
    /// # Errors
    /// `CollaboratorUnavailable` when no API key is configured.
    pub fn from_config(cfg: &AppConfig) -> Result<Self, AreaQueryError> {
        let api_key = cfg
            .places_api_key
            .clone()
            .ok_or_else(|| AreaQueryError::CollaboratorUnavailable("places: GMAPS_API_KEY not set".into()))?;
        Ok(Self { api_key, agent: http_agent(Duration::from_secs(cfg.http_timeout_secs)) })
    }

    fn get_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, AreaQueryError> {
        let mut req = self.agent.get(url);
        for (k, v) in params {
            req = req.query(*k, v.as_str());
        }
        let mut resp = req.query("key", self.api_key.as_str()).call().map_err(unavailable("places"))?;
        resp.body_mut().read_json().map_err(unavailable("places"))
    }

    fn find_place_id(&self, name: &str, at: Coordinate, radius_m: u32) -> Result<Option<String>, AreaQueryError> {
        let body = self.get_json(
            NEARBY_URL,
            &[
                ("location", format!("{},{}", at.lat, at.lon)),
                ("radius", radius_m.to_string()),
                ("keyword", name.to_string()),
            ],
        )?;
        if body.get("status").and_then(Value::as_str) != Some("OK") {
            return Ok(None);
        }
        Ok(body.pointer("/results/0/place_id").and_then(Value::as_str).map(str::to_string))
    }
}

impl PlaceLookup for GooglePlacesClient {
    fn lookup(&self, name: &str, at: Coordinate, radius_m: u32) -> Result<Option<PlaceDetails>, AreaQueryError> {
        let Some(place_id) = self.find_place_id(name, at, radius_m)? else {
            log::debug!("no place found for '{name}' near {at}");
            return Ok(None);
        };
        let body = self.get_json(DETAILS_URL, &[("place_id", place_id), ("fields", DETAIL_FIELDS.to_string())])?;
        if body.get("status").and_then(Value::as_str) != Some("OK") {
            return Ok(None);
        }
        match body.get("result") {
            Some(result) => serde_json::from_value(result.clone())
                .map(Some)
                .map_err(|e| AreaQueryError::CollaboratorUnavailable(format!("places: {e}"))),
            None => Ok(None),
        }
    }
}

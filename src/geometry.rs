//! Geometry extraction from loosely-structured client payloads.
//!
//! Clients send a list of entries, each carrying its drawn polygon(s) under
//! `geometry` (or the older `latlngs` field). The geometry is either a mapping
//! from layer key to a list of points, or a list of points directly. Points
//! name their axes with any of a few aliases. Nothing in here fails: malformed
//! entries and points are skipped, and rings that end up empty are dropped.

use crate::types::{Coordinate, Ring};
use serde_json::{Map, Value};

/// Entry fields holding the geometry, in lookup order.
const GEOMETRY_FIELDS: [&str; 2] = ["geometry", "latlngs"];
const LAT_ALIASES: [&str; 2] = ["lat", "latitude"];
const LON_ALIASES: [&str; 3] = ["lng", "lon", "longitude"];

/// Extracts every non-empty ring from a geometry payload.
///
/// Rings keep entry order, then key order within a mapping.
#[must_use]
pub fn extract_rings(payload: &Value) -> Vec<Ring> {
    let Some(entries) = payload.as_array() else {
        return Vec::new();
    };
    let mut rings = Vec::new();
    for entry in entries {
        let Some(geometry) = entry.as_object().and_then(geometry_of) else {
            continue;
        };
        match geometry {
            Value::Object(layers) => {
                for points in layers.values() {
                    if let Some(ring) = points.as_array().and_then(|p| ring_from_points(p)) {
                        rings.push(ring);
                    }
                }
            }
            Value::Array(points) => {
                if let Some(ring) = ring_from_points(points) {
                    rings.push(ring);
                }
            }
            _ => {}
        }
    }
    log::debug!("extracted {} ring(s) from {} entr(ies)", rings.len(), entries.len());
    rings
}

/// Convenience for callers that only ever use the first drawn polygon.
#[must_use]
pub fn first_ring(payload: &Value) -> Option<Ring> {
    extract_rings(payload).into_iter().next()
}

/// Builds a ring from a list of point-like objects; `None` when no point is valid.
#[must_use]
pub fn ring_from_points(points: &[Value]) -> Option<Ring> {
    let coords: Vec<Coordinate> = points.iter().filter_map(coordinate_of).collect();
    if coords.is_empty() { None } else { Some(Ring::new(coords)) }
}

/// Reads a coordinate from a point-like object. Both axes must be present and finite.
#[must_use]
pub fn coordinate_of(point: &Value) -> Option<Coordinate> {
    let obj = point.as_object()?;
    let lat = axis(obj, &LAT_ALIASES)?;
    let lon = axis(obj, &LON_ALIASES)?;
    Some(Coordinate::new(lat, lon))
}

fn geometry_of(entry: &Map<String, Value>) -> Option<&Value> {
    GEOMETRY_FIELDS.iter().find_map(|f| entry.get(*f).filter(|v| !v.is_null()))
}

// First alias present (case-insensitively) wins, even when its value is unusable.
fn axis(obj: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    let value = aliases.iter().find_map(|alias| {
        obj.get(*alias).filter(|v| !v.is_null()).or_else(|| {
            obj.iter().find(|(k, v)| k.eq_ignore_ascii_case(alias) && !v.is_null()).map(|(_, v)| v)
        })
    })?;
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}

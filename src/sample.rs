//! Process-wide "current sample" geometry.
//!
//! A single demo fixture that clients can overwrite. Every read-then-use and
//! every write happens under one exclusive lock, so a concurrent request never
//! sees a half-replaced payload. This is single-tenant state: real deployments
//! should pass the geometry with each request instead.

use crate::errors::AreaQueryError;
use crate::geometry::coordinate_of;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::sync::LazyLock;

static CURRENT_SAMPLE: LazyLock<Mutex<Value>> = LazyLock::new(|| Mutex::new(default_sample()));

/// Demo polygon over central Birmingham.
#[must_use]
pub fn default_sample() -> Value {
    json!([
        {
            "id": 144,
            "geometry": {
                "0": [
                    {"lat": 52.486_635_1, "lng": -1.911_457_2},
                    {"lat": 52.477_347_6, "lng": -1.913_292_8},
                    {"lat": 52.477_299_3, "lng": -1.893_026_3},
                    {"lat": 52.482_705_4, "lng": -1.893_639_2}
                ]
            }
        }
    ])
}

/// Replaces the sample with a single ring built from `points`; returns the number of points kept.
///
/// # Errors
/// `InvalidGeometry` when `points` holds no usable coordinate; the sample is left untouched.
pub fn set_sample(points: &[Value]) -> Result<usize, AreaQueryError> {
    let coords: Vec<Value> = points
        .iter()
        .filter_map(coordinate_of)
        .map(|c| json!({"lat": c.lat, "lng": c.lon}))
        .collect();
    if coords.is_empty() {
        return Err(AreaQueryError::InvalidGeometry("no valid lat/lon pairs in payload".into()));
    }
    let saved = coords.len();
    *CURRENT_SAMPLE.lock() = json!([{"id": null, "geometry": {"0": coords}}]);
    log::info!("current sample replaced ({saved} point(s))");
    Ok(saved)
}

/// Runs `f` against the sample while holding the lock.
pub fn with_sample<R>(f: impl FnOnce(&Value) -> R) -> R {
    let guard = CURRENT_SAMPLE.lock();
    f(&guard)
}

#[must_use]
pub fn current_sample() -> Value {
    with_sample(Value::clone)
}

pub fn reset_sample() {
    *CURRENT_SAMPLE.lock() = default_sample();
}

use serde::{Deserialize, Serialize};
use std::fmt;

/// Attribute every categorical filter acts on.
pub const DEFAULT_CATEGORY_KEY: &str = "amenity";
/// Category searched when no usable filters are available.
pub const DEFAULT_CATEGORY_VALUE: &str = "restaurant";
/// Output timeout declared in compiled queries, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u32 = 25;

/// A (latitude, longitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    #[must_use]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.lat, self.lon)
    }
}

/// One polygon boundary as drawn by the client. Not necessarily closed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ring(pub Vec<Coordinate>);

impl Ring {
    #[must_use]
    pub const fn new(points: Vec<Coordinate>) -> Self {
        Self(points)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    /// Exact comparison of first and last point; an empty ring is not closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        match (self.0.first(), self.0.last()) {
            (Some(first), Some(last)) => first == last,
            _ => false,
        }
    }

    /// Returns a copy with the first point appended when the ring is open.
    #[must_use]
    pub fn closed(&self) -> Self {
        let mut points = self.0.clone();
        if !self.is_closed()
            && let Some(first) = points.first().copied()
        {
            points.push(first);
        }
        Self(points)
    }
}

impl From<Vec<Coordinate>> for Ring {
    fn from(points: Vec<Coordinate>) -> Self {
        Self(points)
    }
}

impl From<Vec<(f64, f64)>> for Ring {
    fn from(points: Vec<(f64, f64)>) -> Self {
        Self(points.into_iter().map(|(lat, lon)| Coordinate::new(lat, lon)).collect())
    }
}

//! Geographic positions of nodes in the grid.
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A point on the map, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Latitude in degrees (positive north)
    pub lat: f64,
    /// Longitude in degrees (positive east)
    pub lng: f64,
}

impl Position {
    /// Create a new [`Position`]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Straight-line distance to another position, treating lat/lng as planar coordinates.
    ///
    /// This is only used to rank candidates against each other, so the lack of a proper
    /// great-circle calculation doesn't matter.
    pub fn distance_to(&self, other: &Position) -> f64 {
        (self.lat - other.lat).hypot(self.lng - other.lng)
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.lat, self.lng)
    }
}

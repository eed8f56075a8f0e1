//! Search configuration for nearby stops.

/// Configuration parameters for the nearest-stop search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Radius of the search circle in miles.
    pub radius_miles: f64,

    /// Maximum number of stops to return.
    pub max_results: usize,

    /// Number of vertices used to approximate the search circle.
    pub circle_vertices: usize,
}

impl SearchConfig {
    /// Create a new configuration with the given radius and result limit.
    pub fn new(radius_miles: f64, max_results: usize) -> Self {
        Self {
            radius_miles,
            max_results,
            ..Self::default()
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_miles: 0.5,
            max_results: 5,
            circle_vertices: 64,
        }
    }
}

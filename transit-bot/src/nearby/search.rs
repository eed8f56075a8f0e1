//! Circle search over the stop table.

use std::f64::consts::PI;

use geo::{BoundingRect, Contains, HaversineDestination, HaversineDistance, LineString, Point, Polygon, Rect};
use tracing::debug;

use crate::domain::{Coordinates, NearbyStop, StopRecord};

use super::config::SearchConfig;

pub const METERS_PER_MILE: f64 = 1609.344;

/// Fewer vertices than this and the "circle" stops resembling one.
const MIN_CIRCLE_VERTICES: usize = 8;

/// Mean earth radius, as used by `geo`'s haversine measures.
const EARTH_RADIUS_M: f64 = 6_371_008.8;

const PREFILTER_SLACK: f64 = 1.05;

/// Beyond these the lon/lat image of the circle is too distorted for a
/// straight-edged polygon to enclose it.
const PREFILTER_MAX_LAT: f64 = 85.0;
const PREFILTER_MAX_RADIUS_DEG: f64 = 1.0;

/// Stops within the configured radius of `(lat, lon)`, nearest first.
///
/// Returns an empty list for out-of-range coordinates instead of failing.
/// Stops at equal distance keep their order in `stops`.
pub fn find_nearest_stops(
    stops: &[StopRecord],
    lat: f64,
    lon: f64,
    config: &SearchConfig,
) -> Vec<NearbyStop> {
    match Coordinates::new(lat, lon) {
        Ok(center) => nearest_to(stops, center, config),
        Err(e) => {
            debug!(lat, lon, error = %e, "nearby search with unusable coordinates");
            Vec::new()
        }
    }
}

/// Like [`find_nearest_stops`], for coordinates that arrive as text.
pub fn find_nearest_stops_str(
    stops: &[StopRecord],
    lat: &str,
    lon: &str,
    config: &SearchConfig,
) -> Vec<NearbyStop> {
    match Coordinates::parse(lat, lon) {
        Ok(center) => nearest_to(stops, center, config),
        Err(e) => {
            debug!(lat, lon, error = %e, "nearby search with unusable coordinates");
            Vec::new()
        }
    }
}

pub(crate) fn nearest_to(
    stops: &[StopRecord],
    center: Coordinates,
    config: &SearchConfig,
) -> Vec<NearbyStop> {
    if config.radius_miles.is_nan() || config.radius_miles <= 0.0 || config.max_results == 0 {
        return Vec::new();
    }

    let origin = center.to_point();
    let radius_m = config.radius_miles * METERS_PER_MILE;
    let prefilter = search_region(center, radius_m, config.circle_vertices);
    if prefilter.is_none() {
        debug!(%center, radius_m, "no polygon prefilter for this circle, scanning all stops");
    }

    let mut matches: Vec<(f64, &StopRecord)> = stops
        .iter()
        .filter_map(|stop| {
            let point = stop.coordinates.to_point();
            if let Some((circle, bounds)) = &prefilter {
                if !rect_covers(bounds, point) || !circle.contains(&point) {
                    return None;
                }
            }
            let meters = origin.haversine_distance(&point);
            (meters <= radius_m).then_some((meters, stop))
        })
        .collect();

    // Vec::sort_by is stable, so ties keep snapshot order
    matches.sort_by(|a, b| a.0.total_cmp(&b.0));
    matches.truncate(config.max_results);

    matches
        .into_iter()
        .map(|(meters, stop)| NearbyStop {
            name: stop.name.clone(),
            rider_stop_number: stop.rider_stop_number.to_string(),
            distance_miles: meters / METERS_PER_MILE,
            coordinates: stop.coordinates.to_string(),
        })
        .collect()
}

/// A lon/lat polygon enclosing the search circle, and its bounding box.
///
/// Only a cheap prefilter: the haversine distance decides membership.
/// `None` when the circle comes near a pole, crosses the antimeridian or is
/// very large, where a lon/lat polygon cannot describe it.
fn search_region(
    center: Coordinates,
    radius_m: f64,
    vertices: usize,
) -> Option<(Polygon<f64>, Rect<f64>)> {
    let vertices = vertices.max(MIN_CIRCLE_VERTICES);
    // Circumscribe rather than inscribe, with slack for lon/lat distortion
    let outer_m = radius_m / (PI / vertices as f64).cos() * PREFILTER_SLACK;

    let angle = outer_m / EARTH_RADIUS_M;
    if angle.to_degrees() > PREFILTER_MAX_RADIUS_DEG
        || center.lat().abs() + angle.to_degrees() > PREFILTER_MAX_LAT
    {
        return None;
    }
    // Widest longitude reached by a small circle at this latitude
    let lon_extent = (angle.sin() / center.lat().to_radians().cos()).asin().to_degrees();
    if center.lon().abs() + lon_extent >= 180.0 {
        return None;
    }

    let circle = search_circle(center.to_point(), outer_m, vertices);
    let bounds = circle.bounding_rect()?;
    Some((circle, bounds))
}

/// Polygon with `vertices` corners at `radius_m` meters around `center`.
fn search_circle(center: Point<f64>, radius_m: f64, vertices: usize) -> Polygon<f64> {
    let ring: Vec<_> = (0..vertices)
        .map(|i| {
            let bearing = 360.0 * i as f64 / vertices as f64;
            center.haversine_destination(bearing, radius_m).0
        })
        .collect();
    Polygon::new(LineString::from(ring), vec![])
}

fn rect_covers(rect: &Rect<f64>, point: Point<f64>) -> bool {
    let (min, max) = (rect.min(), rect.max());
    (min.x..=max.x).contains(&point.x()) && (min.y..=max.y).contains(&point.y())
}

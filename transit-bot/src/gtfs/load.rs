//! Reading GTFS text files into a snapshot.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::{Coordinates, ServiceException, StopRecord};

use super::error::GtfsError;
use super::snapshot::{RouteNumbers, TransitSnapshot};

const STOPS_FILE: &str = "stops.txt";
const ROUTES_FILE: &str = "routes.txt";
const CALENDAR_DATES_FILE: &str = "calendar_dates.txt";

/// Files whose modification would change the snapshot.
pub(super) const WATCHED_FILES: [&str; 3] = [STOPS_FILE, ROUTES_FILE, CALENDAR_DATES_FILE];

#[derive(Debug, Deserialize)]
struct StopRow {
    stop_id: String,
    #[serde(default)]
    stop_code: Option<String>,
    #[serde(default)]
    stop_name: String,
    stop_lat: String,
    stop_lon: String,
}

#[derive(Debug, Deserialize)]
struct RouteRow {
    #[serde(default)]
    route_short_name: Option<String>,
    #[serde(default)]
    route_long_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CalendarDateRow {
    date: String,
    exception_type: String,
}

/// Load a snapshot from a GTFS directory.
///
/// `stops.txt` and `routes.txt` are required; `calendar_dates.txt` is optional.
/// Rows that cannot be interpreted are skipped with a warning rather than
/// failing the whole load.
pub fn load_snapshot(dir: &Path) -> Result<TransitSnapshot, GtfsError> {
    let stops = read_rows::<StopRow>(&dir.join(STOPS_FILE))?
        .into_iter()
        .filter_map(stop_record)
        .collect::<Vec<_>>();

    let routes = read_rows::<RouteRow>(&dir.join(ROUTES_FILE))?
        .into_iter()
        .filter_map(route_entry)
        .collect::<RouteNumbers>();

    let calendar_path = dir.join(CALENDAR_DATES_FILE);
    let exceptions = if calendar_path.exists() {
        read_rows::<CalendarDateRow>(&calendar_path)?
            .into_iter()
            .filter_map(service_exception)
            .collect()
    } else {
        debug!(path = %calendar_path.display(), "no calendar_dates.txt, assuming no exceptions");
        Vec::new()
    };

    Ok(TransitSnapshot::new(stops, routes, exceptions))
}

/// Modification times of the watched files, used to detect feed changes.
pub(super) fn fingerprint(dir: &Path) -> Vec<Option<SystemTime>> {
    WATCHED_FILES
        .iter()
        .map(|name| {
            std::fs::metadata(dir.join(name))
                .and_then(|m| m.modified())
                .ok()
        })
        .collect()
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &PathBuf) -> Result<Vec<T>, GtfsError> {
    let file = std::fs::File::open(path).map_err(|source| GtfsError::Io {
        path: path.clone(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(file);

    // A feed without a header row is unusable, unlike a single bad row
    reader.headers().map_err(|source| GtfsError::Csv {
        path: path.clone(),
        source,
    })?;

    let mut rows = Vec::new();
    for (line, record) in reader.deserialize::<T>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(e) => warn!(path = %path.display(), line = line + 2, error = %e, "skipping unreadable row"),
        }
    }
    Ok(rows)
}

fn stop_record(row: StopRow) -> Option<StopRecord> {
    let Ok(provider_stop_id) = row.stop_id.parse::<u32>() else {
        warn!(stop_id = %row.stop_id, "skipping stop with non-numeric stop_id");
        return None;
    };

    let rider_stop_number = match row.stop_code.as_deref().filter(|c| !c.is_empty()) {
        Some(code) => match code.parse::<u32>() {
            Ok(n) => n,
            Err(_) => {
                warn!(stop_id = %row.stop_id, stop_code = code, "skipping stop with non-numeric stop_code");
                return None;
            }
        },
        None => provider_stop_id,
    };

    let coordinates = match Coordinates::parse(&row.stop_lat, &row.stop_lon) {
        Ok(c) => c,
        Err(e) => {
            warn!(stop_id = %row.stop_id, error = %e, "skipping stop with bad location");
            return None;
        }
    };

    Some(StopRecord {
        rider_stop_number,
        provider_stop_id,
        coordinates,
        name: row.stop_name,
    })
}

fn route_entry(row: RouteRow) -> Option<(String, u32)> {
    let name = row.route_long_name.filter(|n| !n.is_empty())?;
    let number = row.route_short_name?.parse::<u32>().ok()?;
    Some((name, number))
}

fn service_exception(row: CalendarDateRow) -> Option<ServiceException> {
    let parsed = row
        .exception_type
        .parse::<u8>()
        .ok()
        .and_then(|t| ServiceException::parse(&row.date, t).ok());
    if parsed.is_none() {
        warn!(date = %row.date, exception_type = %row.exception_type, "skipping unreadable calendar date");
    }
    parsed
}

//! Immutable point-in-time view of the transit tables.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::NaiveDate;
use tracing::warn;

use crate::domain::{ServiceException, StopRecord};

/// Route name → public route number.
///
/// Names are matched case-insensitively and ignoring surrounding whitespace,
/// since the tracker and the GTFS feed disagree on capitalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteNumbers(HashMap<String, u32>);

impl RouteNumbers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, number: u32) {
        self.0.insert(normalize(name), number);
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.0.get(&normalize(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u32)> for RouteNumbers {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut routes = RouteNumbers::new();
        for (name, number) in iter {
            routes.insert(name.as_ref(), number);
        }
        routes
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_uppercase()
}

/// A complete, consistent copy of the transit tables.
#[derive(Debug, Clone, Default)]
pub struct TransitSnapshot {
    stops: Vec<StopRecord>,
    /// Rider stop number → index into `stops`.
    by_rider_number: HashMap<u32, usize>,
    routes: RouteNumbers,
    exceptions: Vec<ServiceException>,
}

impl TransitSnapshot {
    /// Build a snapshot.
    ///
    /// Stops keep their input order. If two stops share a rider stop number,
    /// the first one wins and the rest are dropped.
    pub fn new(
        stops: Vec<StopRecord>,
        routes: RouteNumbers,
        exceptions: Vec<ServiceException>,
    ) -> Self {
        let mut kept = Vec::with_capacity(stops.len());
        let mut by_rider_number = HashMap::with_capacity(stops.len());

        for stop in stops {
            match by_rider_number.entry(stop.rider_stop_number) {
                Entry::Occupied(_) => {
                    warn!(
                        rider_stop_number = stop.rider_stop_number,
                        provider_stop_id = stop.provider_stop_id,
                        "duplicate rider stop number, keeping the first"
                    );
                }
                Entry::Vacant(slot) => {
                    slot.insert(kept.len());
                    kept.push(stop);
                }
            }
        }

        Self {
            stops: kept,
            by_rider_number,
            routes,
            exceptions,
        }
    }

    /// A snapshot with no data (used before the first load succeeds).
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn stops(&self) -> &[StopRecord] {
        &self.stops
    }

    pub fn stop(&self, rider_stop_number: u32) -> Option<&StopRecord> {
        self.by_rider_number
            .get(&rider_stop_number)
            .map(|&idx| &self.stops[idx])
    }

    /// Tracker stop id for a rider-facing stop number.
    pub fn provider_stop_id(&self, rider_stop_number: u32) -> Option<u32> {
        self.stop(rider_stop_number).map(|s| s.provider_stop_id)
    }

    pub fn routes(&self) -> &RouteNumbers {
        &self.routes
    }

    pub fn exceptions(&self) -> &[ServiceException] {
        &self.exceptions
    }

    /// The no-service exception for `date`, if the calendar has one.
    pub fn service_exception_on(&self, date: NaiveDate) -> Option<&ServiceException> {
        self.exceptions
            .iter()
            .find(|e| e.date == date && e.is_no_service())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Coordinates;

    fn stop(rider: u32, provider: u32, name: &str) -> StopRecord {
        StopRecord {
            rider_stop_number: rider,
            provider_stop_id: provider,
            coordinates: Coordinates::new(61.2, -149.9).unwrap(),
            name: name.to_string(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn maps_rider_number_to_provider_id() {
        let snapshot = TransitSnapshot::new(
            vec![stop(1066, 5, "5TH & G"), stop(2051, 9, "DOWNTOWN")],
            RouteNumbers::new(),
            vec![],
        );
        assert_eq!(snapshot.provider_stop_id(1066), Some(5));
        assert_eq!(snapshot.provider_stop_id(2051), Some(9));
        assert_eq!(snapshot.provider_stop_id(1), None);
    }

    #[test]
    fn duplicate_rider_numbers_keep_first() {
        let snapshot = TransitSnapshot::new(
            vec![stop(1066, 5, "FIRST"), stop(1066, 6, "SECOND"), stop(7, 7, "OTHER")],
            RouteNumbers::new(),
            vec![],
        );
        assert_eq!(snapshot.provider_stop_id(1066), Some(5));
        assert_eq!(snapshot.stops().len(), 2);
        assert_eq!(snapshot.stops()[1].name, "OTHER");
    }

    #[test]
    fn route_lookup_ignores_case_and_padding() {
        let routes: RouteNumbers = [("Muldoon", 3), ("Airport", 7)].into_iter().collect();
        assert_eq!(routes.get("MULDOON"), Some(3));
        assert_eq!(routes.get("  airport "), Some(7));
        assert_eq!(routes.get("Eagle River"), None);
        assert_eq!(routes.len(), 2);
    }

    #[test]
    fn only_no_service_exceptions_match() {
        let exceptions = vec![
            ServiceException::parse("20261126", 1).unwrap(),
            ServiceException::parse("20261225", 2).unwrap(),
        ];
        let snapshot = TransitSnapshot::new(vec![], RouteNumbers::new(), exceptions);

        assert!(snapshot.service_exception_on(date(2026, 12, 25)).is_some());
        assert!(snapshot.service_exception_on(date(2026, 11, 26)).is_none());
        assert!(snapshot.service_exception_on(date(2026, 10, 19)).is_none());
    }

    #[test]
    fn empty_snapshot_has_nothing() {
        let snapshot = TransitSnapshot::empty();
        assert!(snapshot.stops().is_empty());
        assert!(snapshot.routes().is_empty());
        assert!(snapshot.exceptions().is_empty());
        assert_eq!(snapshot.provider_stop_id(1066), None);
    }
}

//! Plain-text rendering of replies for SMS-sized channels.

use std::fmt::Write;

use crate::domain::{ArrivalResult, RouteArrivals};
use crate::nearby::AddressStops;
use crate::pipeline::Reply;

pub const ABOUT_MESSAGE: &str = "I show upcoming People Mover buses. Text a stop number (like 1066) for arrival times, or a street address to find nearby stops.";

pub const EMPTY_INPUT_MESSAGE: &str =
    "Text a stop number (like 1066) or a street address to see upcoming buses.";

pub const NO_SERVICE_MESSAGE: &str = "There is no People Mover service today.";

/// Render a reply as rider-facing text.
pub fn reply_text(reply: &Reply) -> String {
    match reply {
        Reply::NoService { .. } => NO_SERVICE_MESSAGE.to_string(),
        Reply::EmptyInput => EMPTY_INPUT_MESSAGE.to_string(),
        Reply::About => ABOUT_MESSAGE.to_string(),
        Reply::Arrivals(timed) => arrivals_text(&timed.data),
        Reply::NearbyStops(timed) => nearby_text(&timed.data),
        Reply::Failure { message, .. } => message.clone(),
        Reply::Fallback(answer) => answer.clone(),
    }
}

fn arrivals_text(result: &ArrivalResult) -> String {
    let mut out = format!("Stop {}: {}", result.stop_number, result.stop_name);
    if result.routes.is_empty() {
        out.push_str("\nNo upcoming departures");
    }
    for route in &result.routes {
        let _ = write!(out, "\n{}: {}", route_label(route), join_times(route));
    }
    out
}

fn route_label(route: &RouteArrivals) -> String {
    match route.route_number {
        Some(n) => format!("{n} {}", route.route_name),
        None => route.route_name.clone(),
    }
}

fn join_times(route: &RouteArrivals) -> String {
    if route.times.is_empty() {
        return "no departures listed".to_string();
    }
    route
        .times
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

fn nearby_text(found: &AddressStops) -> String {
    let address = &found.geocode.formatted_address;
    if found.stops.is_empty() {
        return format!("No stops found near {address}");
    }

    let mut out = format!("Stops near {address}:");
    for stop in &found.stops {
        let _ = write!(
            out,
            "\n#{} {} ({:.2} mi)",
            stop.rider_stop_number, stop.name, stop.distance_miles
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Coordinates, Departure, FailureKind, NearbyStop, Timed};
    use crate::geocode::GeocodeResult;

    fn board(routes: Vec<RouteArrivals>) -> Reply {
        Reply::Arrivals(Timed::new(
            ArrivalResult {
                stop_name: "DOWNTOWN TRANSIT CENTER".into(),
                stop_number: 1066,
                routes,
                fetch_duration_ms: 0,
            },
            0,
        ))
    }

    #[test]
    fn arrivals_list_routes_in_order() {
        let mut muldoon = RouteArrivals::new("Muldoon", Some(3));
        muldoon.times = vec![Departure::Time("3:15 PM".into()), Departure::OutOfService];
        let mut shuttle = RouteArrivals::new("Airport Shuttle", None);
        shuttle.times = vec![Departure::Time("4:00 PM".into())];

        assert_eq!(
            reply_text(&board(vec![muldoon, shuttle])),
            "Stop 1066: DOWNTOWN TRANSIT CENTER\n\
             3 Muldoon: 3:15 PM, Out of Service\n\
             Airport Shuttle: 4:00 PM"
        );
    }

    #[test]
    fn empty_board() {
        assert_eq!(
            reply_text(&board(vec![])),
            "Stop 1066: DOWNTOWN TRANSIT CENTER\nNo upcoming departures"
        );
    }

    #[test]
    fn nearby_stops_with_distances() {
        let reply = Reply::NearbyStops(Timed::new(
            AddressStops {
                geocode: GeocodeResult {
                    formatted_address: "5th Ave & G St".into(),
                    coordinates: Coordinates::new(61.2176, -149.8953).unwrap(),
                },
                stops: vec![NearbyStop {
                    name: "5TH AVENUE & G STREET".into(),
                    rider_stop_number: "1066".into(),
                    distance_miles: 0.0123,
                    coordinates: "61.2176,-149.8953".into(),
                }],
            },
            40,
        ));
        assert_eq!(
            reply_text(&reply),
            "Stops near 5th Ave & G St:\n#1066 5TH AVENUE & G STREET (0.01 mi)"
        );
    }

    #[test]
    fn failures_show_only_the_rider_message() {
        let reply = Reply::Failure {
            kind: FailureKind::UnexpectedFormat,
            message: "Sorry, Bustracker is down".into(),
        };
        assert_eq!(reply_text(&reply), "Sorry, Bustracker is down");
    }

    #[test]
    fn fixed_messages() {
        assert_eq!(reply_text(&Reply::About), ABOUT_MESSAGE);
        assert_eq!(reply_text(&Reply::EmptyInput), EMPTY_INPUT_MESSAGE);
        assert_eq!(
            reply_text(&Reply::NoService {
                date: "20241225".into()
            }),
            NO_SERVICE_MESSAGE
        );
        assert_eq!(reply_text(&Reply::Fallback("hm".into())), "hm");
    }
}

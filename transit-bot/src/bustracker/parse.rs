//! Departure page parser.
//!
//! The tracker serves an HTML page per stop. We do not need DOM semantics,
//! only two kinds of text fragment found in document order:
//!
//! ```text
//! page      := ... heading ... (route departure*)*
//! heading   := <h1 ...> stop name [": " digits] </h1>         exactly one
//! route     := <div class='routeName'> name [" -" direction] </div>
//! departure := <div class='departure'> ("Done" | "HH:MM AM") </div>
//! ```
//!
//! Attribute quotes may be single or double and tag names are matched
//! case-insensitively. If the page layout changes, this module is the only
//! thing that needs to follow it.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::domain::{Departure, RouteArrivals};
use crate::gtfs::RouteNumbers;

/// Departure text the tracker uses once a route has finished for the day.
pub const FINISHED_TOKEN: &str = "Done";

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<h1(?:\s[^>]*)?>(.*?)</h1\s*>").unwrap());

static FRAGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is)<div\s+class\s*=\s*['"](routeName|departure)['"][^>]*>(.*?)</div\s*>"#,
    )
    .unwrap()
});

static STOP_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\s*\d+$").unwrap());

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Why a page could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("page has no <h1> heading")]
    MissingHeading,

    #[error("page has {0} <h1> headings, expected one")]
    MultipleHeadings(usize),
}

/// The useful content of a departure page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeparturePage {
    pub stop_name: String,
    pub routes: Vec<RouteArrivals>,
}

/// Parse a departure page.
///
/// Route numbers are filled in from `routes`; an unknown route name leaves
/// the number empty.
pub fn parse_departure_page(body: &str, routes: &RouteNumbers) -> Result<DeparturePage, ParseError> {
    let stop_name = parse_stop_name(body)?;

    let mut parsed: Vec<RouteArrivals> = Vec::new();
    for caps in FRAGMENT.captures_iter(body) {
        let text = fragment_text(&caps[2]);
        if caps[1].eq_ignore_ascii_case("routeName") {
            let name = bare_route_name(&text);
            let number = routes.get(name);
            parsed.push(RouteArrivals::new(name, number));
        } else if let Some(current) = parsed.last_mut() {
            current.times.push(normalize_departure(&text));
        } else {
            debug!(departure = %text, "departure before any route name, ignoring");
        }
    }

    Ok(DeparturePage {
        stop_name,
        routes: parsed,
    })
}

fn parse_stop_name(body: &str) -> Result<String, ParseError> {
    let mut headings = HEADING.captures_iter(body);
    let first = headings.next().ok_or(ParseError::MissingHeading)?;
    let extra = headings.count();
    if extra > 0 {
        return Err(ParseError::MultipleHeadings(extra + 1));
    }
    let text = fragment_text(&first[1]);
    Ok(STOP_SUFFIX.replace(&text, "").trim_end().to_string())
}

/// Strip tags and entities from a fragment and trim it.
fn fragment_text(raw: &str) -> String {
    let without_tags = TAG.replace_all(raw, "");
    decode_entities(without_tags.trim())
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_string()
}

/// The part of a route heading before its last `" -"`, e.g.
/// `"Muldoon - Outbound"` → `"Muldoon"`.
fn bare_route_name(text: &str) -> &str {
    match text.rsplit_once(" -") {
        Some((name, _)) => name.trim(),
        None => text,
    }
}

/// Convert departure text to a [`Departure`].
///
/// The finished token becomes [`Departure::OutOfService`]. Otherwise a single
/// leading zero is dropped ("03:15 PM" → "3:15 PM"), except for a "00:" hour,
/// which is kept as-is.
pub fn normalize_departure(text: &str) -> Departure {
    let text = text.trim();
    if text == FINISHED_TOKEN {
        return Departure::OutOfService;
    }
    match text.strip_prefix('0') {
        Some(rest) if !text.starts_with("00:") => Departure::Time(rest.to_string()),
        _ => Departure::Time(text.to_string()),
    }
}

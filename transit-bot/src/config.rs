//! Process configuration from environment variables.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use tracing::warn;

use crate::bustracker::BustrackerConfig;
use crate::geocode::GeocodeConfig;
use crate::gtfs::GtfsConfig;
use crate::nearby::SearchConfig;

/// A variable was set to something unusable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid {expected}")]
    Invalid {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Everything needed to start the bot.
#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bustracker: BustrackerConfig,
    pub geocode: GeocodeConfig,
    pub gtfs: GtfsConfig,
    pub search: SearchConfig,
    /// Zone used to decide what "today" is for the service calendar.
    pub timezone: Tz,
    pub bind_addr: SocketAddr,
}

impl BotConfig {
    /// Read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Read configuration through `lookup`, which returns a variable's value
    /// if set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout_secs = parse_or(&var, "UPSTREAM_TIMEOUT_SECS", 10u64, "number of seconds")?;

        let mut bustracker = BustrackerConfig::new().with_timeout(timeout_secs);
        if let Some(url) = var("BUSTRACKER_URL") {
            bustracker = bustracker.with_base_url(url);
        }

        let api_key = var("GEOCODER_API_KEY").unwrap_or_else(|| {
            warn!("GEOCODER_API_KEY not set, address lookups will fail");
            String::new()
        });
        let mut geocode = GeocodeConfig::new(api_key)
            .with_region(var("GEOCODER_REGION").unwrap_or_else(|| "AK".to_string()))
            .with_timeout(timeout_secs);
        if let Some(url) = var("GEOCODER_URL") {
            geocode = geocode.with_base_url(url);
        }

        let poll_secs = parse_or(&var, "GTFS_POLL_SECS", 60u64, "number of seconds")?;
        let gtfs = GtfsConfig::new(var("GTFS_DIR").unwrap_or_else(|| "gtfs".to_string()))
            .with_poll_interval(Duration::from_secs(poll_secs.max(1)));

        let radius_miles: f64 = parse_or(&var, "NEARBY_RADIUS_MILES", 0.5, "distance in miles")?;
        if !radius_miles.is_finite() || radius_miles <= 0.0 {
            return Err(ConfigError::Invalid {
                name: "NEARBY_RADIUS_MILES",
                value: radius_miles.to_string(),
                expected: "positive distance in miles",
            });
        }
        let max_results = parse_or(&var, "NEARBY_MAX_RESULTS", 5usize, "result count")?;
        let search = SearchConfig::new(radius_miles, max_results);

        let timezone = parse_or(&var, "TRANSIT_TZ", chrono_tz::America::Anchorage, "time zone")?;
        let bind_addr = parse_or(
            &var,
            "BIND_ADDR",
            SocketAddr::from(([127, 0, 0, 1], 8080)),
            "socket address",
        )?;

        Ok(Self {
            bustracker,
            geocode,
            gtfs,
            search,
            timezone,
            bind_addr,
        })
    }
}

fn parse_or<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            value,
            expected,
        }),
    }
}

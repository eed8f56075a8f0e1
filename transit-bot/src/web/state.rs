//! Application state for the web layer.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;

use crate::bustracker::BustrackerClient;
use crate::geocode::GeocodeClient;
use crate::gtfs::TransitData;
use crate::pipeline::{CannedFallback, Pipeline};

/// The pipeline wired to the real upstream clients.
pub type BotPipeline = Pipeline<BustrackerClient, GeocodeClient, CannedFallback>;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<BotPipeline>,

    /// Hot-swappable GTFS tables
    pub transit: TransitData,

    /// Transit agency's time zone
    pub timezone: Tz,
}

impl AppState {
    pub fn new(pipeline: BotPipeline, transit: TransitData, timezone: Tz) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            transit,
            timezone,
        }
    }

    /// Today's date where the buses run.
    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

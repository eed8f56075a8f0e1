//! Bus tracker HTTP client.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::domain::{ArrivalResult, LookupError, LookupOutcome, Timed, UPSTREAM_DOWN_MESSAGE, elapsed_ms};
use crate::events::{BotEvent, EventSink};
use crate::gtfs::RouteNumbers;
use crate::pipeline::ArrivalSource;

use super::error::BustrackerError;
use super::parse::parse_departure_page;

/// Default departures page for the Anchorage People Mover tracker.
const DEFAULT_BASE_URL: &str = "http://bustracker.muni.org/InfoPoint/departures.aspx";

/// Default request timeout. SMS gateways give up quickly, so keep it short.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for the tracker client.
#[derive(Debug, Clone)]
pub struct BustrackerConfig {
    /// Departures page URL; the stop id is sent as `?stopid=`
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl BustrackerConfig {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for BustrackerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Client for the tracker's per-stop departures page.
///
/// Every call makes exactly one request. There is no retry and no
/// de-duplication of concurrent requests for the same stop.
#[derive(Clone)]
pub struct BustrackerClient {
    http: reqwest::Client,
    base_url: String,
    sink: Arc<dyn EventSink>,
}

impl BustrackerClient {
    /// Create a new client. Unreadable pages are reported to `sink`.
    pub fn new(config: BustrackerConfig, sink: Arc<dyn EventSink>) -> Result<Self, BustrackerError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            sink,
        })
    }

    /// Fetch the raw departures page for a tracker stop id.
    ///
    /// Returns the body and how long the request took in milliseconds.
    pub async fn get_departure_page(&self, provider_stop_id: u32) -> Result<(String, u64), BustrackerError> {
        let start = Instant::now();

        let response = self
            .http
            .get(&self.base_url)
            .query(&[("stopid", provider_stop_id.to_string())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BustrackerError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok((body, elapsed_ms(start)))
    }

    /// Fetch and parse the departures for a tracker stop id.
    pub async fn get_arrivals(
        &self,
        provider_stop_id: u32,
        routes: &RouteNumbers,
    ) -> Result<ArrivalResult, BustrackerError> {
        let (body, fetch_duration_ms) = self.get_departure_page(provider_stop_id).await?;

        let page = match parse_departure_page(&body, routes) {
            Ok(page) => page,
            Err(source) => return Err(BustrackerError::Parse { source, body }),
        };

        debug!(
            provider_stop_id,
            routes = page.routes.len(),
            fetch_duration_ms,
            "parsed departure page"
        );

        Ok(ArrivalResult {
            stop_name: page.stop_name,
            stop_number: provider_stop_id,
            routes: page.routes,
            fetch_duration_ms,
        })
    }
}

impl ArrivalSource for BustrackerClient {
    async fn fetch_arrivals(
        &self,
        provider_stop_id: u32,
        routes: &RouteNumbers,
    ) -> LookupOutcome<ArrivalResult> {
        match self.get_arrivals(provider_stop_id, routes).await {
            Ok(result) => {
                let timing_ms = result.fetch_duration_ms;
                Ok(Timed::new(result, timing_ms))
            }
            Err(BustrackerError::Parse { source, body }) => {
                let detail = source.to_string();
                self.sink.record(BotEvent::UnexpectedFormat {
                    provider_stop_id,
                    detail: detail.clone(),
                    body,
                });
                Err(LookupError::UnexpectedFormat(detail))
            }
            Err(e) => {
                info!(provider_stop_id, error = %e, "bustracker unavailable");
                Err(LookupError::UpstreamDown(UPSTREAM_DOWN_MESSAGE.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::extract::Query;
    use axum::http::StatusCode;
    use axum::routing::get;
    use axum::{Router, response::Html};
    use serde::Deserialize;

    use super::*;
    use crate::domain::{Departure, FailureKind};
    use crate::events::testing::RecordingSink;
    use crate::testing::spawn_stub;

    #[derive(Deserialize)]
    struct StopQuery {
        stopid: u32,
    }

    async fn departures(Query(q): Query<StopQuery>) -> Html<String> {
        Html(format!(
            "<html><body><h1>STOP {id}: {id}</h1>\
             <div class='routeName'>Muldoon - Outbound</div>\
             <div class='departure'>03:15 PM</div>\
             <div class='departure'>Done</div></body></html>",
            id = q.stopid
        ))
    }

    fn routes() -> RouteNumbers {
        [("Muldoon", 3)].into_iter().collect()
    }

    fn client(base_url: String, sink: Arc<RecordingSink>) -> BustrackerClient {
        let config = BustrackerConfig::new().with_base_url(base_url).with_timeout(5);
        BustrackerClient::new(config, sink).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = BustrackerConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn config_builder() {
        let config = BustrackerConfig::new()
            .with_base_url("http://localhost:9000/departures")
            .with_timeout(3);
        assert_eq!(config.base_url, "http://localhost:9000/departures");
        assert_eq!(config.timeout_secs, 3);
    }

    #[tokio::test]
    async fn fetches_and_parses_page() {
        let base = spawn_stub(Router::new().route("/departures", get(departures))).await;
        let sink = Arc::new(RecordingSink::default());
        let client = client(format!("{base}/departures"), Arc::clone(&sink));

        let timed = client.fetch_arrivals(42, &routes()).await.unwrap();

        let result = timed.data;
        assert_eq!(result.stop_name, "STOP 42");
        assert_eq!(result.stop_number, 42);
        assert_eq!(result.routes.len(), 1);
        assert_eq!(result.routes[0].route_number, Some(3));
        assert_eq!(
            result.routes[0].times,
            vec![Departure::Time("3:15 PM".into()), Departure::OutOfService]
        );
        assert_eq!(timed.timing_ms, result.fetch_duration_ms);
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn not_found_status_is_upstream_down() {
        let base = spawn_stub(
            Router::new().route("/departures", get(|| async { StatusCode::NOT_FOUND })),
        )
        .await;
        let sink = Arc::new(RecordingSink::default());
        let client = client(format!("{base}/departures"), Arc::clone(&sink));

        let err = client.fetch_arrivals(42, &routes()).await.unwrap_err();

        assert_eq!(err, LookupError::UpstreamDown("Sorry, Bustracker is down".into()));
        assert!(sink.events().is_empty());
    }

    #[tokio::test]
    async fn unreachable_tracker_is_upstream_down() {
        // Bind then drop to get a port with nothing listening
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let sink = Arc::new(RecordingSink::default());
        let client = client(format!("http://{addr}/departures"), Arc::clone(&sink));

        let err = client.fetch_arrivals(42, &routes()).await.unwrap_err();
        assert_eq!(err.kind(), FailureKind::UpstreamDown);
        assert_eq!(err.rider_message(), UPSTREAM_DOWN_MESSAGE);
    }

    #[tokio::test]
    async fn missing_heading_is_reported_once() {
        const BODY: &str = "<html><body><p>Maintenance</p></body></html>";
        let base = spawn_stub(
            Router::new().route("/departures", get(|| async { Html(BODY) })),
        )
        .await;
        let sink = Arc::new(RecordingSink::default());
        let client = client(format!("{base}/departures"), Arc::clone(&sink));

        let err = client.fetch_arrivals(1234, &routes()).await.unwrap_err();

        assert_eq!(err.kind(), FailureKind::UnexpectedFormat);
        assert_eq!(err.rider_message(), UPSTREAM_DOWN_MESSAGE);
        let events = sink.events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            BotEvent::UnexpectedFormat {
                provider_stop_id,
                body,
                ..
            } => {
                assert_eq!(*provider_stop_id, 1234);
                assert_eq!(body, BODY);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[tokio::test]
    async fn concurrent_requests_for_same_stop_are_not_shared() {
        static HITS: AtomicUsize = AtomicUsize::new(0);
        async fn counting(q: Query<StopQuery>) -> Html<String> {
            HITS.fetch_add(1, Ordering::SeqCst);
            departures(q).await
        }

        let base = spawn_stub(Router::new().route("/departures", get(counting))).await;
        let sink = Arc::new(RecordingSink::default());
        let client = client(format!("{base}/departures"), sink);
        let routes = routes();

        let results = futures::future::join_all(
            (0..3).map(|_| client.fetch_arrivals(7, &routes)),
        )
        .await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(HITS.load(Ordering::SeqCst), 3);
    }
}

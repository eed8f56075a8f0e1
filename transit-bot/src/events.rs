//! Analytics and diagnostics side channel.
//!
//! Components receive an [`EventSink`] rather than reaching for a global
//! logger. Recording is fire-and-forget: implementations must not block the
//! request path and have no way to fail it.

use std::fmt;

use tracing::{error, info};

/// Coarse classification of how a request was answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Action {
    ServiceException,
    EmptyInput,
    About,
    StopLookup,
    FailedStopLookup,
    AddressLookup,
    FailedAddressLookup,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::ServiceException => "Service Exception",
            Action::EmptyInput => "Empty Input",
            Action::About => "About",
            Action::StopLookup => "Stop Lookup",
            Action::FailedStopLookup => "Failed Stop Lookup",
            Action::AddressLookup => "Address Lookup",
            Action::FailedAddressLookup => "Failed Address Lookup",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a request was about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    StopId(u32),
    GeocodedAddress(String),
    RawInput(String),
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::StopId(id) => write!(f, "stop {id}"),
            Subject::GeocodedAddress(address) => write!(f, "address {address:?}"),
            Subject::RawInput(input) => write!(f, "input {input:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Timings {
    /// Whole request, from sanitizing to reply.
    pub total_ms: u64,
    /// Time spent in the upstream call, if one was made.
    pub upstream_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRecord {
    pub action: Action,
    pub subject: Subject,
    pub timings: Timings,
}

/// Everything the side channel receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotEvent {
    /// One per answered request.
    Action(ActionRecord),

    /// The tracker returned a page the parser could not read.
    UnexpectedFormat {
        provider_stop_id: u32,
        detail: String,
        body: String,
    },

    /// The geocoder failed for a reason other than "no match".
    GeocoderFailure { input: String, detail: String },
}

/// Port for analytics and operator diagnostics.
pub trait EventSink: Send + Sync {
    fn record(&self, event: BotEvent);
}

/// Writes events as structured `tracing` records.
///
/// Actions go to the `analytics` target at info level; diagnostics are
/// logged as errors with their full payload attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: BotEvent) {
        match event {
            BotEvent::Action(record) => info!(
                target: "analytics",
                action = record.action.as_str(),
                subject = %record.subject,
                total_ms = record.timings.total_ms,
                upstream_ms = record.timings.upstream_ms,
                "request handled"
            ),
            BotEvent::UnexpectedFormat {
                provider_stop_id,
                detail,
                body,
            } => error!(
                provider_stop_id,
                %detail,
                %body,
                "bustracker returned an unreadable page"
            ),
            BotEvent::GeocoderFailure { input, detail } => {
                error!(%input, %detail, "geocoder request failed")
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use tracing_subscriber::fmt::MakeWriter;

    use super::*;

    #[test]
    fn action_tags() {
        assert_eq!(Action::StopLookup.to_string(), "Stop Lookup");
        assert_eq!(Action::FailedStopLookup.as_str(), "Failed Stop Lookup");
        assert_eq!(Action::EmptyInput.as_str(), "Empty Input");
        assert_eq!(Action::About.as_str(), "About");
        assert_eq!(Action::AddressLookup.as_str(), "Address Lookup");
    }

    #[test]
    fn subject_display() {
        assert_eq!(Subject::StopId(1066).to_string(), "stop 1066");
        assert_eq!(
            Subject::RawInput("hi there".into()).to_string(),
            "input \"hi there\""
        );
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn output(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn capture(f: impl FnOnce()) -> String {
        let captured = Captured::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(captured.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::with_default(subscriber, f);
        captured.output()
    }

    #[test]
    fn tracing_sink_logs_actions_under_analytics() {
        let output = capture(|| {
            TracingSink.record(BotEvent::Action(ActionRecord {
                action: Action::StopLookup,
                subject: Subject::StopId(1066),
                timings: Timings {
                    total_ms: 40,
                    upstream_ms: Some(31),
                },
            }))
        });

        assert!(output.contains("INFO"), "{output}");
        assert!(output.contains("analytics"), "{output}");
        assert!(output.contains("Stop Lookup"), "{output}");
        assert!(output.contains("stop 1066"), "{output}");
        assert!(output.contains("total_ms=40"), "{output}");
        assert!(output.contains("upstream_ms=31"), "{output}");
    }

    #[test]
    fn tracing_sink_logs_diagnostics_as_errors() {
        let output = capture(|| {
            TracingSink.record(BotEvent::UnexpectedFormat {
                provider_stop_id: 7,
                detail: "missing heading".into(),
                body: "<html></html>".into(),
            });
            TracingSink.record(BotEvent::GeocoderFailure {
                input: "5th and G".into(),
                detail: "REQUEST_DENIED".into(),
            });
        });

        let lines: Vec<_> = output.lines().collect();
        assert_eq!(lines.len(), 2, "{output}");
        assert!(lines[0].contains("ERROR"));
        assert!(lines[0].contains("provider_stop_id=7"));
        assert!(lines[0].contains("missing heading"));
        assert!(lines[0].contains("<html></html>"));
        assert!(lines[1].contains("ERROR"));
        assert!(lines[1].contains("5th and G"));
        assert!(lines[1].contains("REQUEST_DENIED"));
    }
}

//! Ordered input classifiers.
//!
//! Each classifier either claims the sanitized input or passes. The first
//! claim wins and anything left over is treated as an address.

use std::sync::LazyLock;

use regex::Regex;

static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Words that ask who we are rather than for a lookup.
pub const GREETINGS: [&str; 5] = ["about", "hi", "hello", "hey", "info"];

/// What a rider asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Blank,
    About,
    /// The digits of a stop number, not yet checked against the stop table.
    StopNumber(String),
    /// Anything else, passed to the geocoder verbatim.
    Address(String),
}

type Classifier = fn(&str) -> Option<Request>;

const CLASSIFIERS: [Classifier; 3] = [blank, greeting, stop_number];

/// Classify sanitized input.
pub fn classify(text: &str) -> Request {
    CLASSIFIERS
        .iter()
        .find_map(|classifier| classifier(text))
        .unwrap_or_else(|| Request::Address(text.to_string()))
}

fn blank(text: &str) -> Option<Request> {
    text.trim().is_empty().then_some(Request::Blank)
}

fn greeting(text: &str) -> Option<Request> {
    let word = text.trim();
    GREETINGS
        .iter()
        .any(|g| word.eq_ignore_ascii_case(g))
        .then_some(Request::About)
}

fn stop_number(text: &str) -> Option<Request> {
    let compact: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let digits = compact.replace("stop", "").replace('#', "");
    DIGITS
        .is_match(&digits)
        .then(|| Request::StopNumber(digits))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_input() {
        assert_eq!(classify(""), Request::Blank);
        assert_eq!(classify("   "), Request::Blank);
    }

    #[test]
    fn greetings_ignore_case_and_padding() {
        for text in ["about", "ABOUT", " About ", "hi", "Hello", "HEY", "info"] {
            assert_eq!(classify(text), Request::About, "{text:?}");
        }
    }

    #[test]
    fn greeting_must_be_the_whole_input() {
        assert_eq!(
            classify("hi there"),
            Request::Address("hi there".into())
        );
    }

    #[test]
    fn stop_numbers_in_various_spellings() {
        for text in ["1066", "stop 1066", "Stop #1066", "#1066", "10 66", "STOP1066"] {
            assert_eq!(classify(text), Request::StopNumber("1066".into()), "{text:?}");
        }
    }

    #[test]
    fn leading_zeros_survive_classification() {
        assert_eq!(classify("0042"), Request::StopNumber("0042".into()));
    }

    #[test]
    fn non_ascii_digits_are_an_address() {
        assert_eq!(classify("١٠٦٦"), Request::Address("١٠٦٦".into()));
        assert_eq!(classify("stop ١٠٦٦"), Request::Address("stop ١٠٦٦".into()));
    }

    #[test]
    fn bare_stop_word_is_an_address() {
        assert_eq!(classify("stop"), Request::Address("stop".into()));
        assert_eq!(classify("#"), Request::Address("#".into()));
    }

    #[test]
    fn anything_else_is_an_address_verbatim() {
        assert_eq!(
            classify("5th and G Street"),
            Request::Address("5th and G Street".into())
        );
        assert_eq!(
            classify("stop 12b"),
            Request::Address("stop 12b".into())
        );
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any digit run, however it is dressed up, classifies as that stop.
        #[test]
        fn dressed_up_numbers(n in 0u32..1_000_000, prefix in "(stop|STOP|Stop)? ?#? ?") {
            let text = format!("{prefix}{n}");
            prop_assert_eq!(classify(&text), Request::StopNumber(n.to_string()));
        }

        /// Classification never panics and never loses an address.
        #[test]
        fn addresses_pass_through(text in "[a-zA-Z][a-zA-Z0-9 &.,]{0,40}") {
            if let Request::Address(a) = classify(&text) {
                prop_assert_eq!(a, text);
            }
        }
    }
}

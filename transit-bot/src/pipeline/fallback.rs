//! Last-resort answers for input nothing else understood.

use std::future::Future;

/// Trait for the conversational fallback.
///
/// Only reached when no classifier matched and the address lookup found
/// nothing. An NLU backend can implement this; the bot ships with
/// [`CannedFallback`].
pub trait Fallback: Send + Sync {
    fn respond(&self, input: &str) -> impl Future<Output = String> + Send;
}

pub const DEFAULT_HELP_MESSAGE: &str =
    "Sorry, I didn't understand that. Text a stop number (like 1066) or a street address to see upcoming buses.";

/// Always answers with the same help text.
#[derive(Debug, Clone)]
pub struct CannedFallback {
    message: String,
}

impl CannedFallback {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for CannedFallback {
    fn default() -> Self {
        Self::new(DEFAULT_HELP_MESSAGE)
    }
}

impl Fallback for CannedFallback {
    async fn respond(&self, _input: &str) -> String {
        self.message.clone()
    }
}

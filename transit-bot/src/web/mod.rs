//! Web layer for the transit bot.
//!
//! Provides the SMS webhook and a small JSON API for the web channel.

mod dto;
mod routes;
mod state;
pub mod templates;
pub mod text;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, BotPipeline};
pub use templates::*;

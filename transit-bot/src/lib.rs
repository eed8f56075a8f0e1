//! Transit information bot.
//!
//! Answers free-text rider messages ("1066", "5th and G Street", "hi") with
//! live bus arrivals or nearby stops, over SMS and a small web API.

pub mod bustracker;
pub mod config;
pub mod domain;
pub mod events;
pub mod geocode;
pub mod gtfs;
pub mod nearby;
pub mod pipeline;
pub mod web;

#[cfg(test)]
mod testing;

//! Core domain + application logic for the daily card bot.
//!
//! This crate is intentionally framework-agnostic. Telegram and the card /
//! subscriber stores live behind ports (traits) implemented in adapter crates.

pub mod broadcast;
pub mod caption;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod ports;
pub mod schedule;

pub use errors::{Error, Result};

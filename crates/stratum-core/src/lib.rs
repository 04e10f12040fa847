//! Stratum Core - profile engine, toggle protocol, and switch engine
//!
//! This crate provides the mutating half of the system: the rename-based
//! toggle protocol, per-kind config mutations, the profile store, the
//! crash-safe active-profile switch engine, and the marketplace matcher.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::single_match_else,
    clippy::option_if_let_else,
    clippy::map_unwrap_or
)]

pub mod config;
pub mod marketplace;
pub mod profile;
pub mod switch;
pub mod toggle;
pub mod util;

pub use stratum_scanner;

pub use profile::{Profile, ProfileStore};
pub use switch::SwitchEngine;

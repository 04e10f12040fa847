//! Stratum Scanner - Claude Code configuration discovery
//!
//! This crate provides read-only scanning of Claude Code configuration
//! across user, project, project-local, and plugin scopes, plus the
//! scope resolver that folds redundant definitions into one effective
//! view per logical entity.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::too_many_lines,
    clippy::items_after_statements,
    clippy::single_match_else,
    clippy::match_same_arms,
    clippy::ref_option,
    clippy::option_if_let_else,
    clippy::needless_pass_by_value,
    clippy::map_unwrap_or,
    clippy::manual_let_else,
    clippy::unnecessary_wraps,
    clippy::unused_self
)]

pub mod artifacts;
pub mod cancel;
pub mod error;
pub mod layout;
pub mod mcp;
pub mod memory;
pub mod parser;
pub mod plugins;
pub mod resolve;
pub mod scan;
pub mod settings;
pub mod types;

pub use cancel::CancelToken;
pub use error::{ScanError, ScanResult};
pub use layout::ClaudeLayout;
pub use resolve::{resolve, EffectiveState, EffectiveView};
pub use scan::{Inventory, Scanner};
pub use types::{Definition, EntityKind, Scope};

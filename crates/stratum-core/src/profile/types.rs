//! Profile types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named alternative configuration for the tool.
///
/// `settings` is an opaque settings blob (environment variables, base
/// URLs, feature toggles); the engine never interprets it beyond
/// well-formedness. At most one profile carries `using == true`, and
/// only the switch engine flips that flag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    /// Unique identifier
    pub id: Uuid,
    /// Display title
    pub title: String,
    /// Settings blob written to the live configuration on activation
    pub settings: serde_json::Value,
    /// When the profile was created
    pub created_at: DateTime<Utc>,
    /// Whether this profile is currently applied to the live config
    #[serde(default)]
    pub using: bool,
}

impl Profile {
    /// Create a new inactive profile
    #[must_use]
    pub fn new(title: impl Into<String>, settings: serde_json::Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            settings,
            created_at: Utc::now(),
            using: false,
        }
    }
}

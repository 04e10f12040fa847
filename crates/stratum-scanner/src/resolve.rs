//! Scope resolution
//!
//! Folds the raw per-scope definitions of one entity kind into a single
//! effective view per logical name. This is a pure function over
//! precedence-ranked tagged variants; nothing here touches the
//! filesystem.

use crate::types::{Definition, EntityKind, Scope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Resolved three-valued entity state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectiveState {
    /// Definition exists, no disable marker, nothing shadows it
    Enabled,
    /// Definition carries a disable marker at its own scope
    Disabled,
    /// Enabled at its native scope, but a higher-precedence layer turns
    /// the capability off; user intent is preserved
    RuntimeDisabled,
}

impl std::fmt::Display for EffectiveState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Enabled => write!(f, "enabled"),
            Self::Disabled => write!(f, "disabled"),
            Self::RuntimeDisabled => write!(f, "runtime-disabled"),
        }
    }
}

/// The effective view of one logical entity after scope resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveView {
    /// Logical name
    pub name: String,
    /// Entity kind
    pub kind: EntityKind,
    /// Resolved state
    pub state: EffectiveState,
    /// Scope owning the effective state
    pub scope: Scope,
    /// Whether the owning scope permits rename/write operations
    pub controllable: bool,
    /// The authoring definition: highest-precedence non-plugin
    /// definition that exists. Absent for plugin-only entities.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authoring: Option<Definition>,
    /// Every definition that contributed to this view
    pub definitions: Vec<Definition>,
    /// Malformed-content error carried from the winning definition
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Resolve raw definitions into one effective view per logical name.
///
/// Views come back sorted by name so callers get stable output without
/// re-sorting.
#[must_use]
pub fn resolve(definitions: Vec<Definition>) -> Vec<EffectiveView> {
    let mut groups: BTreeMap<String, Vec<Definition>> = BTreeMap::new();
    for def in definitions {
        groups.entry(def.name.clone()).or_default().push(def);
    }

    groups
        .into_iter()
        .map(|(name, group)| resolve_group(name, group))
        .collect()
}

fn resolve_group(name: String, mut group: Vec<Definition>) -> EffectiveView {
    debug_assert!(!group.is_empty());
    let kind = group[0].kind;

    // Precedence-ranked ordering; same-scope duplicates tie-break on
    // most recent modification (defensive, not a supported layout).
    group.sort_by(|a, b| {
        b.scope
            .precedence()
            .cmp(&a.scope.precedence())
            .then_with(|| b.modified_at.cmp(&a.modified_at))
    });

    let authoring = group
        .iter()
        .find(|def| !def.scope.is_plugin() && def.exists)
        .cloned();

    // The definition whose state decides the view: the authoring one,
    // or the best plugin definition when no user-editable one exists.
    let winner = authoring
        .as_ref()
        .or_else(|| group.first())
        .cloned()
        .unwrap_or_else(|| group[0].clone());

    let error = winner.error.clone();

    let state = if error.is_some() {
        // Never report a broken definition as enabled.
        EffectiveState::Disabled
    } else if winner.disabled {
        EffectiveState::Disabled
    } else if winner.suppressed || winner.plugin.as_ref().is_some_and(|p| !p.enabled) {
        EffectiveState::RuntimeDisabled
    } else {
        EffectiveState::Enabled
    };

    let controllable = authoring
        .as_ref()
        .is_some_and(|def| def.scope.is_writable());

    EffectiveView {
        name,
        kind,
        state,
        scope: winner.scope,
        controllable,
        authoring,
        definitions: group,
        error,
    }
}

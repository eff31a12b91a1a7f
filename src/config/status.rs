//! Status mapping: symbolic phases to concrete workflow status names.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoEnumIterator};

use super::ConfigError;

/// A development phase, independent of how a tracker installation names it.
///
/// Closed set; ordering follows the lifecycle.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Phase {
    Working,
    Review,
    Testing,
    Done,
}

/// Mapping of each phase to a concrete status name.
pub type PhaseMap = BTreeMap<Phase, String>;

/// Whether two tracker status names are the same, ignoring case.
pub fn same_status(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// Trait for merging configuration layers.
///
/// `other` takes precedence for every key it sets.
pub trait Merge {
    fn merge_with(&self, other: &Self) -> Self;
}

impl Merge for PhaseMap {
    fn merge_with(&self, other: &Self) -> Self {
        let mut merged = self.clone();
        merged.extend(other.iter().map(|(phase, status)| (*phase, status.clone())));
        merged
    }
}

/// The `jira.status` section: default phase names plus per-issue-type overrides.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub default: PhaseMap,
    /// Keyed by lower-cased issue type name.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub types: IndexMap<String, PhaseMap>,
}

impl Merge for StatusConfig {
    fn merge_with(&self, other: &Self) -> Self {
        let default = self.default.merge_with(&other.default);
        let mut types = self.types.clone();
        for (issue_type, overrides) in &other.types {
            let merged = match types.get(issue_type) {
                Some(base) => base.merge_with(overrides),
                None => overrides.clone(),
            };
            types.insert(issue_type.clone(), merged);
        }
        Self { default, types }
    }
}

impl StatusConfig {
    /// Lower-case the issue type keys so lookups are case-insensitive.
    ///
    /// When two keys collide after lower-casing, the later one's entries win.
    pub fn normalized(self) -> Self {
        let mut types: IndexMap<String, PhaseMap> = IndexMap::new();
        for (issue_type, phases) in self.types {
            let key = issue_type.to_lowercase();
            let merged = match types.get(&key) {
                Some(existing) => existing.merge_with(&phases),
                None => phases,
            };
            types.insert(key, merged);
        }
        Self {
            default: self.default,
            types,
        }
    }

    /// True when at least one mapping is configured.
    pub fn has_status_config(&self) -> bool {
        !self.default.is_empty() || !self.types.is_empty()
    }

    /// Concrete status for `phase` on an issue of `issue_type`.
    ///
    /// The issue type's own mapping wins over the defaults.
    pub fn resolve(&self, issue_type: &str, phase: Phase) -> Result<&str, ConfigError> {
        self.types
            .get(&issue_type.to_lowercase())
            .and_then(|phases| phases.get(&phase))
            .or_else(|| self.default.get(&phase))
            .map(String::as_str)
            .ok_or_else(|| ConfigError::NoStatusMapping {
                issue_type: issue_type.to_string(),
                phase,
            })
    }

    /// Phase whose concrete status is `status` (case-insensitive), if any.
    pub fn reverse(&self, issue_type: &str, status: &str) -> Option<Phase> {
        let find = |phases: &PhaseMap| {
            phases
                .iter()
                .find(|(_, concrete)| same_status(concrete, status))
                .map(|(phase, _)| *phase)
        };

        self.types
            .get(&issue_type.to_lowercase())
            .and_then(find)
            .or_else(|| find(&self.default))
    }

    /// Seed configuration written by `wt jira config --init`.
    pub fn template() -> Self {
        let default = Phase::iter()
            .map(|phase| {
                let status = match phase {
                    Phase::Working => "In Progress",
                    Phase::Review => "In Review",
                    Phase::Testing => "Testing",
                    Phase::Done => "Done",
                };
                (phase, status.to_string())
            })
            .collect();
        Self {
            default,
            types: IndexMap::new(),
        }
    }

    /// Every configured mapping as `(scope, phase, status)`, defaults first.
    ///
    /// `scope` is `default` or the issue type.
    pub fn entries(&self) -> Vec<(&str, Phase, &str)> {
        let defaults = self
            .default
            .iter()
            .map(|(phase, status)| ("default", *phase, status.as_str()));
        let per_type = self.types.iter().flat_map(|(issue_type, phases)| {
            phases
                .iter()
                .map(move |(phase, status)| (issue_type.as_str(), *phase, status.as_str()))
        });
        defaults.chain(per_type).collect()
    }
}

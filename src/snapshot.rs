use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Result of one aggregation pass: module name to healthy flag.
///
/// Serialises as a flat JSON object, e.g. `{"database":true,"frontend":false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusSnapshot {
    #[serde(flatten)]
    statuses: BTreeMap<String, bool>,
    #[serde(skip)]
    checked_at: DateTime<Utc>,
}

impl StatusSnapshot {
    pub fn new(statuses: BTreeMap<String, bool>, checked_at: DateTime<Utc>) -> Self {
        Self {
            statuses,
            checked_at,
        }
    }

    pub fn get(&self, module: &str) -> Option<bool> {
        self.statuses.get(module).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.statuses.iter().map(|(name, healthy)| (name.as_str(), *healthy))
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }

    pub fn healthy_count(&self) -> usize {
        self.statuses.values().filter(|healthy| **healthy).count()
    }

    pub fn checked_at(&self) -> DateTime<Utc> {
        self.checked_at
    }

    pub fn statuses(&self) -> &BTreeMap<String, bool> {
        &self.statuses
    }
}

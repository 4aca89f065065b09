//! Metric set filtering.
//!
//! Every metric definition belongs to exactly one [`MetricSet`]. Operators
//! enable whole families of metrics at once through the configuration, and
//! collectors consult the resulting [`MetricSets`] before describing or
//! emitting anything.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Classification tag attached to every metric definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricSet {
    /// Minimal set, always useful.
    Base,
    /// Drops, failures and error paths.
    Errors,
    /// Datapath and slow-path performance counters.
    Perf,
    /// General bookkeeping counters.
    Counters,
    /// Internals that are mostly interesting to OVS developers.
    Debug,
}

impl MetricSet {
    /// All known sets in declaration order.
    pub const ALL: [MetricSet; 5] = [
        MetricSet::Base,
        MetricSet::Errors,
        MetricSet::Perf,
        MetricSet::Counters,
        MetricSet::Debug,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricSet::Base => "base",
            MetricSet::Errors => "errors",
            MetricSet::Perf => "perf",
            MetricSet::Counters => "counters",
            MetricSet::Debug => "debug",
        }
    }
}

impl fmt::Display for MetricSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Error returned when a metric set name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown metric set '{0}', expected one of: base, errors, perf, counters, debug")]
pub struct UnknownMetricSet(pub String);

impl FromStr for MetricSet {
    type Err = UnknownMetricSet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MetricSet::ALL
            .into_iter()
            .find(|set| set.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownMetricSet(wanted.to_string()))
    }
}

/// Immutable collection of enabled metric sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MetricSets(BTreeSet<MetricSet>);

impl MetricSets {
    pub fn new<I: IntoIterator<Item = MetricSet>>(sets: I) -> Self {
        Self(sets.into_iter().collect())
    }

    pub fn all() -> Self {
        Self::new(MetricSet::ALL)
    }

    pub fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Parses a comma-separated list such as `"base,errors"`.
    ///
    /// Empty items are skipped so that trailing commas are tolerated.
    pub fn parse_list(list: &str) -> Result<Self, UnknownMetricSet> {
        list.split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(MetricSet::from_str)
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    /// Returns true if metrics tagged with `set` should be described and emitted.
    pub fn has(&self, set: MetricSet) -> bool {
        self.0.contains(&set)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MetricSets {
    fn default() -> Self {
        Self::new([
            MetricSet::Base,
            MetricSet::Errors,
            MetricSet::Perf,
            MetricSet::Counters,
        ])
    }
}

impl fmt::Display for MetricSets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(MetricSet::as_str).collect();
        f.write_str(&names.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let sets = MetricSets::parse_list("base, Errors,,debug,").unwrap();
        assert!(sets.has(MetricSet::Base));
        assert!(sets.has(MetricSet::Errors));
        assert!(sets.has(MetricSet::Debug));
        assert!(!sets.has(MetricSet::Perf));
        assert_eq!(sets.to_string(), "base,errors,debug");
    }

    #[test]
    fn test_parse_list_rejects_unknown() {
        let err = MetricSets::parse_list("base,bogus").unwrap_err();
        assert_eq!(err, UnknownMetricSet("bogus".to_string()));
    }

    #[test]
    fn test_default_excludes_debug() {
        let sets = MetricSets::default();
        assert!(!sets.has(MetricSet::Debug));
        assert!(sets.has(MetricSet::Counters));
    }

    #[test]
    fn test_serde_lowercase() {
        let sets: MetricSets = serde_yaml::from_str("[perf, counters]").unwrap();
        assert_eq!(sets, MetricSets::new([MetricSet::Perf, MetricSet::Counters]));
        assert!(serde_yaml::from_str::<MetricSets>("[nope]").is_err());
    }
}

//! Coverage counters of `ovs-vswitchd`.
//!
//! `coverage/show` prints one line per counter that has been hit at least
//! once since the daemon started:
//!
//! ```text
//! Event coverage, avg rate over last: 5 seconds, last minute, last hour,  hash=5d9ba4b1:
//! netdev_sent       967178.4/sec 966510.667/sec   880482.1181/sec   total: 21235468562413
//! 123 events never hit
//! ```
//!
//! Only the cumulative `total:` is exported. Counters that were never hit
//! are missing from the output and are exported as zero.

mod catalog;

pub use catalog::COVERAGE_METRICS;

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use super::{CollectError, Collector};
use crate::appctl::StatusQuery;
use crate::metric::{MetricDef, Sample};
use crate::metric_sets::MetricSets;

/// Collector name.
pub const NAME: &str = "coverage";

/// unixctl command returning the coverage report.
pub const COMMAND: &str = "coverage/show";

// "netdev_sent       967178.4/sec 966510.667/sec   880482.1181/sec   total: 21235468562413"
static COVERAGE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z_]+)\s+.*\s+total: ([0-9]+)$").expect("valid coverage regex")
});

// Anything that looks like a counter line, whatever its total holds.
static TOTAL_FIELD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9A-Za-z_]+)\s.*\btotal:\s*(\S*)\s*$").expect("valid total field regex")
});

/// A counter line whose total is not a decimal integer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{name}: {raw}: not a decimal integer")]
pub struct MalformedTotal {
    pub name: String,
    pub raw: String,
}

/// Parsed `coverage/show` output.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageReport {
    values: HashMap<String, f64>,
    errors: Vec<MalformedTotal>,
}

impl CoverageReport {
    /// Value reported for `name`, or zero if the daemon did not list it.
    pub fn value(&self, name: &str) -> f64 {
        self.values.get(name).copied().unwrap_or(0.0)
    }

    /// Number of counters successfully parsed.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Lines that looked like counters but carried an unusable total.
    pub fn errors(&self) -> &[MalformedTotal] {
        &self.errors
    }
}

/// Totals are unsigned decimal integers, exported as f64.
fn parse_total(raw: &str) -> Option<f64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}

/// Parses a `coverage/show` buffer. Never fails: unknown lines are ignored
/// and malformed totals are recorded in [`CoverageReport::errors`].
pub fn parse_report(buf: &str) -> CoverageReport {
    let mut report = CoverageReport::default();

    for line in buf.lines() {
        if let Some(caps) = COVERAGE_RE.captures(line) {
            match parse_total(&caps[2]) {
                Some(value) => {
                    report.values.insert(caps[1].to_string(), value);
                }
                None => report.errors.push(MalformedTotal {
                    name: caps[1].to_string(),
                    raw: caps[2].to_string(),
                }),
            }
        } else if let Some(caps) = TOTAL_FIELD_RE.captures(line) {
            // Wrong shape for a counter line: only a broken total is worth reporting.
            if parse_total(&caps[2]).is_none() {
                report.errors.push(MalformedTotal {
                    name: caps[1].to_string(),
                    raw: caps[2].to_string(),
                });
            }
        }
    }

    report
}

/// Exports `ovs-vswitchd` coverage counters.
pub struct CoverageCollector {
    query: Arc<dyn StatusQuery>,
    sets: MetricSets,
    catalog: &'static [MetricDef],
}

impl CoverageCollector {
    pub fn new(query: Arc<dyn StatusQuery>, sets: MetricSets) -> Self {
        Self::with_catalog(query, sets, COVERAGE_METRICS)
    }

    pub fn with_catalog(
        query: Arc<dyn StatusQuery>,
        sets: MetricSets,
        catalog: &'static [MetricDef],
    ) -> Self {
        Self {
            query,
            sets,
            catalog,
        }
    }

    /// Maps a parsed report onto the catalog, in catalog order.
    pub fn samples(&self, report: &CoverageReport) -> Vec<Sample> {
        self.catalog
            .iter()
            .filter_map(|m| m.sample(report.value(m.name), &self.sets))
            .collect()
    }
}

impl Collector for CoverageCollector {
    fn name(&self) -> &'static str {
        NAME
    }

    fn metrics(&self) -> &[MetricDef] {
        self.catalog
    }

    fn metric_sets(&self) -> &MetricSets {
        &self.sets
    }

    #[instrument(skip(self), fields(collector = NAME))]
    fn collect(&self) -> Result<Vec<Sample>, CollectError> {
        let buf = self.query.query(COMMAND)?;

        let report = parse_report(&buf);
        for e in report.errors() {
            error!("{}", e);
        }

        let samples = self.samples(&report);
        debug!(
            "Parsed {} coverage counters, emitting {} samples",
            report.len(),
            samples.len()
        );
        Ok(samples)
    }
}

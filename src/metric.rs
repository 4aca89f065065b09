//! Static metric definitions and the samples built from them.

use prometheus::core::{Collector as _, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Counter, Gauge, Opts};
use std::collections::HashMap;

use crate::metric_sets::{MetricSet, MetricSets};

/// Namespace prepended to every exported metric.
pub const NAMESPACE: &str = "ovs";

/// Value semantics of an exported metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Counter,
    Gauge,
}

impl ValueType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueType::Counter => "counter",
            ValueType::Gauge => "gauge",
        }
    }
}

/// Static description of one metric a collector is able to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricDef {
    /// Name of the value in the daemon output, e.g. `netdev_sent`.
    pub name: &'static str,
    /// Collector subsystem, e.g. `coverage`.
    pub subsystem: &'static str,
    pub set: MetricSet,
    pub value_type: ValueType,
    pub help: &'static str,
}

impl MetricDef {
    pub const fn counter(
        subsystem: &'static str,
        name: &'static str,
        set: MetricSet,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            subsystem,
            set,
            value_type: ValueType::Counter,
            help,
        }
    }

    pub const fn gauge(
        subsystem: &'static str,
        name: &'static str,
        set: MetricSet,
        help: &'static str,
    ) -> Self {
        Self {
            name,
            subsystem,
            set,
            value_type: ValueType::Gauge,
            help,
        }
    }

    /// Fully qualified Prometheus name, e.g. `ovs_coverage_netdev_sent_total`.
    pub fn fq_name(&self) -> String {
        match self.value_type {
            ValueType::Counter => format!("{NAMESPACE}_{}_{}_total", self.subsystem, self.name),
            ValueType::Gauge => format!("{NAMESPACE}_{}_{}", self.subsystem, self.name),
        }
    }

    /// Builds the outward-facing descriptor for this metric.
    pub fn desc(&self) -> prometheus::Result<Desc> {
        Desc::new(
            self.fq_name(),
            self.help.to_string(),
            Vec::new(),
            HashMap::new(),
        )
    }

    /// Pairs this definition with a value, unless its set is disabled.
    pub fn sample(&self, value: f64, sets: &MetricSets) -> Option<Sample> {
        if !sets.has(self.set) {
            return None;
        }
        Some(Sample { def: *self, value })
    }
}

/// One emitted metric value. Lives for a single scrape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub def: MetricDef,
    pub value: f64,
}

impl Sample {
    /// Converts the sample into a Prometheus metric family.
    pub fn to_metric_family(&self) -> prometheus::Result<MetricFamily> {
        let opts = Opts::new(self.def.fq_name(), self.def.help);
        let mut families = match self.def.value_type {
            ValueType::Counter => {
                let counter = Counter::with_opts(opts)?;
                counter.inc_by(self.value);
                counter.collect()
            }
            ValueType::Gauge => {
                let gauge = Gauge::with_opts(opts)?;
                gauge.set(self.value);
                gauge.collect()
            }
        };
        families
            .pop()
            .ok_or_else(|| prometheus::Error::Msg(format!("no family for {}", self.def.fq_name())))
    }
}

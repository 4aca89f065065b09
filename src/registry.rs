//! Bridge between [`Collector`]s and a `prometheus::Registry`.
//!
//! [`CollectorRegistry`] is registered once; the Prometheus registry then
//! calls back into it on every `gather()`, which runs every configured
//! collector synchronously, one after the other.

use prometheus::core::{Collector as PromCollector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{GaugeVec, Opts};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, warn};

use crate::collectors::Collector;

/// Last known state of one collector.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectorStatus {
    pub name: &'static str,
    pub success: bool,
    pub duration_seconds: f64,
}

/// All configured collectors plus per-collector scrape telemetry.
pub struct CollectorRegistry {
    collectors: Vec<Box<dyn Collector>>,
    descs: Vec<Desc>,
    success: GaugeVec,
    duration: GaugeVec,
    telemetry: bool,
    scrapes: AtomicU64,
}

impl CollectorRegistry {
    pub fn new(collectors: Vec<Box<dyn Collector>>) -> prometheus::Result<Self> {
        let success = GaugeVec::new(
            Opts::new(
                "ovs_exporter_collector_success",
                "Whether the last run of the collector succeeded (1) or failed (0)",
            ),
            &["collector"],
        )?;
        let duration = GaugeVec::new(
            Opts::new(
                "ovs_exporter_collector_duration_seconds",
                "Duration of the last run of the collector in seconds",
            ),
            &["collector"],
        )?;

        let descs = collectors.iter().flat_map(|c| c.describe()).collect();

        Ok(Self {
            collectors,
            descs,
            success,
            duration,
            telemetry: true,
            scrapes: AtomicU64::new(0),
        })
    }

    /// Stops exporting the `ovs_exporter_collector_*` metrics. Status is still tracked.
    pub fn without_telemetry(mut self) -> Self {
        self.telemetry = false;
        self
    }

    pub fn collectors(&self) -> &[Box<dyn Collector>] {
        &self.collectors
    }

    /// Number of completed scrapes.
    pub fn scrapes(&self) -> u64 {
        self.scrapes.load(Ordering::Relaxed)
    }

    /// Per-collector result of the most recent scrape, empty before the first one.
    pub fn status(&self) -> Vec<CollectorStatus> {
        if self.scrapes() == 0 {
            return Vec::new();
        }
        self.collectors
            .iter()
            .map(|c| CollectorStatus {
                name: c.name(),
                success: self.success.with_label_values(&[c.name()]).get() > 0.0,
                duration_seconds: self.duration.with_label_values(&[c.name()]).get(),
            })
            .collect()
    }

    fn run(&self, collector: &dyn Collector, families: &mut Vec<MetricFamily>) {
        let name = collector.name();
        let start = Instant::now();

        let success = match collector.collect() {
            Ok(samples) => {
                let count = samples.len();
                for sample in samples {
                    match sample.to_metric_family() {
                        Ok(family) => families.push(family),
                        Err(e) => warn!("{}: cannot export {}: {}", name, sample.def.fq_name(), e),
                    }
                }
                debug!("{}: collected {} samples", name, count);
                true
            }
            Err(e) => {
                warn!("{}: collection failed: {}", name, e);
                false
            }
        };

        self.success
            .with_label_values(&[name])
            .set(if success { 1.0 } else { 0.0 });
        self.duration
            .with_label_values(&[name])
            .set(start.elapsed().as_secs_f64());
    }
}

impl PromCollector for CollectorRegistry {
    fn desc(&self) -> Vec<&Desc> {
        let mut descs: Vec<&Desc> = self.descs.iter().collect();
        if self.telemetry {
            descs.extend(self.success.desc());
            descs.extend(self.duration.desc());
        }
        descs
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let mut families = Vec::new();
        for collector in &self.collectors {
            self.run(collector.as_ref(), &mut families);
        }
        if self.telemetry {
            families.extend(self.success.collect());
            families.extend(self.duration.collect());
        }
        self.scrapes.fetch_add(1, Ordering::Relaxed);
        families
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collectors::CollectError;
    use crate::appctl::AppctlError;
    use crate::metric::{MetricDef, Sample};
    use crate::metric_sets::{MetricSet, MetricSets};
    use prometheus::{Encoder, Registry, TextEncoder};

    static CATALOG: &[MetricDef] = &[
        MetricDef::counter("coverage", "netdev_sent", MetricSet::Perf, "sent"),
        MetricDef::gauge("coverage", "flows", MetricSet::Perf, "flows"),
    ];

    struct Fake {
        fail: bool,
        sets: MetricSets,
    }

    impl Collector for Fake {
        fn name(&self) -> &'static str {
            "fake"
        }

        fn metrics(&self) -> &[MetricDef] {
            CATALOG
        }

        fn metric_sets(&self) -> &MetricSets {
            &self.sets
        }

        fn collect(&self) -> Result<Vec<Sample>, CollectError> {
            if self.fail {
                return Err(AppctlError::MissingResult("coverage/show".into()).into());
            }
            Ok(CATALOG
                .iter()
                .filter_map(|m| m.sample(7.0, &self.sets))
                .collect())
        }
    }

    fn encode(families: &[MetricFamily]) -> String {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(families, &mut buffer).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    fn gather_text(fake: Fake) -> (String, CollectorRegistry) {
        let ours = CollectorRegistry::new(vec![Box::new(fake)]).unwrap();
        let text = encode(&PromCollector::collect(&ours));
        (text, ours)
    }

    #[test]
    fn test_collect_success() {
        let (text, ours) = gather_text(Fake {
            fail: false,
            sets: MetricSets::all(),
        });
        assert!(text.contains("ovs_coverage_netdev_sent_total 7"));
        assert!(text.contains("# TYPE ovs_coverage_flows gauge"));
        assert!(text.contains("ovs_exporter_collector_success{collector=\"fake\"} 1"));
        assert_eq!(ours.scrapes(), 1);
        let status = ours.status();
        assert_eq!(status.len(), 1);
        assert!(status[0].success);
    }

    #[test]
    fn test_collect_failure_emits_no_samples() {
        let (text, ours) = gather_text(Fake {
            fail: true,
            sets: MetricSets::all(),
        });
        assert!(!text.contains("ovs_coverage_netdev_sent_total"));
        assert!(text.contains("ovs_exporter_collector_success{collector=\"fake\"} 0"));
        assert!(!ours.status()[0].success);
    }

    #[test]
    fn test_descs_follow_sets() {
        let ours = CollectorRegistry::new(vec![Box::new(Fake {
            fail: false,
            sets: MetricSets::none(),
        })])
        .unwrap();
        // Only the two telemetry vectors remain.
        assert_eq!(PromCollector::desc(&ours).len(), 2);
        assert!(ours.status().is_empty());
    }

    #[test]
    fn test_without_telemetry() {
        let ours = CollectorRegistry::new(vec![Box::new(Fake {
            fail: true,
            sets: MetricSets::all(),
        })])
        .unwrap()
        .without_telemetry();
        assert_eq!(PromCollector::desc(&ours).len(), CATALOG.len());

        let text = encode(&PromCollector::collect(&ours));
        assert!(!text.contains("ovs_exporter_collector_success"));
        assert!(!ours.status()[0].success);
    }

    #[test]
    fn test_register_in_prometheus_registry() {
        let registry = Registry::new();
        let ours = CollectorRegistry::new(vec![Box::new(Fake {
            fail: false,
            sets: MetricSets::all(),
        })])
        .unwrap();
        registry.register(Box::new(ours)).unwrap();

        let text = encode(&registry.gather());
        assert!(text.contains("ovs_coverage_netdev_sent_total 7"));
        assert!(text.contains("ovs_exporter_collector_duration_seconds{collector=\"fake\"}"));
    }
}

//! Coverage counters known to the exporter.
//!
//! Counters printed by `coverage/show` but missing here are not exported.

use super::NAME;
use crate::metric::MetricDef;
use crate::metric_sets::MetricSet::{self, Base, Counters, Debug as DebugSet, Errors, Perf};

const fn counter(name: &'static str, set: MetricSet, help: &'static str) -> MetricDef {
    MetricDef::counter(NAME, name, set, help)
}

pub static COVERAGE_METRICS: &[MetricDef] = &[
    // netdev
    counter("netdev_sent", Base, "Packets sent through netdev providers."),
    counter("netdev_received", Base, "Packets received through netdev providers."),
    counter("netdev_get_stats", Counters, "Netdev statistics queries."),
    counter("netdev_get_ifindex", Counters, "Netdev interface index lookups."),
    counter("netdev_get_hwaddr", Counters, "Netdev hardware address lookups."),
    counter("netdev_set_hwaddr", Counters, "Netdev hardware address changes."),
    counter("netdev_get_ethtool", Counters, "Netdev ethtool queries."),
    counter("netdev_set_ethtool", Counters, "Netdev ethtool changes."),
    counter("netdev_set_policing", Counters, "Netdev ingress policing changes."),
    counter("netdev_arp_lookup", Counters, "Netdev ARP table lookups."),
    // netlink
    counter("netlink_received", Perf, "Netlink messages received."),
    counter(
        "netlink_recv_jumbo",
        Perf,
        "Netlink messages received that exceeded the default buffer.",
    ),
    counter("netlink_sent", Perf, "Netlink messages sent."),
    counter("netlink_overflow", Errors, "Netlink socket receive buffer overflows."),
    // dpif
    counter("dpif_port_add", Counters, "Ports added to the datapath."),
    counter("dpif_port_del", Counters, "Ports removed from the datapath."),
    counter("dpif_flow_flush", Counters, "Datapath flow table flushes."),
    counter("dpif_flow_get", Perf, "Datapath flow lookups."),
    counter("dpif_flow_put", Perf, "Datapath flow installations and modifications."),
    counter("dpif_flow_del", Perf, "Datapath flow deletions."),
    counter("dpif_execute", Perf, "Packets executed by the datapath on behalf of userspace."),
    counter("dpif_execute_with_help", Perf, "Datapath executions that needed userspace help."),
    counter("dpif_purge", Counters, "Datapath upcall purges."),
    // upcall handling and revalidation
    counter("upcall_flow_limit_hit", Errors, "Upcalls that hit the datapath flow limit."),
    counter("upcall_ukey_contention", Perf, "Upcall key lock contention events."),
    counter("upcall_ukey_replace", Perf, "Upcall keys replaced."),
    counter("handler_duplicate_upcall", Errors, "Duplicate upcalls received by handler threads."),
    counter("dumped_duplicate_flow", Perf, "Duplicate flows seen during datapath flow dumps."),
    counter("dumped_new_flow", Perf, "New flows seen during datapath flow dumps."),
    counter("revalidate_missed_dp_flow", Perf, "Datapath flows missed by the revalidators."),
    counter("ofproto_dpif_expired", Perf, "Datapath flows expired by the revalidators."),
    // translation
    counter("xlate_actions", Perf, "OpenFlow action translations."),
    counter(
        "xlate_actions_oversize",
        Errors,
        "Translations whose actions exceeded the size limit.",
    ),
    counter("xlate_actions_too_many_output", Errors, "Translations with too many output actions."),
    counter("flow_extract", Perf, "Packet headers parsed into flows."),
    // ofproto and OpenFlow connections
    counter("ofproto_flush", Counters, "OpenFlow table flushes."),
    counter("ofproto_packet_out", Counters, "OpenFlow packet-out messages processed."),
    counter("ofproto_recv_openflow", Counters, "OpenFlow messages received."),
    counter("ofproto_update_port", Counters, "OpenFlow port updates."),
    counter("bridge_reconfigure", Counters, "Bridge reconfigurations."),
    counter("vconn_open", Counters, "OpenFlow connections opened."),
    counter("vconn_received", Counters, "OpenFlow messages received on vconns."),
    counter("vconn_sent", Counters, "OpenFlow messages sent on vconns."),
    counter("rconn_queued", Counters, "OpenFlow messages queued on reliable connections."),
    counter("rconn_sent", Counters, "OpenFlow messages sent on reliable connections."),
    counter("rconn_discarded", Errors, "OpenFlow messages discarded by reliable connections."),
    counter("rconn_overflow", Errors, "Reliable connection transmit queue overflows."),
    counter("stream_open", Counters, "Streams opened."),
    counter("pstream_open", Counters, "Passive streams opened."),
    // revalidation triggers
    counter("rev_reconfigure", Counters, "Revalidations triggered by reconfiguration."),
    counter("rev_port_toggled", Counters, "Revalidations triggered by port state changes."),
    counter("rev_flow_table", Counters, "Revalidations triggered by flow table changes."),
    counter("rev_mac_learning", Counters, "Revalidations triggered by MAC learning."),
    counter("rev_mcast_snooping", Counters, "Revalidations triggered by multicast snooping."),
    counter("rev_bond", Counters, "Revalidations triggered by bond changes."),
    counter("rev_recirc", Counters, "Revalidations triggered by recirculation changes."),
    // mac learning
    counter("mac_learning_learned", Counters, "MAC addresses learned."),
    counter("mac_learning_expired", Counters, "MAC learning entries expired."),
    counter("mac_learning_evicted", Counters, "MAC learning entries evicted."),
    counter("mac_learning_moved", Counters, "MAC addresses moved between ports."),
    // OVSDB transactions
    counter("txn_unchanged", Counters, "OVSDB transactions that changed nothing."),
    counter("txn_incomplete", Counters, "OVSDB transactions still in progress."),
    counter("txn_success", Counters, "OVSDB transactions committed."),
    counter("txn_try_again", Errors, "OVSDB transactions that had to be retried."),
    // control and main loop
    counter("unixctl_received", Counters, "unixctl requests received."),
    counter("unixctl_replied", Counters, "unixctl replies sent."),
    counter("poll_create_node", Perf, "Poll loop file descriptor registrations."),
    counter("poll_zero_timeout", Perf, "Poll loop iterations with an immediate wakeup."),
    counter("seq_change", Perf, "Sequence number changes."),
    // datapath drops
    counter(
        "datapath_drop_upcall_error",
        Errors,
        "Packets dropped by the datapath on upcall errors.",
    ),
    counter("datapath_drop_lock_error", Errors, "Packets dropped by the datapath on lock errors."),
    counter(
        "datapath_drop_userspace_action_error",
        Errors,
        "Packets dropped on userspace action errors.",
    ),
    counter(
        "datapath_drop_tunnel_push_error",
        Errors,
        "Packets dropped on tunnel encapsulation errors.",
    ),
    counter(
        "datapath_drop_tunnel_pop_error",
        Errors,
        "Packets dropped on tunnel decapsulation errors.",
    ),
    counter("datapath_drop_recirc_error", Errors, "Packets dropped on recirculation errors."),
    counter("datapath_drop_invalid_port", Errors, "Packets dropped for an invalid output port."),
    counter(
        "datapath_drop_invalid_tnl_port",
        Errors,
        "Packets dropped for an invalid tunnel port.",
    ),
    counter("datapath_drop_sample_error", Errors, "Packets dropped on sample action errors."),
    counter(
        "datapath_drop_nsh_decap_error",
        Errors,
        "Packets dropped on NSH decapsulation errors.",
    ),
    counter("datapath_drop_meter", Errors, "Packets dropped by datapath meters."),
    // action drops
    counter("drop_action_of_pipeline", Errors, "Packets dropped by the OpenFlow pipeline."),
    counter(
        "drop_action_bridge_not_found",
        Errors,
        "Packets dropped because the bridge was not found.",
    ),
    counter(
        "drop_action_recursion_too_deep",
        Errors,
        "Packets dropped for excessive translation recursion.",
    ),
    counter("drop_action_too_many_resubmit", Errors, "Packets dropped for too many resubmits."),
    counter(
        "drop_action_stack_too_deep",
        Errors,
        "Packets dropped for an oversized translation stack.",
    ),
    counter(
        "drop_action_no_recirculation_context",
        Errors,
        "Packets dropped for a missing recirculation context.",
    ),
    counter(
        "drop_action_recirculation_conflict",
        Errors,
        "Packets dropped on recirculation conflicts.",
    ),
    counter(
        "drop_action_too_many_mpls_labels",
        Errors,
        "Packets dropped for too many MPLS labels.",
    ),
    counter(
        "drop_action_invalid_tunnel_metadata",
        Errors,
        "Packets dropped for invalid tunnel metadata.",
    ),
    counter(
        "drop_action_unsupported_packet_type",
        Errors,
        "Packets dropped for an unsupported packet type.",
    ),
    counter("drop_action_congestion", Errors, "Packets dropped on congestion."),
    counter(
        "drop_action_forwarding_disabled",
        Errors,
        "Packets dropped because forwarding is disabled.",
    ),
    // allocator and hash table internals
    counter("util_xalloc", DebugSet, "Memory allocations through the OVS allocator."),
    counter("miniflow_malloc", DebugSet, "Miniflow heap allocations."),
    counter("hmap_pathological", DebugSet, "Hash map buckets with pathological chain lengths."),
    counter("hmap_expand", DebugSet, "Hash map expansions."),
    counter("hmap_shrink", DebugSet, "Hash map shrinks."),
    counter("cmap_expand", DebugSet, "Concurrent hash map expansions."),
    counter("cmap_shrink", DebugSet, "Concurrent hash map shrinks."),
    counter("ccmap_expand", DebugSet, "Concurrent counting hash map expansions."),
    counter("ccmap_shrink", DebugSet, "Concurrent counting hash map shrinks."),
];

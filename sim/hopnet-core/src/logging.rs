//! Logging holds wrapper functions for logging events.
//! Each function corresponds to a type of event (topology loads, routes, rejected hops).
//! Installing a subscriber is left to the front end.

use crate::{HopRejection, QueryReport, RouteOrigin, RouteQuery, Topology};
use tracing::{event, Level};

/// Topology event handler.
/// Logged once a topology passes validation. Captures the following data:
/// routers, max_networks, networks
pub fn topology_event(topology: &Topology) {
    let networks: usize = topology
        .routers()
        .map(|router| topology.networks(router).len())
        .sum();
    event!(
        target: "hopnet_core::topology",
        Level::INFO,
        routers = topology.router_count(),
        max_networks = topology.max_networks(),
        networks
    );
}

/// Route event handler.
/// Logged for every answered query. Captures the following data:
/// source_ip, destination_ip, path, origin
pub fn route_event(report: &QueryReport) {
    let origin = match report.origin {
        RouteOrigin::Cache => "cache",
        RouteOrigin::Fresh { cached: true } => "fresh",
        RouteOrigin::Fresh { cached: false } => "fresh-uncached",
    };
    event!(
        target: "hopnet_core::route",
        Level::INFO,
        source_ip = report.query.source.as_str(),
        destination_ip = report.query.destination.as_str(),
        path = %report.path,
        origin
    );
}

/// Hop event handler.
/// Logged whenever a proposed hop is refused.
pub fn hop_rejected_event(rejection: &HopRejection) {
    event!(target: "hopnet_core::hop", Level::WARN, rejection = %rejection);
}

/// Cache event handler.
/// Logged when a freshly resolved route could not be remembered.
pub fn cache_skipped_event(query: &RouteQuery, reason: &dyn std::fmt::Display) {
    event!(
        target: "hopnet_core::cache",
        Level::DEBUG,
        source_ip = query.source.as_str(),
        destination_ip = query.destination.as_str(),
        reason = %reason
    );
}

//! Connection matching against the watchlist.
//!
//! The watched system/region sets are recomputed from the configs on each
//! call rather than cached — a run is a single pass, and freshness beats
//! saving two set builds. All filters preserve upstream feed order.

use std::collections::HashSet;

use crate::services::eve_scout::{Connection, ConnectionSnapshot};
use crate::watchlist::{watched_regions, watched_systems, WatchConfig};

/// Connections whose source or destination system name is watched.
pub fn match_by_system<'a>(
    snapshot: &'a ConnectionSnapshot,
    configs: &[WatchConfig],
) -> Vec<&'a Connection> {
    let systems = watched_systems(configs);
    snapshot
        .connections
        .iter()
        .filter(|conn| {
            systems.contains(&conn.source_solar_system.name)
                || systems.contains(&conn.destination_solar_system.name)
        })
        .collect()
}

/// Connections whose source or destination region name is watched.
pub fn match_by_region<'a>(
    snapshot: &'a ConnectionSnapshot,
    configs: &[WatchConfig],
) -> Vec<&'a Connection> {
    let regions = watched_regions(configs);
    snapshot
        .connections
        .iter()
        .filter(|conn| {
            regions.contains(&conn.source_solar_system.region.name)
                || regions.contains(&conn.destination_solar_system.region.name)
        })
        .collect()
}

/// De-duplicated union of the system and region matches.
///
/// A connection matching on both dimensions is reported once; the seen-set
/// is keyed by [`Connection::dedup_key`] so repeated feed entries for the
/// same link also collapse.
pub fn matched_connections<'a>(
    snapshot: &'a ConnectionSnapshot,
    configs: &[WatchConfig],
) -> Vec<&'a Connection> {
    let systems = watched_systems(configs);
    let regions = watched_regions(configs);

    let mut seen = HashSet::new();
    snapshot
        .connections
        .iter()
        .filter(|conn| {
            let by_system = systems.contains(&conn.source_solar_system.name)
                || systems.contains(&conn.destination_solar_system.name);
            let by_region = regions.contains(&conn.source_solar_system.region.name)
                || regions.contains(&conn.destination_solar_system.region.name);
            (by_system || by_region) && seen.insert(conn.dedup_key())
        })
        .collect()
}

//! Turns a parsed [`TopologyDescription`] into a checked [`Topology`].
use super::parsing::{core_parser, TopologyDescription};
use hopnet_core::{ConfigError, Controller, RouterId, Topology};

/// Builds the topology a description declares, returning it together with the
/// route cache capacity the description asked for.
///
/// Every network address goes through the same checks as one typed at the
/// console, so an invalid, duplicated or surplus network rejects the whole
/// description.
pub fn build_topology(desc: &TopologyDescription) -> Result<(Topology, usize), ConfigError> {
    let mut builder = Topology::builder(desc.router_count, desc.max_networks);
    for row in desc.rows.iter() {
        builder.link_row(RouterId::new(row.router), &row.links)?;
    }
    for router in desc.routers.iter() {
        for ip in router.networks.iter() {
            builder.network(RouterId::new(router.router), ip.as_str())?;
        }
    }
    Ok((builder.build()?, desc.capacity))
}

/// Parses and builds the topology file at `file_path`, ready to answer
/// queries.
pub fn load_controller(file_path: &str) -> Result<Controller, String> {
    let desc = core_parser(file_path)?;
    let (topology, capacity) =
        build_topology(&desc).map_err(|e| format!("Errors at {file_path}:\n\n{e}\n"))?;
    Ok(Controller::new(topology, capacity))
}

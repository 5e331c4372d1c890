//! Various methods related to loading topologies written in NDL style
mod generating;
pub mod parsing;
pub use generating::{build_topology, load_controller};
pub use parsing::{core_parser, parse_description};

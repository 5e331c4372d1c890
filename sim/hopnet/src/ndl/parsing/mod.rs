//! Mod file for parsing: allows use across Hopnet

pub mod parsing_data;
mod parser;
mod parser_util;
pub use parser::{
    core_parser, parse_description, DEFAULT_CAPACITY, DEFAULT_MAX_NETWORKS, MAX_NETWORKS_PER_ROUTER,
    MAX_ROUTERS,
};
pub use parser_util::{general_error, general_parser};
pub use parsing_data::*;

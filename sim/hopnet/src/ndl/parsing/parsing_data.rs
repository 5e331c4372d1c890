//! Types needed for parsing.

use nom::{error::VerboseError, IResult};
use std::collections::HashMap;

/// DecType is the core type of each parse-able item.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum DecType {
    Topology,
    Links,
    Row,
    Router,
    Network,
}

pub type Res<T, U> = IResult<T, U, VerboseError<T>>;
pub type Params = HashMap<String, String>;
pub type Rows = Vec<LinkRow>;
pub type Routers = Vec<RouterDeclaration>;

/// LinkRow Struct.
/// One row of the adjacency matrix, declared inside `[Links]`.
///
///
/// Contains: the router the row belongs to and one entry per router
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct LinkRow {
    pub router: u32,
    pub links: Vec<bool>,
}

/// RouterDeclaration Struct.
/// Holds the networks declared for a single router.
///
///
/// Contains: the router id and its network IPs in declaration order
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RouterDeclaration {
    pub router: u32,
    pub networks: Vec<String>,
}

/// TopologyDescription Struct.
/// Used to store the core parsed topology before it is checked and built.
///
///
/// Contains: the sizes from `[Topology]`, [Rows], and [Routers]
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TopologyDescription {
    pub router_count: usize,
    pub max_networks: usize,
    pub capacity: usize,
    pub rows: Rows,
    pub routers: Routers,
}

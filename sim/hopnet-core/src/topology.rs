//! The fixed set of routers, the links between them and the networks each one
//! serves.
//!
//! A [`Topology`] is only ever created through a [`TopologyBuilder`], which
//! checks every network address and ownership claim before handing one out.
//! Once built, a topology cannot be changed.

use crate::{ip, logging, RouterId};
use rustc_hash::FxHashMap;

/// Number of routers in the reference topology.
pub const REFERENCE_ROUTERS: usize = 4;

/// Maximum networks per router in the reference topology.
pub const REFERENCE_MAX_NETWORKS: usize = 4;

// R1 links to R2 and R4, R2 to R1 and R3, R3 to R2 and R4, R4 to R1 and R3
const REFERENCE_LINKS: [[bool; REFERENCE_ROUTERS]; REFERENCE_ROUTERS] = [
    [true, true, false, true],
    [true, true, true, false],
    [false, true, true, true],
    [true, false, true, true],
];

/// A static network of routers.
///
/// Links are directed: `adjacent(a, b)` says nothing about `adjacent(b, a)`.
/// Every router is linked to itself by convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topology {
    links: Vec<Vec<bool>>,
    networks: Vec<Vec<String>>,
    max_networks: usize,
}

impl Topology {
    /// Starts describing a topology with `router_count` routers, each serving
    /// at most `max_networks` networks.
    pub fn builder(router_count: usize, max_networks: usize) -> TopologyBuilder {
        TopologyBuilder::new(router_count, max_networks)
    }

    /// Returns a builder preloaded with the four-router reference links and no
    /// networks.
    pub fn reference() -> TopologyBuilder {
        let mut builder = TopologyBuilder::new(REFERENCE_ROUTERS, REFERENCE_MAX_NETWORKS);
        builder.links = REFERENCE_LINKS.iter().map(|row| row.to_vec()).collect();
        builder
    }

    /// The number of routers, `R`. Valid router ids are `1..=R`.
    pub fn router_count(&self) -> usize {
        self.links.len()
    }

    /// The most networks a single router may serve.
    pub fn max_networks(&self) -> usize {
        self.max_networks
    }

    /// Returns `true` if `id` names a router in this topology.
    pub fn contains(&self, id: RouterId) -> bool {
        matches!(id.index(), Some(i) if i < self.router_count())
    }

    /// Iterates over every router id in order.
    pub fn routers(&self) -> impl Iterator<Item = RouterId> {
        (0..self.router_count()).map(RouterId::from_index)
    }

    /// Returns `true` if there is a direct link from `from` to `to`.
    ///
    /// Ids outside the topology are never adjacent to anything.
    pub fn adjacent(&self, from: RouterId, to: RouterId) -> bool {
        match (from.index(), to.index()) {
            (Some(a), Some(b)) => self
                .links
                .get(a)
                .and_then(|row| row.get(b))
                .copied()
                .unwrap_or(false),
            _ => false,
        }
    }

    /// The routers `from` links to directly, itself excluded.
    pub fn neighbors(&self, from: RouterId) -> impl Iterator<Item = RouterId> + '_ {
        self.routers()
            .filter(move |&to| to != from && self.adjacent(from, to))
    }

    /// The networks served by `router`, in the order they were registered.
    pub fn networks(&self, router: RouterId) -> &[String] {
        router
            .index()
            .and_then(|i| self.networks.get(i))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Finds the router serving the network `ip`.
    ///
    /// Routers are searched in id order and each router's networks in
    /// registration order. Matching is on the exact string.
    pub fn owner_router(&self, ip: &str) -> Option<RouterId> {
        self.networks
            .iter()
            .position(|nets| nets.iter().any(|net| net == ip))
            .map(RouterId::from_index)
    }
}

/// Collects links and networks and checks them before producing a
/// [`Topology`].
#[derive(Debug, Clone)]
pub struct TopologyBuilder {
    links: Vec<Vec<bool>>,
    networks: Vec<Vec<String>>,
    max_networks: usize,
    // network ip to the router that registered it first
    owners: FxHashMap<String, RouterId>,
}

impl TopologyBuilder {
    fn new(router_count: usize, max_networks: usize) -> Self {
        let links = (0..router_count)
            .map(|i| (0..router_count).map(|j| i == j).collect())
            .collect();
        Self {
            links,
            networks: vec![Vec::new(); router_count],
            max_networks,
            owners: Default::default(),
        }
    }

    /// The number of routers being described.
    pub fn router_count(&self) -> usize {
        self.links.len()
    }

    /// The most networks a single router may serve.
    pub fn max_networks(&self) -> usize {
        self.max_networks
    }

    fn index(&self, router: RouterId) -> Result<usize, ConfigError> {
        match router.index() {
            Some(i) if i < self.router_count() => Ok(i),
            _ => Err(ConfigError::UnknownRouter {
                router,
                router_count: self.router_count(),
            }),
        }
    }

    /// Adds a direct link from `from` to `to`. Links are one-way.
    pub fn link(&mut self, from: RouterId, to: RouterId) -> Result<&mut Self, ConfigError> {
        let (a, b) = (self.index(from)?, self.index(to)?);
        self.links[a][b] = true;
        Ok(self)
    }

    /// Replaces the outgoing links of `from` with `row`, where `row[j]` says
    /// whether `from` links to router `j + 1`.
    pub fn link_row(&mut self, from: RouterId, row: &[bool]) -> Result<&mut Self, ConfigError> {
        let a = self.index(from)?;
        if row.len() != self.router_count() {
            return Err(ConfigError::RowLength {
                router: from,
                expected: self.router_count(),
                found: row.len(),
            });
        }
        self.links[a] = row.to_vec();
        Ok(self)
    }

    /// Replaces the whole adjacency matrix. Row `i` holds the links of router
    /// `i + 1`.
    pub fn links(&mut self, matrix: &[Vec<bool>]) -> Result<&mut Self, ConfigError> {
        if matrix.len() != self.router_count() {
            return Err(ConfigError::MatrixRows {
                expected: self.router_count(),
                found: matrix.len(),
            });
        }
        for (i, row) in matrix.iter().enumerate() {
            self.link_row(RouterId::from_index(i), row)?;
        }
        Ok(self)
    }

    /// Registers `ip` as a network served by `router`.
    ///
    /// Fails if the address is malformed, if the router is already serving
    /// its maximum number of networks, or if another router registered the
    /// same address first.
    pub fn network(
        &mut self,
        router: RouterId,
        ip: impl Into<String>,
    ) -> Result<&mut Self, ConfigError> {
        let ip = ip.into();
        let i = self.index(router)?;
        if !ip::validate(&ip) {
            return Err(ConfigError::InvalidIp { router, ip });
        }
        if let Some(&owner) = self.owners.get(&ip) {
            return Err(ConfigError::DuplicateNetwork { ip, owner, router });
        }
        if self.networks[i].len() >= self.max_networks {
            return Err(ConfigError::TooManyNetworks {
                router,
                max: self.max_networks,
            });
        }
        self.owners.insert(ip.clone(), router);
        self.networks[i].push(ip);
        Ok(self)
    }

    /// Finishes the topology.
    pub fn build(self) -> Result<Topology, ConfigError> {
        if self.router_count() == 0 {
            return Err(ConfigError::NoRouters);
        }
        let topology = Topology {
            links: self.links,
            networks: self.networks,
            max_networks: self.max_networks,
        };
        logging::topology_event(&topology);
        Ok(topology)
    }
}

/// A reason a topology description was rejected.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("A topology needs at least one router")]
    NoRouters,
    #[error("Router {router} does not exist, routers are numbered 1 to {router_count}")]
    UnknownRouter {
        router: RouterId,
        router_count: usize,
    },
    #[error("Expected {expected} rows of links, got {found}")]
    MatrixRows { expected: usize, found: usize },
    #[error("Links for router {router} list {found} routers, expected {expected}")]
    RowLength {
        router: RouterId,
        expected: usize,
        found: usize,
    },
    #[error("Network '{ip}' for router {router} is not a valid IP address")]
    InvalidIp { router: RouterId, ip: String },
    #[error("Router {router} already serves the maximum of {max} networks")]
    TooManyNetworks { router: RouterId, max: usize },
    #[error("Network '{ip}' is already served by router {owner}, cannot add it to router {router}")]
    DuplicateNetwork {
        ip: String,
        owner: RouterId,
        router: RouterId,
    },
}

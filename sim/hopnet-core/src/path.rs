use crate::{RouterId, Topology};
use itertools::Itertools;
use std::fmt::{self, Display};

/// A route through the topology, from the router serving the source network
/// to the router serving the destination network.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedPath {
    hops: Vec<RouterId>,
}

impl ResolvedPath {
    pub(crate) fn new(hops: Vec<RouterId>) -> Self {
        debug_assert!(hops.len() >= 2, "a path has a source and a destination");
        Self { hops }
    }

    /// Every router on the path, source first and destination last.
    pub fn hops(&self) -> &[RouterId] {
        &self.hops
    }

    /// The routers between the source and the destination.
    pub fn intermediates(&self) -> &[RouterId] {
        match self.hops.len() {
            0..=2 => &[],
            n => &self.hops[1..n - 1],
        }
    }

    pub fn source(&self) -> RouterId {
        self.hops[0]
    }

    pub fn destination(&self) -> RouterId {
        self.hops[self.hops.len() - 1]
    }

    /// Number of routers on the path, counting both ends.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Returns `true` if every consecutive pair of routers has a direct link.
    pub fn follows(&self, topology: &Topology) -> bool {
        self.hops
            .iter()
            .tuple_windows()
            .all(|(&from, &to)| topology.adjacent(from, to))
    }

    /// The router ids written one after another, e.g. `"124"` for
    /// R1, R2, R4.
    ///
    /// This is ambiguous once ids have more than one digit. Use it for display
    /// only; [`hops`](Self::hops) is the real path.
    pub fn legacy_encoding(&self) -> String {
        self.hops.iter().map(|hop| hop.into_inner()).join("")
    }
}

impl Display for ResolvedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hops.iter().join(" --> "))
    }
}

impl From<ResolvedPath> for Vec<RouterId> {
    fn from(path: ResolvedPath) -> Self {
        path.hops
    }
}

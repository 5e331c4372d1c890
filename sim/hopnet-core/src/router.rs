use std::fmt::Display;

/// Identifies a router in a [`Topology`](crate::Topology).
///
/// Ids are 1-based, matching how operators number their routers. Whether an
/// id is in range is a property of the topology, so constructing one never
/// fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RouterId(u32);

impl RouterId {
    /// Creates a router id with the given number.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Gets the underlying id number.
    pub const fn into_inner(self) -> u32 {
        self.0
    }

    /// The 0-based position of this router in the adjacency matrix, or `None`
    /// for id 0.
    pub(crate) fn index(self) -> Option<usize> {
        (self.0 as usize).checked_sub(1)
    }

    /// The router sitting at a 0-based matrix position.
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index as u32 + 1)
    }
}

impl From<u32> for RouterId {
    fn from(n: u32) -> Self {
        Self(n)
    }
}

impl From<RouterId> for u32 {
    fn from(id: RouterId) -> Self {
        id.0
    }
}

impl Display for RouterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "R{}", self.0)
    }
}

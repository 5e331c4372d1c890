use crate::ResolvedPath;
use std::fmt::{self, Display};

/// Default number of routes remembered by a [`RouteCache`].
pub const DEFAULT_CAPACITY: usize = 20;

/// A request to route from one network to another.
///
/// The addresses are compared as typed, so `"10.0.0.1"` and `"10.0.0.01"` are
/// different queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteQuery {
    pub source: String,
    pub destination: String,
}

impl RouteQuery {
    pub fn new(source: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
        }
    }
}

impl Display for RouteQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}*{}", self.source, self.destination)
    }
}

/// A remembered route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteCacheEntry {
    pub query: RouteQuery,
    pub path: ResolvedPath,
}

/// A fixed-size history of resolved routes.
///
/// Entries are kept in the order they were added and are never replaced or
/// evicted. Once the cache is full it stops learning new routes.
#[derive(Debug, Clone)]
pub struct RouteCache {
    entries: Vec<RouteCacheEntry>,
    capacity: usize,
}

impl RouteCache {
    /// Creates an empty cache that can remember `capacity` routes.
    /// Storage grows as routes are added.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::new(),
            capacity,
        }
    }

    /// Finds the route previously stored for `query`.
    pub fn lookup(&self, query: &RouteQuery) -> Option<&ResolvedPath> {
        self.entries
            .iter()
            .find(|entry| entry.query == *query)
            .map(|entry| &entry.path)
    }

    /// Remembers `path` as the route for `query`.
    ///
    /// Leaves the cache untouched and returns an error if it is full or if
    /// `query` already has a route.
    pub fn insert(&mut self, query: RouteQuery, path: ResolvedPath) -> Result<(), RouteCacheError> {
        if self.is_full() {
            return Err(RouteCacheError::Full(self.capacity));
        }
        if self.lookup(&query).is_some() {
            return Err(RouteCacheError::Duplicate);
        }
        self.entries.push(RouteCacheEntry { query, path });
        Ok(())
    }

    /// The stored routes, oldest first.
    pub fn entries(&self) -> &[RouteCacheEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }
}

impl Default for RouteCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum RouteCacheError {
    #[error("Route history full ({0} routes)")]
    Full(usize),
    #[error("Route already in history")]
    Duplicate,
}

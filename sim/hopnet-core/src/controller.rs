//! Answers routing queries from start to finish.
//!
//! A [`Controller`] owns the [`Topology`] and the [`RouteCache`] for as long as
//! the simulator runs. Each query finds the routers serving both addresses,
//! checks the cache, and only asks the resolver, and through it the operator,
//! when the route has never been built before.

use crate::{
    ip, logging, resolve, HopProvider, ResolveError, ResolvedPath, RouteCache, RouteQuery,
    RouterId, Topology,
};

/// Where the route in a [`QueryReport`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOrigin {
    /// Returned from the cache without consulting the operator.
    Cache,
    /// Built for this query. `cached` is `false` when the cache was full.
    Fresh { cached: bool },
}

/// The answer to a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryReport {
    pub query: RouteQuery,
    pub source_router: RouterId,
    pub destination_router: RouterId,
    pub path: ResolvedPath,
    pub origin: RouteOrigin,
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("'{0}' is not a valid IP address")]
    InvalidAddress(String),
    #[error("Source IP {0} not found in any router's network list")]
    UnknownSource(String),
    #[error("Destination IP {0} not found in any router's network list")]
    UnknownDestination(String),
    #[error("Failed to resolve the route: {0}")]
    Resolve(#[from] ResolveError),
}

/// Runs queries against one topology, remembering every route it builds.
#[derive(Debug, Clone)]
pub struct Controller {
    topology: Topology,
    cache: RouteCache,
}

impl Controller {
    /// Creates a controller whose cache holds at most `cache_capacity` routes.
    pub fn new(topology: Topology, cache_capacity: usize) -> Self {
        Self {
            topology,
            cache: RouteCache::new(cache_capacity),
        }
    }

    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    pub fn cache(&self) -> &RouteCache {
        &self.cache
    }

    /// Finds a route from the network `source` to the network `destination`.
    ///
    /// A query seen before is answered from the cache without touching
    /// `hops`. Otherwise the route is built with `hops` and remembered if
    /// there is room.
    pub async fn query<P>(
        &mut self,
        source: &str,
        destination: &str,
        hops: &mut P,
    ) -> Result<QueryReport, QueryError>
    where
        P: HopProvider + ?Sized,
    {
        for address in [source, destination] {
            if !ip::validate(address) {
                return Err(QueryError::InvalidAddress(address.to_string()));
            }
        }
        let source_router = self
            .topology
            .owner_router(source)
            .ok_or_else(|| QueryError::UnknownSource(source.to_string()))?;
        let destination_router = self
            .topology
            .owner_router(destination)
            .ok_or_else(|| QueryError::UnknownDestination(destination.to_string()))?;

        let query = RouteQuery::new(source, destination);
        let (path, origin) = match self.cache.lookup(&query) {
            Some(path) => (path.clone(), RouteOrigin::Cache),
            None => {
                let path = resolve(&self.topology, source_router, destination_router, hops).await?;
                let cached = match self.cache.insert(query.clone(), path.clone()) {
                    Ok(()) => true,
                    Err(e) => {
                        logging::cache_skipped_event(&query, &e);
                        false
                    }
                };
                (path, RouteOrigin::Fresh { cached })
            }
        };

        let report = QueryReport {
            query,
            source_router,
            destination_router,
            path,
            origin,
        };
        logging::route_event(&report);
        Ok(report)
    }
}

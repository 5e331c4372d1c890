//! Hopnet, a small router simulator that answers "how do I get from IP A to
//! IP B" for a fixed network of routers.
//!
//! # Uses
//!
//! - Students can explore how a packet's path is built one hop at a time
//!   across routers that only know their direct links.
//! - Instructors can describe a topology once and let students experiment
//!   with manual routes, seeing why some hops are rejected.
//!
//! # Organization
//! - [`ip`] validates dotted-quad addresses
//! - [`Topology`] holds the adjacency matrix and which router owns which
//!   network
//! - [`resolve`] builds a [`ResolvedPath`] either by taking a direct link or by
//!   asking a [`HopProvider`] for each hop
//! - [`RouteCache`] remembers every route built so far
//! - [`Controller`] runs a whole query and is the entry point for front ends
//!
//! # Hop providers
//!
//! The resolver never reads input on its own. Every decision, whether to take
//! a direct link and which router comes next, is requested from a
//! [`HopProvider`]. A console front end prompts a person; tests use
//! [`ScriptedHops`] to replay a fixed list of answers.

mod logging;

pub mod ip;

mod router;
pub use router::RouterId;

pub mod topology;
pub use topology::{ConfigError, Topology, TopologyBuilder};

pub mod path;
pub use path::ResolvedPath;

pub mod resolver;
pub use resolver::{
    resolve, HopProvider, HopProviderError, HopRejection, HopRequest, ResolveError,
    ScriptedHops, ShortcutChoice,
};

pub mod route_cache;
pub use route_cache::{RouteCache, RouteCacheEntry, RouteCacheError, RouteQuery};

pub mod controller;
pub use controller::{Controller, QueryError, QueryReport, RouteOrigin};

//! Builds a [`ResolvedPath`] between two routers, one operator decision at a
//! time.
//!
//! The resolver performs no search. When the source links straight to the
//! destination it offers that link; otherwise, or if the offer is declined,
//! it asks its [`HopProvider`] for one hop after another and only accepts
//! hops that follow a direct link. Illegal proposals are reported back to the
//! provider and asked for again, so the only way out is a complete path or a
//! provider that has stopped answering.
//!
//! Nothing prevents an operator from walking in circles. Resolution runs for
//! as long as the provider keeps proposing hops.

use crate::{logging, ResolvedPath, RouterId, Topology};
use std::collections::VecDeque;

/// The answer to a direct link offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutChoice {
    /// Use the direct link as the whole route.
    Accept,
    /// Build the route by hand instead.
    Decline,
}

/// A proposal for the next step of a manually built route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HopRequest {
    /// Jump straight to the destination from the current router.
    Finalize,
    /// Move to the router with this id. The id is unchecked, which is why it
    /// is not a [`RouterId`]. Providers that cannot read an id pass one out of
    /// range, such as `-1`.
    Router(i64),
}

/// Why a proposed hop was not taken.
#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq, Eq)]
pub enum HopRejection {
    #[error("Cannot finalize yet. Router {current} has no direct link to {destination} (Destination).")]
    PrematureFinalize {
        current: RouterId,
        destination: RouterId,
    },
    #[error("Invalid router ID. Must be between 1 and {router_count}.")]
    OutOfRange { requested: i64, router_count: usize },
    #[error("{destination} is the destination, but {current} has no direct link to {destination}. Please choose an intermediate router first.")]
    DestinationNotAdjacent {
        current: RouterId,
        destination: RouterId,
    },
    #[error("Invalid path: Router {current} has no direct link to Router {requested}.")]
    NotAdjacent {
        current: RouterId,
        requested: RouterId,
    },
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum HopProviderError {
    #[error("No more hop input is available")]
    Closed,
    #[error("Failed to read hop input: {0}")]
    Io(String),
}

impl From<std::io::Error> for HopProviderError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("Router {0} is not part of the topology")]
    UnknownRouter(RouterId),
    #[error("The hop provider stopped answering")]
    Provider(#[from] HopProviderError),
}

/// Supplies the decisions the resolver cannot make on its own.
///
/// Both requests may be made any number of times during one resolution. A
/// provider returns an error only when it can no longer answer at all, for
/// example when its input has been closed.
#[async_trait::async_trait]
pub trait HopProvider: Send {
    /// Asks whether the direct link from `source` to `destination` should be
    /// the whole route.
    async fn offer_shortcut(
        &mut self,
        source: RouterId,
        destination: RouterId,
    ) -> Result<ShortcutChoice, HopProviderError>;

    /// Asks where to go next from `current`.
    async fn next_hop(
        &mut self,
        current: RouterId,
        destination: RouterId,
    ) -> Result<HopRequest, HopProviderError>;

    /// Called when a proposal from [`next_hop`](Self::next_hop) was refused.
    /// The next call to `next_hop` retries from the same router.
    fn rejected(&mut self, _rejection: &HopRejection) {}

    /// Called after a hop lands on a router that links directly to the
    /// destination.
    fn destination_reachable(&mut self, _current: RouterId, _destination: RouterId) {}

    /// Called once the manual path reaches the destination. `from` is the
    /// last router before it and `via` the request that got there.
    fn arrived(&mut self, _from: RouterId, _destination: RouterId, _via: HopRequest) {}
}

/// Builds a route from `source` to `destination` following the links in
/// `topology`.
pub async fn resolve<P>(
    topology: &Topology,
    source: RouterId,
    destination: RouterId,
    hops: &mut P,
) -> Result<ResolvedPath, ResolveError>
where
    P: HopProvider + ?Sized,
{
    for router in [source, destination] {
        if !topology.contains(router) {
            return Err(ResolveError::UnknownRouter(router));
        }
    }

    if topology.adjacent(source, destination)
        && hops.offer_shortcut(source, destination).await? == ShortcutChoice::Accept
    {
        return Ok(ResolvedPath::new(vec![source, destination]));
    }

    let mut path = vec![source];
    let mut current = source;
    loop {
        let request = hops.next_hop(current, destination).await?;
        match step(topology, current, destination, request) {
            Ok(next) => {
                path.push(next);
                if next == destination {
                    hops.arrived(current, destination, request);
                    break;
                }
                current = next;
                if topology.adjacent(current, destination) {
                    hops.destination_reachable(current, destination);
                }
            }
            Err(rejection) => {
                logging::hop_rejected_event(&rejection);
                hops.rejected(&rejection);
            }
        }
    }

    let path = ResolvedPath::new(path);
    debug_assert!(path.follows(topology));
    Ok(path)
}

/// Decides where a single request leads from `current`.
fn step(
    topology: &Topology,
    current: RouterId,
    destination: RouterId,
    request: HopRequest,
) -> Result<RouterId, HopRejection> {
    let requested = match request {
        HopRequest::Finalize => {
            return if topology.adjacent(current, destination) {
                Ok(destination)
            } else {
                Err(HopRejection::PrematureFinalize {
                    current,
                    destination,
                })
            };
        }
        HopRequest::Router(id) => match u32::try_from(id).map(RouterId::new) {
            Ok(router) if topology.contains(router) => router,
            _ => {
                return Err(HopRejection::OutOfRange {
                    requested: id,
                    router_count: topology.router_count(),
                })
            }
        },
    };

    if !topology.adjacent(current, requested) {
        return Err(if requested == destination {
            HopRejection::DestinationNotAdjacent {
                current,
                destination,
            }
        } else {
            HopRejection::NotAdjacent { current, requested }
        });
    }
    Ok(requested)
}

/// A [`HopProvider`] that replays answers given up front.
///
/// Once a queue runs dry the provider reports [`HopProviderError::Closed`].
/// Rejections, reachability hints and arrivals are recorded for inspection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHops {
    shortcuts: VecDeque<ShortcutChoice>,
    hops: VecDeque<HopRequest>,
    offers: usize,
    requests: usize,
    pub rejections: Vec<HopRejection>,
    pub reachable: Vec<RouterId>,
    pub arrivals: Vec<(RouterId, HopRequest)>,
}

impl ScriptedHops {
    pub fn new() -> Self {
        Self::default()
    }

    /// A provider that accepts the first direct link offer it is given.
    pub fn accepting() -> Self {
        Self::new().shortcut(ShortcutChoice::Accept)
    }

    /// Queues an answer to a direct link offer.
    pub fn shortcut(mut self, choice: ShortcutChoice) -> Self {
        self.shortcuts.push_back(choice);
        self
    }

    /// Queues a hop to a router.
    pub fn hop(mut self, router: i64) -> Self {
        self.hops.push_back(HopRequest::Router(router));
        self
    }

    /// Queues a finalize request.
    pub fn finalize(mut self) -> Self {
        self.hops.push_back(HopRequest::Finalize);
        self
    }

    /// How many direct link offers were made.
    pub fn offers(&self) -> usize {
        self.offers
    }

    /// How many hops were requested.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Returns `true` if every queued answer has been used.
    pub fn is_exhausted(&self) -> bool {
        self.shortcuts.is_empty() && self.hops.is_empty()
    }
}

#[async_trait::async_trait]
impl HopProvider for ScriptedHops {
    async fn offer_shortcut(
        &mut self,
        _source: RouterId,
        _destination: RouterId,
    ) -> Result<ShortcutChoice, HopProviderError> {
        self.offers += 1;
        self.shortcuts.pop_front().ok_or(HopProviderError::Closed)
    }

    async fn next_hop(
        &mut self,
        _current: RouterId,
        _destination: RouterId,
    ) -> Result<HopRequest, HopProviderError> {
        self.requests += 1;
        self.hops.pop_front().ok_or(HopProviderError::Closed)
    }

    fn rejected(&mut self, rejection: &HopRejection) {
        self.rejections.push(*rejection);
    }

    fn destination_reachable(&mut self, current: RouterId, _destination: RouterId) {
        self.reachable.push(current);
    }

    fn arrived(&mut self, from: RouterId, _destination: RouterId, via: HopRequest) {
        self.arrivals.push((from, via));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(id: u32) -> RouterId {
        RouterId::new(id)
    }

    fn ids(path: &ResolvedPath) -> Vec<u32> {
        path.hops().iter().map(|hop| hop.into_inner()).collect()
    }

    fn reference() -> Topology {
        Topology::reference().build().unwrap()
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn accepted_shortcut_is_direct() {
        let topology = reference();
        let mut hops = ScriptedHops::accepting();
        let path = resolve(&topology, r(1), r(4), &mut hops).await.unwrap();
        assert_eq!(ids(&path), [1, 4]);
        assert_eq!(hops.offers(), 1);
        assert_eq!(hops.requests(), 0);
        assert!(hops.arrivals.is_empty());
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn declined_shortcut_builds_manually() {
        let topology = reference();
        let mut hops = ScriptedHops::new()
            .shortcut(ShortcutChoice::Decline)
            .hop(2)
            .hop(3)
            .finalize();
        let path = resolve(&topology, r(1), r(4), &mut hops).await.unwrap();
        assert_eq!(ids(&path), [1, 2, 3, 4]);
        assert!(path.follows(&topology));
        assert!(hops.is_exhausted());
        assert_eq!(hops.reachable, [r(3)]);
        assert_eq!(hops.arrivals, [(r(3), HopRequest::Finalize)]);
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn declined_shortcut_can_still_go_direct() {
        let topology = reference();
        let mut hops = ScriptedHops::new().shortcut(ShortcutChoice::Decline).hop(4);
        let path = resolve(&topology, r(1), r(4), &mut hops).await.unwrap();
        assert_eq!(ids(&path), [1, 4]);
        assert_eq!(hops.arrivals, [(r(1), HopRequest::Router(4))]);
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn no_offer_without_direct_link() {
        let topology = reference();
        let mut hops = ScriptedHops::new().hop(2).finalize();
        let path = resolve(&topology, r(1), r(3), &mut hops).await.unwrap();
        assert_eq!(ids(&path), [1, 2, 3]);
        assert_eq!(hops.offers(), 0);
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn rejected_hops_do_not_advance() {
        let topology = reference();
        let mut hops = ScriptedHops::new()
            .finalize() // R1 has no link to R3
            .hop(3) // the destination, but not linked
            .hop(7) // no such router
            .hop(-1)
            .hop(2)
            .hop(4) // R2 has no link to R4
            .hop(3);
        let path = resolve(&topology, r(1), r(3), &mut hops).await.unwrap();
        assert_eq!(ids(&path), [1, 2, 3]);
        assert_eq!(
            hops.rejections,
            [
                HopRejection::PrematureFinalize {
                    current: r(1),
                    destination: r(3)
                },
                HopRejection::DestinationNotAdjacent {
                    current: r(1),
                    destination: r(3)
                },
                HopRejection::OutOfRange {
                    requested: 7,
                    router_count: 4
                },
                HopRejection::OutOfRange {
                    requested: -1,
                    router_count: 4
                },
                HopRejection::NotAdjacent {
                    current: r(2),
                    requested: r(4)
                },
            ]
        );
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn zero_id_is_out_of_range() {
        let topology = reference();
        let mut hops = ScriptedHops::new().hop(0).hop(2).finalize();
        resolve(&topology, r(1), r(3), &mut hops).await.unwrap();
        assert!(matches!(
            hops.rejections[..],
            [HopRejection::OutOfRange { requested: 0, .. }]
        ));
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn cycles_are_allowed() {
        let topology = reference();
        let mut hops = ScriptedHops::new().hop(2).hop(1).hop(2).finalize();
        let path = resolve(&topology, r(1), r(3), &mut hops).await.unwrap();
        assert_eq!(ids(&path), [1, 2, 1, 2, 3]);
        assert!(path.follows(&topology));
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn exhausted_provider_fails() {
        let topology = reference();
        let mut hops = ScriptedHops::new().hop(2);
        assert_eq!(
            resolve(&topology, r(1), r(3), &mut hops).await,
            Err(ResolveError::Provider(HopProviderError::Closed))
        );
    }

    #[tokio::test]
    #[ntest::timeout(1000)]
    async fn unknown_routers_fail() {
        let topology = reference();
        let mut hops = ScriptedHops::accepting();
        assert_eq!(
            resolve(&topology, r(1), r(5), &mut hops).await,
            Err(ResolveError::UnknownRouter(r(5)))
        );
        assert_eq!(hops.offers(), 0);
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn rejections_are_logged() {
        let topology = reference();
        let mut hops = ScriptedHops::new().hop(9).hop(2).finalize();
        resolve(&topology, r(1), r(3), &mut hops).await.unwrap();
        assert!(logs_contain("Invalid router ID. Must be between 1 and 4."));
    }
}

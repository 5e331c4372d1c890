//! End to end routing scenarios on the reference topology.
use hopnet_core::{
    Controller, HopRejection, HopRequest, RouteOrigin, RouterId, ScriptedHops, ShortcutChoice,
    Topology,
};

const R1_NET: &str = "192.168.1.1";
const R2_NET: &str = "172.16.0.1";
const R3_NET: &str = "10.0.3.1";
const R4_NET: &str = "10.0.4.1";
const R1_SECOND_NET: &str = "192.168.1.2";

fn ids(report: &hopnet_core::QueryReport) -> Vec<u32> {
    report.path.hops().iter().map(|hop| hop.into_inner()).collect()
}

fn reference_controller(capacity: usize) -> anyhow::Result<Controller> {
    let mut builder = Topology::reference();
    builder
        .network(RouterId::new(1), R1_NET)?
        .network(RouterId::new(1), R1_SECOND_NET)?
        .network(RouterId::new(2), R2_NET)?
        .network(RouterId::new(3), R3_NET)?
        .network(RouterId::new(4), R4_NET)?;
    Ok(Controller::new(builder.build()?, capacity))
}

#[tokio::test]
#[ntest::timeout(1000)]
async fn direct_link_then_cache_hit() -> anyhow::Result<()> {
    let mut controller = reference_controller(20)?;

    let mut hops = ScriptedHops::accepting();
    let report = controller.query(R1_NET, R4_NET, &mut hops).await?;
    assert_eq!(ids(&report), [1, 4]);
    assert_eq!(report.path.legacy_encoding(), "14");
    assert_eq!(report.origin, RouteOrigin::Fresh { cached: true });

    let mut untouched = ScriptedHops::new();
    let again = controller.query(R1_NET, R4_NET, &mut untouched).await?;
    assert_eq!(ids(&again), [1, 4]);
    assert_eq!(again.origin, RouteOrigin::Cache);
    assert_eq!(untouched.offers(), 0);
    assert_eq!(untouched.requests(), 0);
    Ok(())
}

#[tokio::test]
#[ntest::timeout(1000)]
async fn shortcut_ignores_longer_alternatives() -> anyhow::Result<()> {
    let mut controller = reference_controller(20)?;
    let mut hops = ScriptedHops::accepting().hop(4).hop(3).finalize();
    let report = controller.query(R1_NET, R2_NET, &mut hops).await?;
    assert_eq!(ids(&report), [1, 2]);
    assert_eq!(hops.requests(), 0);
    Ok(())
}

#[tokio::test]
#[ntest::timeout(1000)]
async fn manual_route_through_intermediate() -> anyhow::Result<()> {
    let mut controller = reference_controller(20)?;
    let mut hops = ScriptedHops::new().hop(2).finalize();
    let report = controller.query(R1_NET, R3_NET, &mut hops).await?;
    assert_eq!(ids(&report), [1, 2, 3]);
    assert_eq!(report.path.legacy_encoding(), "123");
    assert!(report.path.follows(controller.topology()));
    assert_eq!(hops.offers(), 0);
    Ok(())
}

#[tokio::test]
#[ntest::timeout(1000)]
async fn operator_mistakes_are_retried() -> anyhow::Result<()> {
    let mut controller = reference_controller(20)?;
    let mut hops = ScriptedHops::new()
        .shortcut(ShortcutChoice::Decline)
        .hop(4) // R2 has no link to R4
        .finalize();
    let report = controller.query(R2_NET, R1_NET, &mut hops).await?;
    assert_eq!(ids(&report), [2, 1]);
    assert_eq!(
        hops.rejections,
        [HopRejection::NotAdjacent {
            current: RouterId::new(2),
            requested: RouterId::new(4)
        }]
    );

    let mut hops = ScriptedHops::new().hop(5).hop(3).hop(4);
    let report = controller.query(R2_NET, R4_NET, &mut hops).await?;
    assert_eq!(ids(&report), [2, 3, 4]);
    assert_eq!(
        hops.rejections,
        [HopRejection::OutOfRange {
            requested: 5,
            router_count: 4
        }]
    );
    Ok(())
}

#[tokio::test]
#[ntest::timeout(1000)]
async fn manual_paths_follow_links() -> anyhow::Result<()> {
    let scripts = [
        (R1_NET, R3_NET, ScriptedHops::new().hop(4).finalize()),
        (R1_NET, R3_NET, ScriptedHops::new().hop(2).hop(1).hop(4).hop(3)),
        (R2_NET, R4_NET, ScriptedHops::new().hop(1).hop(4)),
        (
            R4_NET,
            R2_NET,
            ScriptedHops::new().hop(2).hop(3).hop(3).finalize(),
        ),
    ];
    for (source, destination, mut hops) in scripts {
        let mut controller = reference_controller(20)?;
        let report = controller.query(source, destination, &mut hops).await?;
        assert!(report.path.follows(controller.topology()));
        assert_eq!(report.path.source(), report.source_router);
        assert_eq!(report.path.destination(), report.destination_router);
    }
    Ok(())
}

#[tokio::test]
#[ntest::timeout(1000)]
async fn cache_capacity_boundary() -> anyhow::Result<()> {
    let mut controller = reference_controller(3)?;
    let pairs = [(R1_NET, R2_NET), (R2_NET, R1_NET), (R1_NET, R4_NET)];
    for (source, destination) in pairs {
        let mut hops = ScriptedHops::accepting();
        let report = controller.query(source, destination, &mut hops).await?;
        assert_eq!(report.origin, RouteOrigin::Fresh { cached: true });
    }
    let before = controller.cache().entries().to_vec();

    let mut hops = ScriptedHops::accepting();
    let report = controller.query(R4_NET, R1_NET, &mut hops).await?;
    assert_eq!(ids(&report), [4, 1]);
    assert_eq!(report.origin, RouteOrigin::Fresh { cached: false });
    assert_eq!(controller.cache().entries(), before);

    // earlier routes are still served
    let mut untouched = ScriptedHops::new();
    let report = controller.query(R2_NET, R1_NET, &mut untouched).await?;
    assert_eq!(report.origin, RouteOrigin::Cache);
    Ok(())
}

#[tokio::test]
#[ntest::timeout(1000)]
async fn same_router_uses_its_self_link() -> anyhow::Result<()> {
    let mut controller = reference_controller(20)?;

    let mut hops = ScriptedHops::accepting();
    let report = controller.query(R1_NET, R1_SECOND_NET, &mut hops).await?;
    assert_eq!(report.source_router, RouterId::new(1));
    assert_eq!(report.destination_router, RouterId::new(1));
    assert_eq!(ids(&report), [1, 1]);
    assert_eq!(report.path.legacy_encoding(), "11");
    assert_eq!(hops.offers(), 1);

    // declining still ends on the self link
    let mut hops = ScriptedHops::new().shortcut(ShortcutChoice::Decline).finalize();
    let report = controller.query(R1_SECOND_NET, R1_NET, &mut hops).await?;
    assert_eq!(ids(&report), [1, 1]);
    assert_eq!(hops.arrivals, [(RouterId::new(1), HopRequest::Finalize)]);

    let mut hops = ScriptedHops::accepting();
    let report = controller.query(R1_NET, R1_NET, &mut hops).await?;
    assert_eq!(ids(&report), [1, 1]);
    assert_eq!(controller.cache().len(), 3);
    Ok(())
}

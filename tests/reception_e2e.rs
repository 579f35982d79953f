// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// End-to-end reception scenarios across a small in-process cluster.

use plexspaces_reception::{
    ActorHandle, ClusterMembership, GossipDriver, GossipTransport, InMemoryTransport, Listing,
    LocalActorRuntime, NodeId, Receptionist, ReceptionistConfig, ReceptionistRef, ServiceKey,
    StaticMembership,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

struct Ping;

const FLUSH: Duration = Duration::from_millis(20);
const GOSSIP: Duration = Duration::from_millis(20);

struct Cluster {
    nodes: Vec<(ReceptionistRef, Arc<LocalActorRuntime>)>,
}

impl Cluster {
    async fn start(names: &[&str]) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        let transport = Arc::new(InMemoryTransport::new());
        let membership = Arc::new(StaticMembership::new(
            names.iter().map(|name| NodeId::new(*name)).collect(),
        ));
        let mut nodes = Vec::new();
        for name in names {
            let runtime = Arc::new(LocalActorRuntime::new());
            let config = ReceptionistConfig::new()
                .with_flush_delay(FLUSH)
                .with_gossip_interval(GOSSIP)
                .with_ask_timeout(Duration::from_secs(2));
            let receptionist = Receptionist::spawn(NodeId::new(*name), config, runtime.clone());
            runtime.attach(&receptionist).await;
            transport
                .register_node(NodeId::new(*name), receptionist.clone())
                .await;
            let _driver = GossipDriver::spawn(
                receptionist.clone(),
                membership.clone() as Arc<dyn ClusterMembership>,
                transport.clone() as Arc<dyn GossipTransport>,
                GOSSIP,
            );
            nodes.push((receptionist, runtime));
        }
        Self { nodes }
    }

    fn receptionist(&self, index: usize) -> &ReceptionistRef {
        &self.nodes[index].0
    }

    fn runtime(&self, index: usize) -> &Arc<LocalActorRuntime> {
        &self.nodes[index].1
    }
}

async fn eventually(
    receptionist: &ReceptionistRef,
    key: &ServiceKey,
    predicate: impl Fn(&Listing) -> bool,
) -> Listing {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let listing = receptionist.lookup(key.clone()).await.unwrap();
        if predicate(&listing) {
            return listing;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "condition not reached, last listing: {:?}",
            listing
        );
        sleep(Duration::from_millis(10)).await;
    }
}

/// The reference scenario: two registrations are visible to lookup, then a
/// termination shrinks the next listing a prior subscriber receives
#[tokio::test]
async fn test_register_lookup_terminate_scenario() {
    let cluster = Cluster::start(&["node-1"]).await;
    let receptionist = cluster.receptionist(0);
    let runtime = cluster.runtime(0);

    let key = ServiceKey::new::<Ping>("svc");
    let ref_a = ActorHandle::new("ref-a", NodeId::new("node-1"));
    let ref_b = ActorHandle::new("ref-b", NodeId::new("node-1"));

    let subscriber = ActorHandle::new("sub", NodeId::new("node-1"));
    let mut inbox = runtime.register_inbox(subscriber.clone()).await;
    receptionist.subscribe(key.clone(), subscriber).unwrap();
    assert!(inbox.recv().await.unwrap().is_empty());

    receptionist.register(key.clone(), ref_a.clone()).unwrap();
    receptionist.register(key.clone(), ref_b.clone()).unwrap();

    let lookup = receptionist.lookup(key.clone()).await.unwrap();
    assert_eq!(lookup.len(), 2);
    assert!(lookup.contains(&ref_a));
    assert!(lookup.contains(&ref_b));

    let both = inbox.recv().await.unwrap();
    assert_eq!(both.len(), 2);

    runtime.terminate(&ref_a).await;

    let after = inbox.recv().await.unwrap();
    assert_eq!(after.len(), 1);
    assert!(after.contains(&ref_b));
}

/// Registrations and removals issued across three nodes converge to the
/// same view everywhere once gossip has run
#[tokio::test]
async fn test_three_node_convergence() {
    let cluster = Cluster::start(&["a", "b", "c"]).await;
    let key = ServiceKey::new::<Ping>("svc");

    let handles: Vec<ActorHandle> = ["a", "b", "c"]
        .iter()
        .map(|node| ActorHandle::new(format!("worker-{}", node), NodeId::new(*node)))
        .collect();

    for (index, handle) in handles.iter().enumerate() {
        cluster
            .receptionist(index)
            .register(key.clone(), handle.clone())
            .unwrap();
    }
    // one of them goes away again, announced on a different node
    cluster
        .receptionist(2)
        .remove(key.clone(), handles[0].clone())
        .unwrap();

    let expect = |listing: &Listing| {
        listing.len() == 2 && listing.contains(&handles[1]) && listing.contains(&handles[2])
    };
    let view_a = eventually(cluster.receptionist(0), &key, expect).await;
    let view_b = eventually(cluster.receptionist(1), &key, expect).await;
    let view_c = eventually(cluster.receptionist(2), &key, expect).await;
    assert_eq!(view_a.handles(), view_b.handles());
    assert_eq!(view_b.handles(), view_c.handles());
}

/// A subscriber on one node sees registrations made anywhere in the
/// cluster, batched by the delayed flush
#[tokio::test]
async fn test_cluster_wide_subscription() {
    let cluster = Cluster::start(&["a", "b"]).await;
    let key = ServiceKey::new::<Ping>("svc");

    let subscriber = ActorHandle::new("sub", NodeId::new("b"));
    let mut inbox = cluster.runtime(1).register_inbox(subscriber.clone()).await;
    cluster
        .receptionist(1)
        .subscribe(key.clone(), subscriber)
        .unwrap();
    assert!(inbox.recv().await.unwrap().is_empty());

    let remote = ActorHandle::new("w", NodeId::new("a"));
    cluster
        .receptionist(0)
        .register(key.clone(), remote.clone())
        .unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    let mut last = None;
    loop {
        let listing = tokio::time::timeout_at(deadline, inbox.recv())
            .await
            .expect("subscription update never arrived")
            .unwrap();
        if let Some(previous) = last {
            assert!(listing.version() > previous, "listing version regressed");
        }
        last = Some(listing.version());
        if listing.contains(&remote) {
            break;
        }
    }
}

/// Terminating an actor on its home node clears it from every key on
/// every node, with no explicit remove anywhere
#[tokio::test]
async fn test_cluster_wide_termination_cleanup() {
    let cluster = Cluster::start(&["a", "b"]).await;
    let key_1 = ServiceKey::new::<Ping>("svc-1");
    let key_2 = ServiceKey::new::<Ping>("svc-2");

    let worker = ActorHandle::new("w", NodeId::new("a"));
    cluster
        .receptionist(0)
        .register(key_1.clone(), worker.clone())
        .unwrap();
    cluster
        .receptionist(0)
        .register(key_2.clone(), worker.clone())
        .unwrap();
    eventually(cluster.receptionist(1), &key_1, |l| l.len() == 1).await;
    eventually(cluster.receptionist(1), &key_2, |l| l.len() == 1).await;

    cluster.runtime(0).terminate(&worker).await;

    eventually(cluster.receptionist(0), &key_1, |l| l.is_empty()).await;
    eventually(cluster.receptionist(0), &key_2, |l| l.is_empty()).await;
    eventually(cluster.receptionist(1), &key_1, |l| l.is_empty()).await;
    eventually(cluster.receptionist(1), &key_2, |l| l.is_empty()).await;
}

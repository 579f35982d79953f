// SPDX-License-Identifier: LGPL-2.1-or-later
// Copyright (C) 2025 Shahzad A. Bhatti <bhatti@plexobject.com>
//
// Tests for gossip-driven convergence between receptionist instances.

use plexspaces_gossip::{
    ClusterMembership, GossipDriver, GossipTransport, InMemoryTransport, StaticMembership,
};
use plexspaces_reception_core::{ActorHandle, Listing, NodeId, ReceptionistConfig, ServiceKey};
use plexspaces_receptionist::{LocalActorRuntime, Receptionist, ReceptionistRef};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;

struct Ping;

const FLUSH: Duration = Duration::from_millis(20);
const GOSSIP: Duration = Duration::from_millis(20);

struct TestNode {
    receptionist: ReceptionistRef,
    runtime: Arc<LocalActorRuntime>,
}

async fn spawn_node(node: &str, transport: &Arc<InMemoryTransport>) -> TestNode {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let runtime = Arc::new(LocalActorRuntime::new());
    let config = ReceptionistConfig::new()
        .with_flush_delay(FLUSH)
        .with_gossip_interval(GOSSIP)
        .with_ask_timeout(Duration::from_secs(2));
    let receptionist = Receptionist::spawn(NodeId::new(node), config, runtime.clone());
    runtime.attach(&receptionist).await;
    transport
        .register_node(NodeId::new(node), receptionist.clone())
        .await;
    TestNode {
        receptionist,
        runtime,
    }
}

fn start_driver(
    node: &TestNode,
    membership: &Arc<StaticMembership>,
    transport: &Arc<InMemoryTransport>,
) {
    let _driver = GossipDriver::spawn(
        node.receptionist.clone(),
        membership.clone() as Arc<dyn ClusterMembership>,
        transport.clone() as Arc<dyn GossipTransport>,
        GOSSIP,
    );
}

/// Poll a lookup until `predicate` holds or the deadline passes
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

/// TEST 1: A registration on one node becomes visible on the other
#[tokio::test]
async fn test_registration_propagates() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;
    let membership = Arc::new(StaticMembership::new(vec![NodeId::new("a"), NodeId::new("b")]));
    start_driver(&node_a, &membership, &transport);
    start_driver(&node_b, &membership, &transport);

    let key = ServiceKey::new::<Ping>("svc");
    let handle = ActorHandle::new("w", NodeId::new("a"));
    node_a.receptionist.register(key.clone(), handle.clone()).unwrap();

    let listing = eventually(&node_b.receptionist, &key, |l| l.len() == 1).await;
    assert!(listing.contains(&handle));
}

/// TEST 2: Interleaved writes on both nodes converge to identical views
#[tokio::test]
async fn test_two_node_convergence() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;
    let membership = Arc::new(StaticMembership::new(vec![NodeId::new("a"), NodeId::new("b")]));
    start_driver(&node_a, &membership, &transport);
    start_driver(&node_b, &membership, &transport);

    let key = ServiceKey::new::<Ping>("svc");
    let on_a = ActorHandle::new("wa", NodeId::new("a"));
    let on_b = ActorHandle::new("wb", NodeId::new("b"));
    let short_lived = ActorHandle::new("tmp", NodeId::new("a"));

    node_a.receptionist.register(key.clone(), on_a.clone()).unwrap();
    node_a.receptionist.register(key.clone(), short_lived.clone()).unwrap();
    node_b.receptionist.register(key.clone(), on_b.clone()).unwrap();
    node_a.receptionist.remove(key.clone(), short_lived).unwrap();

    let on_a_view = eventually(&node_a.receptionist, &key, |l| l.len() == 2).await;
    let on_b_view = eventually(&node_b.receptionist, &key, |l| l.len() == 2).await;
    assert_eq!(on_a_view.handles(), on_b_view.handles());
    assert!(on_a_view.contains(&on_a));
    assert!(on_a_view.contains(&on_b));
}

/// TEST 3: A remove issued on the peer dominates the origin's register on
/// both sides, permanently
#[tokio::test]
async fn test_remove_wins_across_nodes() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;
    let membership = Arc::new(StaticMembership::new(vec![NodeId::new("a"), NodeId::new("b")]));
    start_driver(&node_a, &membership, &transport);
    start_driver(&node_b, &membership, &transport);

    let key = ServiceKey::new::<Ping>("svc");
    let handle = ActorHandle::new("w", NodeId::new("a"));

    node_a.receptionist.register(key.clone(), handle.clone()).unwrap();
    eventually(&node_b.receptionist, &key, |l| l.len() == 1).await;

    node_b.receptionist.remove(key.clone(), handle.clone()).unwrap();

    eventually(&node_a.receptionist, &key, |l| l.is_empty()).await;
    eventually(&node_b.receptionist, &key, |l| l.is_empty()).await;
}

/// TEST 4: Termination on the owning node clears the handle cluster-wide
#[tokio::test]
async fn test_termination_propagates() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;
    let membership = Arc::new(StaticMembership::new(vec![NodeId::new("a"), NodeId::new("b")]));
    start_driver(&node_a, &membership, &transport);
    start_driver(&node_b, &membership, &transport);

    let key = ServiceKey::new::<Ping>("svc");
    let handle = ActorHandle::new("w", NodeId::new("a"));

    node_a.receptionist.register(key.clone(), handle.clone()).unwrap();
    eventually(&node_b.receptionist, &key, |l| l.len() == 1).await;

    node_a.runtime.terminate(&handle).await;

    eventually(&node_b.receptionist, &key, |l| l.is_empty()).await;
}

/// TEST 5: A node-down event removes everything the dead node hosted
#[tokio::test]
async fn test_node_down_bulk_removal() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;
    let membership = Arc::new(StaticMembership::new(vec![NodeId::new("a"), NodeId::new("b")]));
    start_driver(&node_a, &membership, &transport);
    start_driver(&node_b, &membership, &transport);

    let key_1 = ServiceKey::new::<Ping>("svc-1");
    let key_2 = ServiceKey::new::<Ping>("svc-2");
    let doomed_1 = ActorHandle::new("d1", NodeId::new("b"));
    let doomed_2 = ActorHandle::new("d2", NodeId::new("b"));
    let survivor = ActorHandle::new("s", NodeId::new("a"));

    node_a.receptionist.register(key_1.clone(), survivor.clone()).unwrap();
    node_b.receptionist.register(key_1.clone(), doomed_1.clone()).unwrap();
    node_b.receptionist.register(key_2.clone(), doomed_2.clone()).unwrap();
    eventually(&node_a.receptionist, &key_1, |l| l.len() == 2).await;

    // membership reports node b down; its route disappears with it
    transport.unregister_node(&NodeId::new("b")).await;
    membership.set_peers(vec![NodeId::new("a")]).await;
    node_a.receptionist.node_down(NodeId::new("b")).unwrap();

    let listing = eventually(&node_a.receptionist, &key_1, |l| l.len() == 1).await;
    assert!(listing.contains(&survivor));
    eventually(&node_a.receptionist, &key_2, |l| l.is_empty()).await;
}

/// TEST 6: Subscribers on a peer observe remotely registered handles
#[tokio::test]
async fn test_subscription_sees_remote_registrations() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;
    let membership = Arc::new(StaticMembership::new(vec![NodeId::new("a"), NodeId::new("b")]));
    start_driver(&node_a, &membership, &transport);
    start_driver(&node_b, &membership, &transport);

    let key = ServiceKey::new::<Ping>("svc");
    let subscriber = ActorHandle::new("sub", NodeId::new("b"));
    let mut inbox = node_b.runtime.register_inbox(subscriber.clone()).await;
    node_b.receptionist.subscribe(key.clone(), subscriber).unwrap();

    let initial = inbox.recv().await.unwrap();
    assert!(initial.is_empty());

    let handle = ActorHandle::new("w", NodeId::new("a"));
    node_a.receptionist.register(key, handle.clone()).unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let listing = tokio::time::timeout_at(deadline, inbox.recv())
            .await
            .expect("no listing arrived via gossip")
            .unwrap();
        if listing.contains(&handle) {
            break;
        }
    }
}

/// TEST 7: Tails exchanged by hand converge without any driver
#[tokio::test]
async fn test_manual_tail_exchange_converges() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;

    let key = ServiceKey::new::<Ping>("svc");
    let on_a = ActorHandle::new("wa", NodeId::new("a"));
    let on_b = ActorHandle::new("wb", NodeId::new("b"));
    node_a.receptionist.register(key.clone(), on_a).unwrap();
    node_b.receptionist.register(key.clone(), on_b).unwrap();

    // a -> b
    let export = node_a
        .receptionist
        .export_tail_for(NodeId::new("b"))
        .await
        .unwrap();
    node_b
        .receptionist
        .import_tail(NodeId::new("a"), export.observed, export.entries)
        .unwrap();

    // b -> a (b's tail now includes a's entries transitively)
    let export = node_b
        .receptionist
        .export_tail_for(NodeId::new("a"))
        .await
        .unwrap();
    node_a
        .receptionist
        .import_tail(NodeId::new("b"), export.observed, export.entries)
        .unwrap();

    let view_a = node_a.receptionist.lookup(key.clone()).await.unwrap();
    let view_b = node_b.receptionist.lookup(key).await.unwrap();
    assert_eq!(view_a.handles(), view_b.handles());
    assert_eq!(view_a.len(), 2);
}

/// TEST 8: Re-delivering the same tail is idempotent
#[tokio::test]
async fn test_duplicate_tail_delivery_idempotent() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;

    let key = ServiceKey::new::<Ping>("svc");
    node_a
        .receptionist
        .register(key.clone(), ActorHandle::new("w", NodeId::new("a")))
        .unwrap();

    let export = node_a
        .receptionist
        .export_tail_for(NodeId::new("b"))
        .await
        .unwrap();
    for _ in 0..3 {
        node_b
            .receptionist
            .import_tail(
                NodeId::new("a"),
                export.observed.clone(),
                export.entries.clone(),
            )
            .unwrap();
    }

    let listing = node_b.receptionist.lookup(key).await.unwrap();
    assert_eq!(listing.len(), 1);
}

/// TEST 9: An unreachable peer does not stall the round; the next cycle
/// still reaches the live one
#[tokio::test]
async fn test_unreachable_peer_skipped() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;
    // "c" is in the candidate set but has no route
    let membership = Arc::new(StaticMembership::new(vec![
        NodeId::new("a"),
        NodeId::new("b"),
        NodeId::new("c"),
    ]));
    start_driver(&node_a, &membership, &transport);
    start_driver(&node_b, &membership, &transport);

    let key = ServiceKey::new::<Ping>("svc");
    let handle = ActorHandle::new("w", NodeId::new("a"));
    node_a.receptionist.register(key.clone(), handle.clone()).unwrap();

    let listing = eventually(&node_b.receptionist, &key, |l| l.len() == 1).await;
    assert!(listing.contains(&handle));
}

/// TEST 10: A gap injected into a tail is dropped and healed by the next
/// full exchange
#[tokio::test]
async fn test_gap_dropped_then_healed() {
    let transport = Arc::new(InMemoryTransport::new());
    let node_a = spawn_node("a", &transport).await;
    let node_b = spawn_node("b", &transport).await;

    let key = ServiceKey::new::<Ping>("svc");
    for name in ["w1", "w2", "w3"] {
        node_a
            .receptionist
            .register(key.clone(), ActorHandle::new(name, NodeId::new("a")))
            .unwrap();
    }

    let export = node_a
        .receptionist
        .export_tail_for(NodeId::new("b"))
        .await
        .unwrap();
    assert_eq!(export.entries.len(), 3);

    // deliver a malformed tail missing its first entry: all of it gaps out
    node_b
        .receptionist
        .import_tail(
            NodeId::new("a"),
            plexspaces_oplog::VersionVector::new(),
            export.entries[1..].to_vec(),
        )
        .unwrap();
    let listing = node_b.receptionist.lookup(key.clone()).await.unwrap();
    assert!(listing.is_empty());

    // the full exchange heals the gap
    node_b
        .receptionist
        .import_tail(NodeId::new("a"), export.observed, export.entries)
        .unwrap();
    let listing = node_b.receptionist.lookup(key).await.unwrap();
    assert_eq!(listing.len(), 3);
}

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex, RwLock,
    },
};

use grid::{Connector, GridNode, PeerClient, PeerError};
use inc::grid::info::NodeInfo;

/// Scripted stand-in for a remote dispatcher. Reachability is toggled by
/// the test; every call against an unreachable peer fails uniformly.
struct MockPeer {
    url: String,
    alive: AtomicBool,
    neighbours: RwLock<Vec<String>>,
    info_calls: AtomicUsize,
    added: Mutex<Vec<(String, bool)>>,
}

impl MockPeer {
    fn new(url: &str) -> Self {
        MockPeer {
            url: url.to_string(),
            alive: AtomicBool::new(true),
            neighbours: RwLock::new(Vec::new()),
            info_calls: AtomicUsize::new(0),
            added: Mutex::new(Vec::new()),
        }
    }

    fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    fn reachable(&self) -> Result<(), PeerError> {
        if self.alive.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PeerError::unreachable(format!("{} is down", self.url)))
        }
    }

    fn added_calls(&self) -> Vec<(String, bool)> {
        self.added.lock().unwrap().clone()
    }
}

impl PeerClient for MockPeer {
    fn neighbours(&self) -> Result<Vec<String>, PeerError> {
        self.reachable()?;
        Ok(self.neighbours.read().unwrap().clone())
    }

    fn add_neighbour(&self, url: &str, propagate: bool) -> Result<bool, PeerError> {
        self.reachable()?;
        self.added
            .lock()
            .unwrap()
            .push((url.to_string(), propagate));
        Ok(true)
    }

    fn alive(&self) -> Result<bool, PeerError> {
        self.reachable()?;
        Ok(true)
    }

    fn info(&self) -> Result<NodeInfo, PeerError> {
        self.reachable()?;
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        Ok(node_info(&self.url))
    }
}

#[derive(Default)]
struct MockGrid {
    peers: Mutex<HashMap<String, Arc<MockPeer>>>,
}

impl MockGrid {
    fn peer(&self, url: &str) -> Arc<MockPeer> {
        Arc::clone(
            self.peers
                .lock()
                .unwrap()
                .entry(url.to_string())
                .or_insert_with(|| Arc::new(MockPeer::new(url))),
        )
    }
}

struct MockConnector {
    grid: Arc<MockGrid>,
}

impl Connector for MockConnector {
    fn connect(&self, url: &str) -> Arc<dyn PeerClient> {
        self.grid.peer(url)
    }
}

fn node_info(url: &str) -> NodeInfo {
    NodeInfo {
        url: url.to_string(),
        pipe_id: "100000".to_string(),
        weight: 1.0,
        nickname: format!("dispatcher-{}", url),
        cost: 0.0,
    }
}

fn new_node(grid: &Arc<MockGrid>, url: &str) -> GridNode {
    GridNode::new(
        node_info(url),
        Box::new(MockConnector {
            grid: Arc::clone(grid),
        }),
    )
}

#[test]
fn test_own_url_is_never_a_neighbour() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");

    assert!(!node.add_neighbour("h1:1111", false));
    assert!(node.neighbours().is_empty());
    assert!(node.dead_nodes().is_empty());
}

#[test]
fn test_passive_join_starts_empty() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");

    node.bootstrap(None);
    assert!(node.neighbours().is_empty());
    assert!(node.dead_nodes().is_empty());
}

#[test]
fn test_add_neighbour_is_idempotent() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");

    assert!(node.add_neighbour("h2:2222", false));
    assert!(!node.add_neighbour("h2:2222", false));
    assert_eq!(node.neighbours(), vec!["h2:2222"]);

    // the relation was made bidirectional exactly once
    assert_eq!(
        grid.peer("h2:2222").added_calls(),
        vec![("h1:1111".to_string(), false)]
    );
}

#[test]
fn test_unreachable_peer_is_marked_dead_on_add() {
    let grid = Arc::new(MockGrid::default());
    grid.peer("h9:9999").set_alive(false);
    let node = new_node(&grid, "h1:1111");

    assert!(node.add_neighbour("h9:9999", false));
    assert!(node.neighbours().is_empty());
    assert_eq!(node.dead_nodes(), vec!["h9:9999"]);
}

#[test]
fn test_ping_moves_silent_neighbour_to_dead() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");
    node.add_neighbour("h2:2222", false);
    node.add_neighbour("h3:3333", false);

    grid.peer("h3:3333").set_alive(false);
    node.ping();

    assert_eq!(node.neighbours(), vec!["h2:2222"]);
    assert_eq!(node.dead_nodes(), vec!["h3:3333"]);
}

#[test]
fn test_comeback_reinstates_and_informs_live_peers() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");
    node.add_neighbour("h2:2222", false);
    node.add_neighbour("h3:3333", false);

    grid.peer("h3:3333").set_alive(false);
    node.ping();
    assert_eq!(node.dead_nodes(), vec!["h3:3333"]);

    grid.peer("h3:3333").set_alive(true);
    node.check_for_comebacks();

    assert_eq!(node.neighbours(), vec!["h2:2222", "h3:3333"]);
    assert!(node.dead_nodes().is_empty());
    // the surviving peer was told about the return
    assert!(grid
        .peer("h2:2222")
        .added_calls()
        .contains(&("h3:3333".to_string(), false)));
}

#[test]
fn test_still_silent_node_stays_dead() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");
    node.add_neighbour("h2:2222", false);

    grid.peer("h2:2222").set_alive(false);
    node.ping();
    node.check_for_comebacks();

    assert!(node.neighbours().is_empty());
    assert_eq!(node.dead_nodes(), vec!["h2:2222"]);
}

#[test]
fn test_info_cache_hits_until_membership_changes() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");
    node.add_neighbour("h2:2222", false);
    node.add_neighbour("h3:3333", false);

    let first = node.neighbours_with_info();
    assert_eq!(first.len(), 2);
    assert_eq!(grid.peer("h2:2222").info_calls.load(Ordering::SeqCst), 1);
    assert_eq!(grid.peer("h3:3333").info_calls.load(Ordering::SeqCst), 1);

    // unchanged membership: served from cache, no new calls
    let second = node.neighbours_with_info();
    assert_eq!(second, first);
    assert_eq!(grid.peer("h2:2222").info_calls.load(Ordering::SeqCst), 1);
    assert_eq!(grid.peer("h3:3333").info_calls.load(Ordering::SeqCst), 1);

    node.add_neighbour("h4:4444", false);
    let third = node.neighbours_with_info();
    assert_eq!(third.len(), 3);
    assert_eq!(grid.peer("h2:2222").info_calls.load(Ordering::SeqCst), 2);
    assert_eq!(grid.peer("h4:4444").info_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_info_gathering_drops_and_buries_silent_peers() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");
    node.add_neighbour("h2:2222", false);
    node.add_neighbour("h3:3333", false);

    grid.peer("h3:3333").set_alive(false);
    let records = node.neighbours_with_info();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].url, "h2:2222");
    assert_eq!(node.dead_nodes(), vec!["h3:3333"]);

    // the compacted result was cached under the shrunken membership
    node.neighbours_with_info();
    assert_eq!(grid.peer("h2:2222").info_calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_bootstrap_absorbs_seed_membership() {
    let grid = Arc::new(MockGrid::default());
    let seed = grid.peer("h9:9999");
    *seed.neighbours.write().unwrap() = vec![
        "h2:2222".to_string(),
        "h3:3333".to_string(),
        "h1:1111".to_string(),
    ];
    let node = new_node(&grid, "h1:1111");

    node.bootstrap(Some("h9:9999"));

    // everything the seed knew, minus our own url, plus the seed itself
    assert_eq!(
        node.neighbours(),
        vec!["h2:2222", "h3:3333", "h9:9999"]
    );
    // the seed learned about us with propagation requested
    assert!(seed
        .added_calls()
        .contains(&("h1:1111".to_string(), true)));
    // pre-existing members were told about the seed relation, single hop
    assert!(grid
        .peer("h2:2222")
        .added_calls()
        .contains(&("h9:9999".to_string(), false)));
}

#[test]
fn test_bootstrap_survives_dead_seed() {
    let grid = Arc::new(MockGrid::default());
    grid.peer("h9:9999").set_alive(false);
    let node = new_node(&grid, "h1:1111");

    node.bootstrap(Some("h9:9999"));

    assert!(node.neighbours().is_empty());
    assert_eq!(node.dead_nodes(), vec!["h9:9999"]);
}

#[test]
fn test_announce_skips_dead_nodes_and_the_subject() {
    let grid = Arc::new(MockGrid::default());
    let node = new_node(&grid, "h1:1111");
    node.add_neighbour("h2:2222", false);
    node.add_neighbour("h3:3333", false);

    grid.peer("h3:3333").set_alive(false);
    node.ping();
    let buried_calls = grid.peer("h3:3333").added_calls().len();

    node.announce("h4:4444");
    assert!(grid
        .peer("h2:2222")
        .added_calls()
        .contains(&("h4:4444".to_string(), false)));
    assert_eq!(grid.peer("h3:3333").added_calls().len(), buried_calls);

    // a neighbour is never told about itself
    node.announce("h2:2222");
    assert!(!grid
        .peer("h2:2222")
        .added_calls()
        .contains(&("h2:2222".to_string(), false)));
}

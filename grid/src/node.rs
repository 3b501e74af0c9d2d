use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, RwLock},
    thread,
};

use inc::grid::info::NodeInfo;
use log::{error, info, warn};

use crate::client::{Connector, PeerClient};

struct InfoCache {
    fingerprint: String,
    records: Vec<NodeInfo>,
}

/// One dispatcher's view of the grid. Tracks which peers are believed
/// alive, which are believed dead, and keeps both sets eventually
/// consistent across the fleet through single-hop announce fanout and
/// periodic liveness probing.
///
/// A URL is in `neighbours` or in `dead_nodes`, never in both; a peer
/// oscillates between the two for the lifetime of the process. No peer
/// failure ever propagates out of this type, it only moves URLs between
/// the sets.
pub struct GridNode {
    info: NodeInfo,
    connector: Box<dyn Connector>,
    neighbours: RwLock<HashSet<String>>,
    dead_nodes: RwLock<HashSet<String>>,
    info_cache: RwLock<Option<InfoCache>>,
    peers: RwLock<HashMap<String, Arc<dyn PeerClient>>>,
}

impl GridNode {
    pub fn new(info: NodeInfo, connector: Box<dyn Connector>) -> Self {
        GridNode {
            info,
            connector,
            neighbours: RwLock::new(HashSet::new()),
            dead_nodes: RwLock::new(HashSet::new()),
            info_cache: RwLock::new(None),
            peers: RwLock::new(HashMap::new()),
        }
    }

    pub fn url(&self) -> &str {
        &self.info.url
    }

    /// This node's own identity record.
    pub fn info(&self) -> &NodeInfo {
        &self.info
    }

    /// Contact the seed neighbour, absorb its member list and announce
    /// this node to the rest of the grid. An unreachable seed degrades to
    /// an isolated start; the comeback check retries it later.
    ///
    /// **Must** run before the first ping cycle.
    pub fn bootstrap(&self, neighbour: Option<&str>) {
        let Some(seed) = neighbour else {
            info!("No seed neighbour given, waiting for the grid to find us");
            return;
        };
        if seed == self.info.url {
            return;
        }

        info!("Bootstrapping from seed neighbour {}", seed);
        match self.peer(seed).neighbours() {
            Ok(urls) => {
                // Pre-existing members, not newly announced: plain inserts.
                let mut neighbours = self.neighbours.write().unwrap();
                for url in urls {
                    if url == self.info.url || neighbours.contains(&url) {
                        continue;
                    }
                    info!("Adding neighbour {}", url);
                    neighbours.insert(url);
                }
            }
            Err(err) => {
                warn!("Seed neighbour {} seems dead: {}", seed, err);
                self.dead_nodes.write().unwrap().insert(seed.to_string());
                return;
            }
        }

        self.add_neighbour(seed, true);
    }

    /// Insert `url` into the live set. Returns `false` when `url` is this
    /// node's own or already present. The relation is made bidirectional
    /// by telling the new peer about us; if that call fails the peer goes
    /// straight to the dead set.
    pub fn add_neighbour(&self, url: &str, propagate: bool) -> bool {
        if url == self.info.url {
            return false;
        }
        {
            let mut neighbours = self.neighbours.write().unwrap();
            if neighbours.contains(url) {
                return false;
            }
            neighbours.insert(url.to_string());
            self.dead_nodes.write().unwrap().remove(url);
        }
        info!("Adding neighbour {}", url);

        if propagate {
            self.announce(url);
        }

        if self
            .peer(url)
            .add_neighbour(&self.info.url, propagate)
            .is_err()
        {
            warn!("Neighbour {} seems dead", url);
            self.mark_dead(url);
        }
        true
    }

    /// Single-hop fanout: tell every live neighbour except `url` itself
    /// about `url`. Targets that fail to answer are marked dead. Dead
    /// nodes are never contacted.
    pub fn announce(&self, url: &str) {
        let targets: Vec<String> = {
            let neighbours = self.neighbours.read().unwrap();
            neighbours
                .iter()
                .filter(|target| target.as_str() != url)
                .cloned()
                .collect()
        };

        let mut threads = Vec::new();
        for target in targets {
            let peer = self.peer(&target);
            let node_url = url.to_string();
            threads.push(thread::spawn(move || {
                (target, peer.add_neighbour(&node_url, false))
            }));
        }

        for thread in threads {
            match thread.join() {
                Ok((_, Ok(_))) => {}
                Ok((target, Err(_))) => {
                    warn!("Neighbour {} seems dead", target);
                    self.mark_dead(&target);
                }
                Err(err) => error!("Error by announcing neighbour: {:?}", err),
            }
        }
    }

    /// Current live set, sorted. The order carries no meaning, it only
    /// keeps the membership fingerprint stable.
    pub fn neighbours(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.neighbours.read().unwrap().iter().cloned().collect();
        urls.sort();
        urls
    }

    /// URLs currently believed unreachable, sorted.
    pub fn dead_nodes(&self) -> Vec<String> {
        let mut urls: Vec<String> = self.dead_nodes.read().unwrap().iter().cloned().collect();
        urls.sort();
        urls
    }

    /// Identity records of every live neighbour. Served from cache while
    /// the membership fingerprint is unchanged; otherwise every live peer
    /// is queried concurrently, non-responders are marked dead and
    /// dropped from the cached result.
    pub fn neighbours_with_info(&self) -> Vec<NodeInfo> {
        {
            let cache = self.info_cache.read().unwrap();
            if let Some(cache) = cache.as_ref() {
                if cache.fingerprint == self.fingerprint() {
                    return cache.records.clone();
                }
            }
        }

        let mut threads = Vec::new();
        for target in self.neighbours() {
            let peer = self.peer(&target);
            threads.push(thread::spawn(move || (target, peer.info())));
        }

        let mut responders = Vec::new();
        let mut records = Vec::new();
        for thread in threads {
            match thread.join() {
                Ok((target, Ok(record))) => {
                    responders.push(target);
                    records.push(record);
                }
                Ok((target, Err(_))) => {
                    warn!("Neighbour {} seems dead", target);
                    self.mark_dead(&target);
                }
                Err(err) => error!("Error by gathering neighbour info: {:?}", err),
            }
        }

        // Keyed by the membership the records were actually gathered from,
        // so a concurrent change forces a recomputation on the next call.
        let mut cache = self.info_cache.write().unwrap();
        *cache = Some(InfoCache {
            fingerprint: responders.join(","),
            records: records.clone(),
        });
        records
    }

    /// Probe every live neighbour concurrently. The ones that fail to
    /// answer move to the dead set until a later comeback check revives
    /// them; the tick interval is the only retry mechanism.
    pub fn ping(&self) {
        let mut threads = Vec::new();
        for target in self.neighbours() {
            let peer = self.peer(&target);
            threads.push(thread::spawn(move || (target, peer.alive())));
        }

        for thread in threads {
            match thread.join() {
                Ok((_, Ok(_))) => {}
                Ok((target, Err(_))) => {
                    warn!("Neighbour {} seems dead", target);
                    self.mark_dead(&target);
                }
                Err(err) => error!("Error by pinging neighbours: {:?}", err),
            }
        }
    }

    /// Probe every dead URL concurrently; the ones that answer again are
    /// reinstated, and the rest of the live peers are told about the
    /// return on a best-effort basis.
    pub fn check_for_comebacks(&self) {
        let mut threads = Vec::new();
        for target in self.dead_nodes() {
            let peer = self.peer(&target);
            threads.push(thread::spawn(move || (target, peer.alive())));
        }

        for thread in threads {
            match thread.join() {
                Ok((target, Ok(_))) => {
                    info!("Dispatcher {} came back to life", target);
                    self.dead_nodes.write().unwrap().remove(&target);
                    self.add_neighbour(&target, false);

                    // Non-critical notification: failures are swallowed,
                    // not escalated to marking the informer dead.
                    for peer_url in self.neighbours() {
                        if peer_url == target {
                            continue;
                        }
                        let _ = self.peer(&peer_url).add_neighbour(&target, false);
                    }
                }
                Ok((_, Err(_))) => {}
                Err(err) => error!("Error by checking for comebacks: {:?}", err),
            }
        }
    }

    /// Client handle for `url`, created on first use and reused. Handles
    /// are never torn down; recreating the underlying connection is the
    /// client's business.
    fn peer(&self, url: &str) -> Arc<dyn PeerClient> {
        {
            let peers = self.peers.read().unwrap();
            if let Some(peer) = peers.get(url) {
                return Arc::clone(peer);
            }
        }
        let peer = self.connector.connect(url);
        let mut peers = self.peers.write().unwrap();
        Arc::clone(peers.entry(url.to_string()).or_insert(peer))
    }

    fn fingerprint(&self) -> String {
        self.neighbours().join(",")
    }

    fn mark_dead(&self, url: &str) {
        let mut neighbours = self.neighbours.write().unwrap();
        if neighbours.remove(url) {
            self.dead_nodes.write().unwrap().insert(url.to_string());
        }
    }
}

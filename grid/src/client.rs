use std::sync::Arc;

use inc::grid::info::NodeInfo;

use crate::error::PeerError;

/// Call stub for one remote dispatcher. Implementations own the wire
/// details; the node only sees success or [`PeerError`].
pub trait PeerClient: Send + Sync {
    fn neighbours(&self) -> Result<Vec<String>, PeerError>;

    fn add_neighbour(&self, url: &str, propagate: bool) -> Result<bool, PeerError>;

    fn alive(&self) -> Result<bool, PeerError>;

    fn info(&self) -> Result<NodeInfo, PeerError>;
}

/// Builds peer client handles on demand, one per peer URL.
pub trait Connector: Send + Sync {
    fn connect(&self, url: &str) -> Arc<dyn PeerClient>;
}

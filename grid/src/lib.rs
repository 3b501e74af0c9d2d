pub mod client;
pub mod error;
pub mod node;

pub use client::Connector;
pub use client::PeerClient;
pub use error::PeerError;
pub use node::GridNode;

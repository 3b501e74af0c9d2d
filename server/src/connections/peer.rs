use std::{net::TcpStream, sync::Arc, time::Duration};

use grid::{Connector, PeerClient, PeerError};
use inc::{
    grid::{info::NodeInfo, neighbour::AddNeighbour},
    read_grid_frame, write_grid_frame, Body, FrameType,
};

const REPLY_TIMEOUT: Duration = Duration::from_secs(3);

/// Outbound grid call stub for one remote dispatcher. The handle only
/// carries the address; a fresh connection is opened per call.
pub(crate) struct TcpPeer {
    address: String,
}

impl TcpPeer {
    fn call(&self, frame_type: FrameType, body: &Body) -> Result<Body, PeerError> {
        let mut stream = TcpStream::connect(&self.address)?;
        stream.set_read_timeout(Some(REPLY_TIMEOUT))?;
        write_grid_frame(&mut stream, frame_type, body)?;
        let (_, reply) = read_grid_frame(&mut stream)?;
        Ok(reply)
    }
}

impl PeerClient for TcpPeer {
    fn neighbours(&self) -> Result<Vec<String>, PeerError> {
        match self.call(FrameType::Neighbours, &Body::Neighbours)? {
            Body::NeighbourList(list) => Ok(list.urls),
            reply => Err(PeerError::unreachable(format!(
                "Invalid reply frame: {:?}",
                reply
            ))),
        }
    }

    fn add_neighbour(&self, url: &str, propagate: bool) -> Result<bool, PeerError> {
        let body = Body::AddNeighbour(AddNeighbour {
            url: url.to_string(),
            propagate,
        });
        match self.call(FrameType::AddNeighbour, &body)? {
            Body::Added(added) => Ok(added.added),
            reply => Err(PeerError::unreachable(format!(
                "Invalid reply frame: {:?}",
                reply
            ))),
        }
    }

    fn alive(&self) -> Result<bool, PeerError> {
        match self.call(FrameType::Alive, &Body::Alive)? {
            Body::Pong(pong) => Ok(pong.alive),
            reply => Err(PeerError::unreachable(format!(
                "Invalid reply frame: {:?}",
                reply
            ))),
        }
    }

    fn info(&self) -> Result<NodeInfo, PeerError> {
        match self.call(FrameType::Info, &Body::Info)? {
            Body::NodeInfo(info) => Ok(info),
            reply => Err(PeerError::unreachable(format!(
                "Invalid reply frame: {:?}",
                reply
            ))),
        }
    }
}

pub(crate) struct TcpConnector;

impl Connector for TcpConnector {
    fn connect(&self, url: &str) -> Arc<dyn PeerClient> {
        Arc::new(TcpPeer {
            address: url.to_string(),
        })
    }
}

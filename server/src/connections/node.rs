use std::{
    net::{TcpListener, TcpStream},
    sync::Arc,
    thread,
};

use grid::GridNode;
use inc::{
    grid::{
        liveness::Pong,
        neighbour::{Added, NeighbourList},
    },
    read_grid_frame, write_grid_frame, Body, FrameType,
};
use log::{error, info};

/// Accept loop for inbound grid calls, one thread per connection.
/// **Must** run on its own thread.
pub(crate) fn handle_grid_communication(socket: TcpListener, node: Arc<GridNode>) {
    info!("Handling grid communication");

    while let Ok(stream) = socket.accept() {
        let node_clone = Arc::clone(&node);
        thread::spawn(move || {
            if let Err(err) = handle_connection(stream.0, node_clone) {
                error!("Error while handling grid call: {}", err);
            }
        });
    }
}

fn handle_connection(mut stream: TcpStream, node: Arc<GridNode>) -> std::io::Result<()> {
    let frame = read_grid_frame(&mut stream)?;
    match frame {
        (FrameType::Neighbours, Body::Neighbours) => {
            let body = Body::NeighbourList(NeighbourList {
                urls: node.neighbours(),
            });
            write_grid_frame(&mut stream, FrameType::NeighbourList, &body)
        }
        (FrameType::AddNeighbour, Body::AddNeighbour(add)) => {
            let added = node.add_neighbour(&add.url, add.propagate);
            let body = Body::Added(Added { added });
            write_grid_frame(&mut stream, FrameType::Added, &body)
        }
        (FrameType::Alive, Body::Alive) => {
            // being able to answer at all is the whole point
            let body = Body::Pong(Pong { alive: true });
            write_grid_frame(&mut stream, FrameType::Pong, &body)
        }
        (FrameType::Info, Body::Info) => {
            let body = Body::NodeInfo(node.info().clone());
            write_grid_frame(&mut stream, FrameType::NodeInfo, &body)
        }
        _ => {
            error!("Invalid frame type");
            Ok(())
        }
    }
}

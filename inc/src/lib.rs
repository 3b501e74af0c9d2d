pub mod grid;

use std::io::{Read, Write};

use grid::info::NodeInfo;
use grid::liveness::Pong;
use grid::neighbour::{AddNeighbour, Added, NeighbourList};
use serde::{Deserialize, Serialize};
use shared::io_error;

#[derive(Debug)]
pub enum FrameType {
    Neighbours = 0x01,
    NeighbourList = 0x02,
    AddNeighbour = 0x03,
    Added = 0x04,
    Alive = 0x05,
    Pong = 0x06,
    Info = 0x07,
    NodeInfo = 0x08,
}

impl FrameType {
    fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let mut buffer = [0u8; 1];
        reader.read_exact(&mut buffer)?;
        match buffer[0] {
            0x01 => Ok(FrameType::Neighbours),
            0x02 => Ok(FrameType::NeighbourList),
            0x03 => Ok(FrameType::AddNeighbour),
            0x04 => Ok(FrameType::Added),
            0x05 => Ok(FrameType::Alive),
            0x06 => Ok(FrameType::Pong),
            0x07 => Ok(FrameType::Info),
            0x08 => Ok(FrameType::NodeInfo),
            _ => Err(io_error!("Invalid frame type")),
        }
    }

    fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        match self {
            FrameType::Neighbours => writer.write_all(&[0x01u8]),
            FrameType::NeighbourList => writer.write_all(&[0x02u8]),
            FrameType::AddNeighbour => writer.write_all(&[0x03u8]),
            FrameType::Added => writer.write_all(&[0x04u8]),
            FrameType::Alive => writer.write_all(&[0x05u8]),
            FrameType::Pong => writer.write_all(&[0x06u8]),
            FrameType::Info => writer.write_all(&[0x07u8]),
            FrameType::NodeInfo => writer.write_all(&[0x08u8]),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub enum Body {
    Neighbours,
    NeighbourList(NeighbourList),
    AddNeighbour(AddNeighbour),
    Added(Added),
    Alive,
    Pong(Pong),
    Info,
    NodeInfo(NodeInfo),
}

pub fn read_grid_frame<R: Read>(reader: &mut R) -> std::io::Result<(FrameType, Body)> {
    let frame_type = FrameType::read(reader)?;
    match frame_type {
        FrameType::Neighbours => Ok((FrameType::Neighbours, Body::Neighbours)),
        FrameType::NeighbourList => {
            let list = NeighbourList::read(reader)?;
            Ok((FrameType::NeighbourList, Body::NeighbourList(list)))
        }
        FrameType::AddNeighbour => {
            let add = AddNeighbour::read(reader)?;
            Ok((FrameType::AddNeighbour, Body::AddNeighbour(add)))
        }
        FrameType::Added => {
            let added = Added::read(reader)?;
            Ok((FrameType::Added, Body::Added(added)))
        }
        FrameType::Alive => Ok((FrameType::Alive, Body::Alive)),
        FrameType::Pong => {
            let pong = Pong::read(reader)?;
            Ok((FrameType::Pong, Body::Pong(pong)))
        }
        FrameType::Info => Ok((FrameType::Info, Body::Info)),
        FrameType::NodeInfo => {
            let info = NodeInfo::read(reader)?;
            Ok((FrameType::NodeInfo, Body::NodeInfo(info)))
        }
    }
}

pub fn write_grid_frame<W: Write>(
    writer: &mut W,
    frame_type: FrameType,
    body: &Body,
) -> std::io::Result<()> {
    frame_type.write(writer)?;
    match (frame_type, body) {
        (FrameType::Neighbours, Body::Neighbours) => {}
        (FrameType::NeighbourList, Body::NeighbourList(list)) => {
            list.write(writer)?;
        }
        (FrameType::AddNeighbour, Body::AddNeighbour(add)) => {
            add.write(writer)?;
        }
        (FrameType::Added, Body::Added(added)) => {
            added.write(writer)?;
        }
        (FrameType::Alive, Body::Alive) => {}
        (FrameType::Pong, Body::Pong(pong)) => {
            pong.write(writer)?;
        }
        (FrameType::Info, Body::Info) => {}
        (FrameType::NodeInfo, Body::NodeInfo(info)) => {
            info.write(writer)?;
        }
        _ => return Err(io_error!("Invalid frame type")),
    }
    writer.flush()
}

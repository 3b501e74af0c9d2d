use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use shared::map_io_error;

/// Identity record a dispatcher reports about itself: where it is
/// reachable, which bandwidth class it sits on and how expensive it is
/// to hand work to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct NodeInfo {
    pub url: String,
    pub pipe_id: String,
    pub weight: f64,
    pub nickname: String,
    pub cost: f64,
}

impl NodeInfo {
    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let info: NodeInfo = bincode::deserialize_from(reader)
            .map_err(map_io_error!("Cannot deserialize NodeInfo struct"))?;
        Ok(info)
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        bincode::serialize_into(writer, self)
            .map_err(map_io_error!("Cannot serialize NodeInfo struct"))
    }
}

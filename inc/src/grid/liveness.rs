use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use shared::map_io_error;

/// Reply to an `Alive` probe. A reachable dispatcher always answers
/// `true`; the dead signal is the absence of a reply.
#[derive(Debug, Serialize, Deserialize)]
pub struct Pong {
    pub alive: bool,
}

impl Pong {
    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let pong: Pong = bincode::deserialize_from(reader)
            .map_err(map_io_error!("Cannot deserialize Pong struct"))?;
        Ok(pong)
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        bincode::serialize_into(writer, self).map_err(map_io_error!("Cannot serialize Pong struct"))
    }
}

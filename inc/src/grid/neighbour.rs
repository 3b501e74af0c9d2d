use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use shared::map_io_error;

#[derive(Debug, Serialize, Deserialize)]
pub struct NeighbourList {
    pub urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddNeighbour {
    pub url: String,
    pub propagate: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Added {
    pub added: bool,
}

impl NeighbourList {
    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let list: NeighbourList = bincode::deserialize_from(reader)
            .map_err(map_io_error!("Cannot deserialize NeighbourList struct"))?;
        Ok(list)
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        bincode::serialize_into(writer, self)
            .map_err(map_io_error!("Cannot serialize NeighbourList struct"))
    }
}

impl AddNeighbour {
    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let add: AddNeighbour = bincode::deserialize_from(reader)
            .map_err(map_io_error!("Cannot deserialize AddNeighbour struct"))?;
        Ok(add)
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        bincode::serialize_into(writer, self)
            .map_err(map_io_error!("Cannot serialize AddNeighbour struct"))
    }
}

impl Added {
    pub(crate) fn read<R: Read>(reader: &mut R) -> std::io::Result<Self> {
        let added: Added = bincode::deserialize_from(reader)
            .map_err(map_io_error!("Cannot deserialize Added struct"))?;
        Ok(added)
    }

    pub(crate) fn write<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        bincode::serialize_into(writer, self)
            .map_err(map_io_error!("Cannot serialize Added struct"))
    }
}

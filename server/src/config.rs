use std::{fs::File, io::BufReader};

use serde::{Deserialize, Serialize};

/// Identity and cadence settings for this dispatcher, read from
/// `grid.json`. Every field is optional in the file; absent ones fall
/// back to the defaults below.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub(crate) struct GridConfig {
    pub(crate) pipe_id: String,
    pub(crate) weight: f64,
    pub(crate) nickname: String,
    pub(crate) cost: f64,
    pub(crate) ping_interval_secs: u64,
    pub(crate) ping_jitter_secs: u64,
}

impl Default for GridConfig {
    fn default() -> Self {
        GridConfig {
            pipe_id: String::new(),
            weight: 1.0,
            nickname: String::new(),
            cost: 0.0,
            ping_interval_secs: 60,
            ping_jitter_secs: 5,
        }
    }
}

pub(crate) fn load_grid_config(path: &str) -> std::io::Result<GridConfig> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let config: GridConfig = serde_json::from_reader(reader)?;
    Ok(config)
}

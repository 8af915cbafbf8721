//! Run-wide settings.
use std::io;
use serde_yaml;
use super::error::Result;
use super::linalg::Arith;

/// Settings that affect how diagrams are laid out.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conf {
    /// Restrict rank-6 diagrams to the triples window.
    pub restrict_triples: bool,
    /// Maximum number of spinors per spinor block (`0` = no tiling).
    pub tile_size: usize,
    pub arith: Arith,
}

/// `{ restrict_triples: false, tile_size: 0, arith: complex }`
impl Default for Conf {
    fn default() -> Self {
        Self {
            restrict_triples: false,
            tile_size: 0,
            arith: Arith::Complex,
        }
    }
}

impl Conf {
    pub fn from_yaml<R: io::Read>(r: R) -> Result<Self> {
        Ok(serde_yaml::from_reader(r)?)
    }
}

//! Spinor table, spinor blocks and the hole/particle/valence subsets that
//! diagram dimensions run over.
use std::fmt;
use super::error::{Error, Result};
use super::symmetry::PointGroup;

/// Quasiparticle type of a diagram dimension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QPart {
    Hole,
    Particle,
}

impl QPart {
    pub fn from_char(c: char) -> Result<Self> {
        match c {
            'h' => Ok(QPart::Hole),
            'p' => Ok(QPart::Particle),
            _ => Err(Error::InvalidSymbol(
                format!("'{}' is not a quasiparticle label (h/p)", c))),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            QPart::Hole => 'h',
            QPart::Particle => 'p',
        }
    }
}

/// What a single diagram dimension ranges over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DimLabel {
    pub qpart: QPart,
    pub valence: bool,
    pub t3: bool,
}

impl DimLabel {
    fn slot(self) -> usize {
        (self.qpart == QPart::Particle) as usize * 4
            + self.valence as usize * 2
            + self.t3 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpinorInfo {
    pub irrep: usize,
    #[serde(default)]
    pub eps: f64,
    pub occupied: bool,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub t3: bool,
}

impl SpinorInfo {
    fn matches(&self, label: DimLabel) -> bool {
        self.occupied == (label.qpart == QPart::Hole)
            && (!label.valence || self.active)
            && (!label.t3 || self.t3)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpinorBlock {
    pub irrep: usize,
    /// Global spinor indices, ascending.
    pub spinors: Vec<usize>,
}

/// Spinors of every spinor block that satisfy one `DimLabel`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
    /// Selected global spinor indices per spinor block.
    pub lists: Vec<Vec<usize>>,
    /// For every spinor, its position within its block's list.
    pub local: Vec<Option<usize>>,
}

impl Selection {
    #[inline]
    pub fn block_size(&self, block: usize) -> usize {
        self.lists[block].len()
    }
}

/// The spinor basis of a calculation, grouped into spinor blocks.
#[derive(Clone, Debug)]
pub struct SpinorSpace {
    group: PointGroup,
    spinors: Vec<SpinorInfo>,
    blocks: Vec<SpinorBlock>,
    block_of: Vec<usize>,
    selections: Vec<Selection>,
}

impl SpinorSpace {
    /// Group spinors by irrep and split each group into tiles of at most
    /// `tile_size` spinors (`0` means one block per irrep).
    pub fn new(
        group: PointGroup,
        spinors: Vec<SpinorInfo>,
        tile_size: usize,
    ) -> Result<Self> {
        for s in &spinors {
            group.check_irrep(s.irrep)?;
        }
        let mut blocks = Vec::new();
        let mut block_of = vec![0; spinors.len()];
        for irrep in 0 .. group.num_irreps() {
            let members: Vec<usize> = (0 .. spinors.len())
                .filter(|&i| spinors[i].irrep == irrep)
                .collect();
            let tile = if tile_size == 0 {
                members.len().max(1)
            } else {
                tile_size
            };
            for chunk in members.chunks(tile) {
                for &i in chunk {
                    block_of[i] = blocks.len();
                }
                blocks.push(SpinorBlock { irrep, spinors: chunk.to_vec() });
            }
        }
        let mut space = Self {
            group,
            spinors,
            blocks,
            block_of,
            selections: Vec::new(),
        };
        space.selections = (0 .. 8)
            .map(|slot| space.make_selection(DimLabel {
                qpart: if slot & 4 == 0 { QPart::Hole } else { QPart::Particle },
                valence: slot & 2 != 0,
                t3: slot & 1 != 0,
            }))
            .collect();
        Ok(space)
    }

    fn make_selection(&self, label: DimLabel) -> Selection {
        let mut local = vec![None; self.spinors.len()];
        let lists = self.blocks.iter().map(|block| {
            let list: Vec<usize> = block.spinors.iter().cloned()
                .filter(|&i| self.spinors[i].matches(label))
                .collect();
            for (k, &i) in list.iter().enumerate() {
                local[i] = Some(k);
            }
            list
        }).collect();
        Selection { lists, local }
    }

    #[inline]
    pub fn group(&self) -> &PointGroup {
        &self.group
    }

    #[inline]
    pub fn num_spinors(&self) -> usize {
        self.spinors.len()
    }

    #[inline]
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    pub fn blocks(&self) -> &[SpinorBlock] {
        &self.blocks
    }

    #[inline]
    pub fn block_of(&self, spinor: usize) -> usize {
        self.block_of[spinor]
    }

    /// Spinors of every block admitted by the given dimension label.
    pub fn select(&self, label: DimLabel) -> &Selection {
        &self.selections[label.slot()]
    }
}

impl fmt::Display for SpinorSpace {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "spinor_blocks:")?;
        for (i, block) in self.blocks.iter().enumerate() {
            writeln!(f, "- {{block: {}, irrep: {}, size: {}, spinors: {:?}}}",
                     i, self.group.irrep_name(block.irrep),
                     block.spinors.len(), block.spinors)?;
        }
        Ok(())
    }
}

//! Named, symmetry-blocked many-body tensors.
//!
//! A diagram of rank `n` has `n` dimensions, each running over the hole or
//! particle spinors (optionally restricted to the active or triples
//! subsets).  Its elements are stored in dense `SymBlock`s, one per
//! combination of spinor blocks that is allowed by symmetry and not empty.
//! Every other element is zero.
use std::fmt;
use std::sync::Arc;
use fnv::FnvHashMap;
use super::block::SymBlock;
use super::error::{Error, Result, shape_mismatch};
use super::linalg::{self, Scalar};
use super::parity::{self, Parity};
use super::spinors::{DimLabel, QPart, SpinorSpace};
use super::utils;

/// Highest supported rank.
pub const MAX_RANK: usize = 8;

pub fn parse_qparts(s: &str) -> Result<Vec<QPart>> {
    s.chars().map(QPart::from_char).collect()
}

/// Parse a string of `'0'`/`'1'` flags.
pub fn parse_flags(s: &str, what: &str) -> Result<Vec<bool>> {
    s.chars().map(|c| match c {
        '0' => Ok(false),
        '1' => Ok(true),
        _ => Err(Error::InvalidSymbol(
            format!("'{}' in {} string {:?} (expected 0 or 1)", c, what, s))),
    }).collect()
}

pub fn flags_to_string(flags: &[bool]) -> String {
    flags.iter().map(|&f| if f { '1' } else { '0' }).collect()
}

/// Parse a dimension order such as `"3412"` into zero-based positions.
/// The digits must be a permutation of `1 ..= rank`.
pub fn parse_order(s: &str, rank: usize) -> Result<Vec<usize>> {
    let order = s.chars().map(|c| match c.to_digit(10) {
        Some(d) if d >= 1 => Ok(d as usize - 1),
        _ => Err(Error::InvalidSymbol(
            format!("'{}' in order string {:?}", c, s))),
    }).collect::<Result<Vec<_>>>()?;
    if order.len() != rank {
        return Err(shape_mismatch(format!(
            "order {:?} has {} dimensions, expected {}", s, order.len(), rank)));
    }
    let mut seen = vec![false; rank];
    for &i in &order {
        if i >= rank || seen[i] {
            return Err(Error::InvalidSymbol(format!(
                "order {:?} is not a permutation of 1..{}", s, rank)));
        }
        seen[i] = true;
    }
    Ok(order)
}

pub fn order_to_string(order: &[usize]) -> String {
    order.iter().map(|&i| (i + 1).to_string()).collect()
}

/// Restricted-triples mask: all set for rank-6 diagrams when triples are
/// restricted, all clear otherwise.
pub fn t3_mask(rank: usize, restrict_triples: bool) -> Vec<bool> {
    vec![rank == 6 && restrict_triples; rank]
}

/// Number of distinct arrangements of the values in `xs`.
fn multinomial(xs: &[usize]) -> usize {
    let mut counts: FnvHashMap<usize, usize> = Default::default();
    for &x in xs {
        *counts.entry(x).or_insert(0) += 1;
    }
    counts.values().fold(utils::factorial(xs.len()), |acc, &c| {
        acc / utils::factorial(c)
    })
}

#[derive(Clone, Debug)]
pub struct Diagram<T> {
    name: String,
    qparts: Vec<QPart>,
    valence: Vec<bool>,
    t3space: Vec<bool>,
    /// Storage dimension `d` holds normal-order dimension `order[d]`.
    order: Vec<usize>,
    only_unique: bool,
    irrep: usize,
    space: Arc<SpinorSpace>,
    blocks: Vec<SymBlock<T>>,
    inv_index: FnvHashMap<Vec<usize>, usize>,
}

impl<T: Scalar> Diagram<T> {
    /// Build a zero-filled diagram.
    ///
    /// `qparts`, `valence` and `t3space` describe the storage dimensions;
    /// `order` maps them onto normal order (bra first, ket second), which
    /// is where the symmetry and permutation rules apply.  Names starting
    /// with `'$'` are always stored permutationally unique.
    pub fn new(
        space: Arc<SpinorSpace>,
        name: &str,
        qparts: &str,
        valence: &str,
        t3space: &[bool],
        order: &str,
        perm_unique: bool,
        irrep: usize,
    ) -> Result<Self> {
        let qparts = parse_qparts(qparts)?;
        let rank = qparts.len();
        if rank < 2 || rank > MAX_RANK || rank % 2 != 0 {
            return Err(shape_mismatch(format!(
                "rank {} of '{}' is not an even number in 2..={}",
                rank, name, MAX_RANK)));
        }
        let valence = parse_flags(valence, "valence")?;
        if valence.len() != rank || t3space.len() != rank {
            return Err(shape_mismatch(format!(
                "'{}': qparts, valence and t3 masks have lengths {}, {}, {}",
                name, rank, valence.len(), t3space.len())));
        }
        let order = parse_order(order, rank)?;
        space.group().check_irrep(irrep)?;

        let mut diagram = Self {
            name: name.to_owned(),
            qparts,
            valence,
            t3space: t3space.to_vec(),
            order,
            only_unique: perm_unique || name.starts_with('$'),
            irrep,
            space,
            blocks: Vec::new(),
            inv_index: Default::default(),
        };
        diagram.build_blocks();
        Ok(diagram)
    }

    fn build_blocks(&mut self) {
        let rank = self.rank();
        let nb = self.space.num_blocks();
        if nb == 0 {
            return;
        }
        let mut tuple = vec![0; rank];
        loop {
            if let Some(block) = self.make_block(&tuple) {
                self.inv_index.insert(tuple.clone(), self.blocks.len());
                self.blocks.push(block);
            }
            // advance the last dimension fastest
            let mut d = rank;
            loop {
                if d == 0 {
                    self.link_redirects();
                    return;
                }
                d -= 1;
                tuple[d] += 1;
                if tuple[d] < nb {
                    break;
                }
                tuple[d] = 0;
            }
        }
    }

    fn link_redirects(&mut self) {
        for i in 0 .. self.blocks.len() {
            if self.blocks[i].is_unique {
                self.blocks[i].unique_block = i;
                continue;
            }
            let canonical: Vec<usize> = {
                let b = &self.blocks[i];
                b.perm_to_unique.iter().map(|&p| b.spinor_blocks[p]).collect()
            };
            // the canonical tuple has the same irreps and extents, so it
            // always exists
            self.blocks[i].unique_block = self.inv_index[&canonical];
        }
    }

    fn make_block(&self, tuple: &[usize]) -> Option<SymBlock<T>> {
        let rank = self.rank();
        let shape: Vec<usize> = (0 .. rank)
            .map(|d| self.space.select(self.label(d)).block_size(tuple[d]))
            .collect();
        if shape.iter().any(|&n| n == 0) {
            return None;
        }
        let rev = parity::invert_perm(&self.order);
        let norm: Vec<usize> = (0 .. rank).map(|i| tuple[rev[i]]).collect();
        let irreps: Vec<usize> = norm.iter()
            .map(|&b| self.space.blocks()[b].irrep)
            .collect();
        if !self.space.group().dpd_allowed(&irreps, self.irrep) {
            return None;
        }
        if !self.only_unique || rank < 4 {
            return Some(SymBlock::new(tuple.to_vec(), shape, 1));
        }

        let half = rank / 2;
        let mut perm: Vec<usize> = (0 .. rank).collect();
        let mut sign = Parity::Even;
        let mut n_equal_perms = 1;
        for &start in &[0, half] {
            let range = start .. start + half;
            let first = (self.qparts[rev[start]], self.valence[rev[start]]);
            let permutable = range.clone().all(|i| {
                (self.qparts[rev[i]], self.valence[rev[i]]) == first
            });
            if !permutable {
                continue;
            }
            let (p, sub) = parity::sort_perm(&norm[range.clone()]);
            for (k, &s) in sub.iter().enumerate() {
                perm[start + k] = start + s;
            }
            sign = sign + p;
            n_equal_perms *= multinomial(&norm[range]);
        }
        if parity::is_identity(&perm) {
            return Some(SymBlock::new(tuple.to_vec(), shape, n_equal_perms));
        }
        let perm_to_unique = (0 .. rank)
            .map(|d| rev[perm[self.order[d]]])
            .collect();
        Some(SymBlock::new_redirect(
            tuple.to_vec(), shape, sign, perm_to_unique, n_equal_perms))
    }

    /// Label of storage dimension `d`.
    #[inline]
    pub fn label(&self, d: usize) -> DimLabel {
        DimLabel {
            qpart: self.qparts[d],
            valence: self.valence[d],
            t3: self.t3space[d],
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_owned();
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.qparts.len()
    }

    pub fn qparts(&self) -> &[QPart] {
        &self.qparts
    }

    pub fn qparts_string(&self) -> String {
        self.qparts.iter().map(|q| q.to_char()).collect()
    }

    pub fn valence(&self) -> &[bool] {
        &self.valence
    }

    pub fn valence_string(&self) -> String {
        flags_to_string(&self.valence)
    }

    pub fn t3space(&self) -> &[bool] {
        &self.t3space
    }

    pub fn t3space_string(&self) -> String {
        flags_to_string(&self.t3space)
    }

    /// Zero-based dimension order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn order_string(&self) -> String {
        order_to_string(&self.order)
    }

    #[inline]
    pub fn only_unique(&self) -> bool {
        self.only_unique
    }

    #[inline]
    pub fn irrep(&self) -> usize {
        self.irrep
    }

    pub fn space(&self) -> &Arc<SpinorSpace> {
        &self.space
    }

    pub fn blocks(&self) -> &[SymBlock<T>] {
        &self.blocks
    }

    pub fn blocks_mut(&mut self) -> &mut [SymBlock<T>] {
        &mut self.blocks
    }

    /// Position of the block with the given spinor-block tuple.
    pub fn find_block(&self, spinor_blocks: &[usize]) -> Option<usize> {
        self.inv_index.get(spinor_blocks).cloned()
    }

    pub fn num_unique_blocks(&self) -> usize {
        self.blocks.iter().filter(|b| b.is_unique).count()
    }

    pub fn memory_used(&self) -> usize {
        self.blocks.iter().map(|b| b.memory_used()).sum()
    }

    /// Same blocks with the same extents and uniqueness.
    pub fn same_structure(&self, other: &Self) -> bool {
        self.qparts == other.qparts
            && self.valence == other.valence
            && self.t3space == other.t3space
            && self.order == other.order
            && self.blocks.len() == other.blocks.len()
            && self.blocks.iter().zip(&other.blocks).all(|(a, b)| {
                a.spinor_blocks == b.spinor_blocks
                    && a.shape == b.shape
                    && a.is_unique == b.is_unique
            })
    }

    /// Block and local multi-index of an element given by spinor indices.
    /// `Ok(None)` if the element lies outside every stored block.
    fn locate(&self, spinors: &[usize]) -> Result<Option<(usize, Vec<usize>)>> {
        if spinors.len() != self.rank() {
            return Err(shape_mismatch(format!(
                "'{}' has rank {}, got {} indices",
                self.name, self.rank(), spinors.len())));
        }
        let mut tuple = Vec::with_capacity(self.rank());
        let mut local = Vec::with_capacity(self.rank());
        for (d, &i) in spinors.iter().enumerate() {
            if i >= self.space.num_spinors() {
                return Err(shape_mismatch(format!(
                    "spinor index {} out of range ({} spinors)",
                    i, self.space.num_spinors())));
            }
            match self.space.select(self.label(d)).local[i] {
                None => return Ok(None),
                Some(k) => {
                    tuple.push(self.space.block_of(i));
                    local.push(k);
                }
            }
        }
        Ok(self.find_block(&tuple).map(|b| (b, local)))
    }

    /// Element at the given spinor indices (storage order).
    pub fn get(&self, spinors: &[usize]) -> Result<T> {
        let (b, local) = match self.locate(spinors)? {
            None => return Ok(T::zero()),
            Some(x) => x,
        };
        let block = &self.blocks[b];
        if block.is_unique {
            return Ok(block.buf[block.linear_index(&local)]);
        }
        let canonical = &self.blocks[block.unique_block];
        let x = canonical.buf[canonical.linear_index(
            &block.to_unique_index(&local))];
        Ok(match block.sign {
            Parity::Even => x,
            Parity::Odd => -x,
        })
    }

    /// Store an element.  Elements of non-unique blocks are written to the
    /// canonical block with the permutation sign applied.
    pub fn set(&mut self, spinors: &[usize], value: T) -> Result<()> {
        let (b, local) = self.locate(spinors)?.ok_or_else(|| shape_mismatch(
            format!("element {:?} is outside the blocks of '{}'",
                    spinors, self.name)))?;
        let (target, local, value) = {
            let block = &self.blocks[b];
            if block.is_unique {
                (b, local, value)
            } else {
                let value = match block.sign {
                    Parity::Even => value,
                    Parity::Odd => -value,
                };
                (block.unique_block, block.to_unique_index(&local), value)
            }
        };
        let block = &mut self.blocks[target];
        let i = block.linear_index(&local);
        block.buf[i] = value;
        Ok(())
    }

    /// Spinor indices of element `linear` of block `b`.
    pub fn spinor_indices(&self, b: usize, linear: usize) -> Vec<usize> {
        let block = &self.blocks[b];
        block.compound_index(linear).iter().enumerate().map(|(d, &k)| {
            self.space.select(self.label(d)).lists[block.spinor_blocks[d]][k]
        }).collect()
    }

    pub fn clear(&mut self) {
        for block in &mut self.blocks {
            block.clear();
        }
    }

    pub fn scale(&mut self, alpha: T) {
        for block in &mut self.blocks {
            linalg::scal(&mut block.buf, alpha);
        }
    }

    /// Largest modulus over the unique blocks and the spinor indices where
    /// it occurs.  An earlier block wins ties.
    pub fn max(&self) -> (f64, Vec<usize>) {
        let mut best: Option<(f64, usize, usize)> = None;
        for (b, block) in self.blocks.iter().enumerate() {
            if !block.is_unique {
                continue;
            }
            let (i, v) = linalg::iamax(&block.buf);
            match best {
                Some((max, _, _)) if !(v > max) => {}
                _ => best = Some((v, b, i)),
            }
        }
        match best {
            None => (0.0, Vec::new()),
            Some((v, b, i)) => (v, self.spinor_indices(b, i)),
        }
    }

    /// Largest `|self - other|` over the unique blocks.
    pub fn diffmax(&self, other: &Self) -> Result<(f64, Vec<usize>)> {
        if !self.same_structure(other) {
            return Err(shape_mismatch(format!(
                "'{}' and '{}' have different block structures",
                self.name, other.name)));
        }
        let mut best: Option<(f64, usize, usize)> = None;
        for (b, (x, y)) in self.blocks.iter().zip(&other.blocks).enumerate() {
            if !x.is_unique {
                continue;
            }
            let (i, v) = linalg::iadiffmax(&x.buf, &y.buf)?;
            match best {
                Some((max, _, _)) if !(v > max) => {}
                _ => best = Some((v, b, i)),
            }
        }
        Ok(match best {
            None => (0.0, Vec::new()),
            Some((v, b, i)) => (v, self.spinor_indices(b, i)),
        })
    }

    /// Short YAML-style description.
    pub fn summary(&self) -> String {
        format!("{{name: {:?}, rank: {}, qparts: {}, valence: {}, t3: {}, \
                 order: {}, unique: {}, irrep: {}, blocks: {}, bytes: {}}}",
                self.name, self.rank(), self.qparts_string(),
                self.valence_string(), self.t3space_string(),
                self.order_string(), self.only_unique as u8,
                self.space.group().irrep_name(self.irrep),
                self.blocks.len(), self.memory_used())
    }
}

impl<T: Scalar> fmt::Display for Diagram<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for block in &self.blocks {
            write!(f, "  - {{spinor_blocks: {:?}, shape: {:?}",
                   block.spinor_blocks, block.shape)?;
            if block.is_unique {
                writeln!(f, ", perms: {}}}", block.n_equal_perms)?;
            } else {
                writeln!(f, ", unique: {}, sign: {}}}",
                         block.unique_block, block.sign.sign_i32())?;
            }
        }
        Ok(())
    }
}

//! Symmetry blocks: the dense pieces a diagram is made of.
use std::mem;
use super::linalg::{self, Scalar};
use super::parity::Parity;
use super::utils;

/// One combination of spinor blocks of a diagram.
///
/// A unique block owns a row-major buffer of `shape`.  A non-unique block
/// owns nothing; its elements are `sign` times the elements of the block
/// `unique_block` with the indices permuted by `perm_to_unique`.
#[derive(Clone, Debug, PartialEq)]
pub struct SymBlock<T> {
    /// Spinor block of each dimension, in storage order.
    pub spinor_blocks: Vec<usize>,
    pub shape: Vec<usize>,
    pub strides: Vec<usize>,
    pub buf: Vec<T>,
    pub is_unique: bool,
    pub sign: Parity,
    /// Number of spinor-block permutations that map onto the same unique
    /// block (including the unique block itself).
    pub n_equal_perms: usize,
    /// `canonical[d] = this[perm_to_unique[d]]`
    pub perm_to_unique: Vec<usize>,
    /// Position of the canonical block in the diagram.
    pub unique_block: usize,
}

impl<T: Scalar> SymBlock<T> {
    /// Zero-filled unique block.
    pub fn new(spinor_blocks: Vec<usize>, shape: Vec<usize>,
               n_equal_perms: usize) -> Self {
        let size = shape.iter().product();
        let rank = shape.len();
        Self {
            spinor_blocks,
            strides: utils::strides(&shape),
            shape,
            buf: linalg::zeros(size, 1),
            is_unique: true,
            sign: Parity::Even,
            n_equal_perms,
            perm_to_unique: (0 .. rank).collect(),
            unique_block: 0,
        }
    }

    /// Block that redirects to a canonical block.  `unique_block` is
    /// filled in once the canonical block has a position.
    pub fn new_redirect(
        spinor_blocks: Vec<usize>,
        shape: Vec<usize>,
        sign: Parity,
        perm_to_unique: Vec<usize>,
        n_equal_perms: usize,
    ) -> Self {
        Self {
            spinor_blocks,
            strides: utils::strides(&shape),
            shape,
            buf: Vec::new(),
            is_unique: false,
            sign,
            n_equal_perms,
            perm_to_unique,
            unique_block: 0,
        }
    }

    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Number of elements the block spans (not necessarily stored).
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn memory_used(&self) -> usize {
        self.buf.len() * mem::size_of::<T>()
    }

    /// Row-major offset of a multi-index local to the block.
    #[inline]
    pub fn linear_index(&self, local: &[usize]) -> usize {
        debug_assert_eq!(local.len(), self.rank());
        local.iter().zip(&self.strides).map(|(i, s)| i * s).sum()
    }

    /// Inverse of `linear_index`.
    pub fn compound_index(&self, mut linear: usize) -> Vec<usize> {
        self.strides.iter().map(|&s| {
            let i = linear / s;
            linear %= s;
            i
        }).collect()
    }

    /// Local multi-index of the corresponding element in the canonical
    /// block.
    pub fn to_unique_index(&self, local: &[usize]) -> Vec<usize> {
        self.perm_to_unique.iter().map(|&p| local[p]).collect()
    }

    pub fn clear(&mut self) {
        for x in &mut self.buf {
            *x = T::zero();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexing() {
        let b = SymBlock::<f64>::new(vec![0, 1, 0], vec![2, 3, 4], 1);
        assert_eq!(b.buf.len(), 24);
        assert_eq!(b.linear_index(&[1, 2, 3]), 23);
        assert_eq!(b.compound_index(23), vec![1, 2, 3]);
        assert_eq!(b.compound_index(b.linear_index(&[0, 1, 2])), vec![0, 1, 2]);
        assert_eq!(b.memory_used(), 24 * 8);
    }

    #[test]
    fn test_redirect() {
        let b = SymBlock::<f64>::new_redirect(
            vec![1, 0], vec![2, 3], Parity::Odd, vec![1, 0], 2);
        assert!(b.buf.is_empty());
        assert_eq!(b.size(), 6);
        assert_eq!(b.to_unique_index(&[1, 2]), vec![2, 1]);
    }

    #[test]
    fn test_clear() {
        let mut b = SymBlock::<f64>::new(vec![0, 0], vec![2, 2], 1);
        b.buf[3] = 4.0;
        b.clear();
        assert!(b.buf.iter().all(|&x| x == 0.0));
    }
}

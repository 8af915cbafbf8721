//! Parity data type and permutation helpers.
use num::{One, Zero};
use std::ops::{Add, Rem};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parity {
    Even,
    Odd,
}

impl Parity {
    #[inline]
    pub fn of<T: Rem<Output = T> + Zero + One>(i: T) -> Self {
        if (i % (T::one() + T::one())).is_zero() {
            Parity::Even
        } else {
            Parity::Odd
        }
    }

    #[inline]
    pub fn sign_i32(self) -> i32 {
        match self {
            Parity::Even => 1,
            Parity::Odd => -1,
        }
    }
}

impl From<Parity> for i64 {
    #[inline]
    fn from(p: Parity) -> Self {
        match p {
            Parity::Even => 0,
            Parity::Odd => 1,
        }
    }
}

impl Add for Parity {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self::Output {
        let p1: i64 = self.into();
        let p2: i64 = other.into();
        Parity::of(p1 ^ p2)
    }
}

impl Zero for Parity {
    #[inline]
    fn zero() -> Self {
        Parity::Even
    }
    #[inline]
    fn is_zero(&self) -> bool {
        self == &Self::zero()
    }
}

/// Parity of a permutation of `0 .. perm.len()`, counted from its cycles.
pub fn perm_parity(perm: &[usize]) -> Parity {
    let mut seen = vec![false; perm.len()];
    let mut transpositions = 0;
    for start in 0 .. perm.len() {
        if seen[start] {
            continue;
        }
        let mut i = start;
        let mut len = 0;
        while !seen[i] {
            seen[i] = true;
            i = perm[i];
            len += 1;
        }
        transpositions += len - 1;
    }
    Parity::of(transpositions)
}

/// Stable sort of `xs`.  Returns the permutation `p` such that
/// `xs[p[0]] <= xs[p[1]] <= …`, together with its parity.
pub fn sort_perm<T: Ord>(xs: &[T]) -> (Parity, Vec<usize>) {
    let mut perm: Vec<usize> = (0 .. xs.len()).collect();
    perm.sort_by(|&i, &j| xs[i].cmp(&xs[j]));
    (perm_parity(&perm), perm)
}

pub fn is_identity(perm: &[usize]) -> bool {
    perm.iter().enumerate().all(|(i, &p)| i == p)
}

/// Inverse of a permutation of `0 .. perm.len()`.
pub fn invert_perm(perm: &[usize]) -> Vec<usize> {
    let mut inv = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inv[p] = i;
    }
    inv
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        assert_eq!(Parity::Even + Parity::Even, Parity::Even);
        assert_eq!(Parity::Even + Parity::Odd, Parity::Odd);
        assert_eq!(Parity::Odd + Parity::Odd, Parity::Even);
        assert_eq!(Parity::Odd + Parity::Even, Parity::Odd);
    }

    #[test]
    fn test_sort_perm() {
        assert_eq!(sort_perm(&[1, 2, 3]), (Parity::Even, vec![0, 1, 2]));
        assert_eq!(sort_perm(&[2, 1, 3]), (Parity::Odd, vec![1, 0, 2]));
        assert_eq!(sort_perm(&[2, 3, 1]), (Parity::Even, vec![2, 0, 1]));
        assert_eq!(sort_perm(&[3, 2, 1]), (Parity::Odd, vec![2, 1, 0]));
        // stable: equal keys keep their order
        assert_eq!(sort_perm(&[5, 5]), (Parity::Even, vec![0, 1]));
    }

    #[test]
    fn test_invert_perm() {
        let p = vec![2, 0, 3, 1];
        let q = invert_perm(&p);
        for i in 0 .. 4 {
            assert_eq!(q[p[i]], i);
        }
        assert!(is_identity(&invert_perm(&[0, 1, 2])));
        assert_eq!(perm_parity(&p), perm_parity(&q));
    }
}

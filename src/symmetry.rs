//! Abelian point groups and direct-product bookkeeping.
use std::fmt;
use super::error::{Error, Result, shape_mismatch};

/// An abelian point group described by its multiplication table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointGroup {
    names: Vec<String>,
    /// `table[a * n + b]` is the irrep of `a ⊗ b`.
    table: Vec<usize>,
    totally_symmetric: usize,
}

impl PointGroup {
    /// The trivial group.
    pub fn c1() -> Self {
        Self::cyclic(1)
    }

    /// Cyclic group of order `n` with `a ⊗ b = (a + b) mod n`.  Irreps are
    /// named `"0" .. "n-1"`.
    pub fn cyclic(n: usize) -> Self {
        let n = n.max(1);
        let mut table = Vec::with_capacity(n * n);
        for a in 0 .. n {
            for b in 0 .. n {
                table.push((a + b) % n);
            }
        }
        Self {
            names: (0 .. n).map(|i| i.to_string()).collect(),
            table,
            totally_symmetric: 0,
        }
    }

    /// Build from explicit irrep names and a row-major multiplication table.
    /// The table must be closed, commutative and have an identity row.
    pub fn from_table(names: Vec<String>, table: Vec<usize>) -> Result<Self> {
        let n = names.len();
        if n == 0 || table.len() != n * n {
            return Err(shape_mismatch(format!(
                "multiplication table of {} irreps needs {} entries, got {}",
                n, n * n, table.len())));
        }
        if let Some(&bad) = table.iter().find(|&&g| g >= n) {
            return Err(Error::InvalidIrrep(bad, n));
        }
        for a in 0 .. n {
            for b in 0 .. n {
                if table[a * n + b] != table[b * n + a] {
                    return Err(shape_mismatch(format!(
                        "multiplication table is not abelian at ({}, {})",
                        a, b)));
                }
            }
        }
        let totally_symmetric = (0 .. n)
            .find(|&e| (0 .. n).all(|b| table[e * n + b] == b))
            .ok_or_else(|| shape_mismatch(
                "multiplication table has no identity element"))?;
        Ok(Self { names, table, totally_symmetric })
    }

    #[inline]
    pub fn num_irreps(&self) -> usize {
        self.names.len()
    }

    #[inline]
    pub fn totally_symmetric_irrep(&self) -> usize {
        self.totally_symmetric
    }

    #[inline]
    pub fn product(&self, a: usize, b: usize) -> usize {
        self.table[a * self.num_irreps() + b]
    }

    /// Direct product of all irreps in the list.
    pub fn product_all<I: IntoIterator<Item = usize>>(&self, irreps: I) -> usize {
        irreps.into_iter()
            .fold(self.totally_symmetric, |acc, g| self.product(acc, g))
    }

    pub fn irrep_name(&self, irrep: usize) -> &str {
        &self.names[irrep]
    }

    pub fn check_irrep(&self, irrep: usize) -> Result<()> {
        if irrep < self.num_irreps() {
            Ok(())
        } else {
            Err(Error::InvalidIrrep(irrep, self.num_irreps()))
        }
    }

    /// Whether `Γ(bra) = Γ(op) ⊗ Γ(ket)`, where the first half of `irreps`
    /// is the bra and the second half the ket.
    pub fn dpd_allowed(&self, irreps: &[usize], op_irrep: usize) -> bool {
        let half = irreps.len() / 2;
        let bra = self.product_all(irreps[.. half].iter().cloned());
        let ket = self.product_all(irreps[half ..].iter().cloned());
        bra == self.product(op_irrep, ket)
    }
}

impl fmt::Display for PointGroup {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let n = self.num_irreps();
        write!(f, "{:>8}", "")?;
        for name in &self.names {
            write!(f, "{:>8}", name)?;
        }
        writeln!(f)?;
        for a in 0 .. n {
            write!(f, "{:>8}", self.names[a])?;
            for b in 0 .. n {
                write!(f, "{:>8}", self.names[self.product(a, b)])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

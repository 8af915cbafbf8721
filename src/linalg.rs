//! Element-wise kernels over real and complex buffers.
use std::fmt;
use std::fmt::Debug;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};
use num::{One, Zero};
use num::complex::Complex64;
use super::error::{Error, Result, shape_mismatch};

/// Runtime arithmetic tag.  Only used where data leaves the type system,
/// i.e. in file headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arith {
    Real,
    Complex,
}

impl Default for Arith {
    fn default() -> Self {
        Arith::Complex
    }
}

impl Arith {
    pub fn tag(self) -> &'static str {
        match self {
            Arith::Real => "real",
            Arith::Complex => "complex",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag {
            "real" => Ok(Arith::Real),
            "complex" => Ok(Arith::Complex),
            _ => Err(Error::UnsupportedKind(tag.to_owned())),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Arith::Real => 0,
            Arith::Complex => 1,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Arith::Real),
            1 => Ok(Arith::Complex),
            _ => Err(Error::UnsupportedKind(format!("code {}", code))),
        }
    }
}

impl fmt::Display for Arith {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Element type of diagram storage: either `f64` or `Complex64`.
pub trait Scalar:
    Copy + Debug + PartialEq + Send + Sync + 'static
    + Zero + One
    + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
    + Neg<Output = Self> + AddAssign + MulAssign
{
    const ARITH: Arith;

    /// Modulus.
    fn abs(self) -> f64;

    fn conj(self) -> Self;

    fn re(self) -> f64;

    fn im(self) -> f64;

    /// Build from real and imaginary parts.  Real scalars drop `im`.
    fn from_re_im(re: f64, im: f64) -> Self;
}

impl Scalar for f64 {
    const ARITH: Arith = Arith::Real;

    #[inline]
    fn abs(self) -> f64 {
        f64::abs(self)
    }

    #[inline]
    fn conj(self) -> Self {
        self
    }

    #[inline]
    fn re(self) -> f64 {
        self
    }

    #[inline]
    fn im(self) -> f64 {
        0.0
    }

    #[inline]
    fn from_re_im(re: f64, _: f64) -> Self {
        re
    }
}

impl Scalar for Complex64 {
    const ARITH: Arith = Arith::Complex;

    #[inline]
    fn abs(self) -> f64 {
        self.norm()
    }

    #[inline]
    fn conj(self) -> Self {
        Complex64::conj(&self)
    }

    #[inline]
    fn re(self) -> f64 {
        self.re
    }

    #[inline]
    fn im(self) -> f64 {
        self.im
    }

    #[inline]
    fn from_re_im(re: f64, im: f64) -> Self {
        Complex64::new(re, im)
    }
}

/// Index and modulus of the element with the largest modulus.
///
/// The running maximum starts at zero and is only replaced on a strictly
/// larger value, so the first occurrence wins and an all-zero (or empty)
/// buffer yields `(0, 0.0)`.
pub fn iamax<T: Scalar>(a: &[T]) -> (usize, f64) {
    let mut max_idx = 0;
    let mut max_val = 0.0;
    for (i, &x) in a.iter().enumerate() {
        let v = x.abs();
        if v > max_val {
            max_val = v;
            max_idx = i;
        }
    }
    (max_idx, max_val)
}

/// Like `iamax`, but over `|a[i] - b[i]|`.
pub fn iadiffmax<T: Scalar>(a: &[T], b: &[T]) -> Result<(usize, f64)> {
    if a.len() != b.len() {
        return Err(shape_mismatch(format!(
            "iadiffmax: lengths {} and {} differ", a.len(), b.len())));
    }
    let mut max_idx = 0;
    let mut max_val = 0.0;
    for (i, (&x, &y)) in a.iter().zip(b).enumerate() {
        let v = (x - y).abs();
        if v > max_val {
            max_val = v;
            max_idx = i;
        }
    }
    Ok((max_idx, max_val))
}

/// Multiply every element by `alpha`.
pub fn scal<T: Scalar>(a: &mut [T], alpha: T) {
    for x in a {
        *x *= alpha;
    }
}

/// `∑[i] x[i]^cx y[i]^cy` where `^c` is complex conjugation if requested.
pub fn dot<T: Scalar>(
    conj_x: bool,
    conj_y: bool,
    x: &[T],
    y: &[T],
) -> Result<T> {
    if x.len() != y.len() {
        return Err(shape_mismatch(format!(
            "dot: lengths {} and {} differ", x.len(), y.len())));
    }
    let mut sum = T::zero();
    for (&a, &b) in x.iter().zip(y) {
        let a = if conj_x { a.conj() } else { a };
        let b = if conj_y { b.conj() } else { b };
        sum += a * b;
    }
    Ok(sum)
}

/// Zero-filled `n × m` buffer.
pub fn zeros<T: Scalar>(n: usize, m: usize) -> Vec<T> {
    vec![T::zero(); n * m]
}

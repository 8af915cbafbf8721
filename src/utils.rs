use conv::ValueInto;

/// Shorthand for casting numbers.  Panics if out of range.
pub fn cast<T: ValueInto<U>, U>(x: T) -> U {
    x.value_into().expect("integer conversion failure")
}

/// Tolerance used when comparing floating-point results.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Toler {
    pub relerr: f64,
    pub abserr: f64,
}

/// `{ relerr: 1e-12, abserr: 1e-12 }`
impl Default for Toler {
    fn default() -> Self {
        Self {
            relerr: 1e-12,
            abserr: 1e-12,
        }
    }
}

impl Toler {
    pub fn is_eq(&self, a: f64, b: f64) -> bool {
        let d = (a - b).abs();
        d <= self.abserr || d <= self.relerr * f64::max(a.abs(), b.abs())
    }
}

/// Number of ways to arrange `n` items.
pub fn factorial(n: usize) -> usize {
    (1 ..= n).product()
}

/// Row-major strides for the given shape.
pub fn strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; shape.len()];
    for i in (0 .. shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toler() {
        let t = Toler { relerr: 1e-3, abserr: 1e-2 };
        assert!(t.is_eq(10.0, 10.005));
        assert!(!t.is_eq(10.0, 11.0));
        toler_assert_eq!(Toler::default(), 0.1 + 0.2, 0.3);
    }

    #[test]
    fn test_strides() {
        assert_eq!(strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(strides(&[]), Vec::<usize>::new());
        assert_eq!(factorial(0), 1);
        assert_eq!(factorial(4), 24);
    }
}

/// Assert that two `f64` values agree within a
/// [`Toler`](utils/struct.Toler.html), e.g. a diagram element compared with
/// a reference amplitude.
///
/// ```
/// #[macro_use]
/// extern crate ccdiag;
///
/// use ccdiag::utils::Toler;
///
/// fn main() {
///     let amplitude = -0.1 - 0.2;
///     toler_assert_eq!(Toler::default(), amplitude, -0.3);
/// }
/// ```
#[macro_export]
macro_rules! toler_assert_eq {
    ($toler:expr, $left:expr, $right:expr) => {
        let toler = &$toler;
        let left = $left;
        let right = $right;
        assert!(toler.is_eq(left, right),
                "{} and {} differ by more than {:?}",
                left, right, toler)
    }
}

/// A `Regex` compiled once, on first use, and shared afterwards.
///
/// ```
/// #[macro_use]
/// extern crate lazy_static;
/// #[macro_use]
/// extern crate ccdiag;
/// extern crate regex;
///
/// use regex::Regex;
///
/// fn main() {
///     let sector: &Regex = re!(r"^(\d+)h(\d+)p$");
///     let caps = sector.captures("1h2p").unwrap();
///     assert_eq!((&caps[1], &caps[2]), ("1", "2"));
/// }
/// ```
#[macro_export]
macro_rules! re {
    ($e:expr) => {
        {
            lazy_static! {
                static ref REGEX: Regex = Regex::new($e).unwrap();
            }
            &REGEX
        }
    }
}

//! Storage core for symmetry-blocked coupled-cluster diagrams.
//!
//! Diagrams are named tensors over hole and particle spinors.  They live in
//! a [`DiagramStack`](stack/struct.DiagramStack.html) owned by an
//! [`Engine`](engine/struct.Engine.html), which builds them from templates,
//! copies them and writes them out.
extern crate byteorder;
extern crate conv;
extern crate flate2;
extern crate fnv;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
extern crate num;
#[macro_use]
extern crate quick_error;
#[cfg(test)]
extern crate rand;
#[cfg(test)]
extern crate rand_xorshift;
extern crate regex;
extern crate serde;
#[macro_use]
extern crate serde_derive;
extern crate serde_yaml;
extern crate xz2;

#[macro_use]
mod macros;

pub mod block;
pub mod conf;
pub mod diagram;
pub mod engine;
pub mod error;
pub mod io;
pub mod linalg;
pub mod parity;
pub mod spinors;
pub mod stack;
pub mod symmetry;
pub mod timer;
pub mod utils;

pub use conf::Conf;
pub use diagram::Diagram;
pub use engine::Engine;
pub use error::{Error, Result};
pub use linalg::{Arith, Scalar};
pub use spinors::{SpinorInfo, SpinorSpace};
pub use stack::DiagramStack;
pub use symmetry::PointGroup;

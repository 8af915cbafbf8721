//! Error kinds shared by every layer of the crate.
use std::{io, process};
use serde_yaml;

quick_error! {
    #[derive(Debug)]
    pub enum Error {
        NotFound(name: String) {
            display("diagram '{}' not found", name)
        }
        AlreadyExists(name: String) {
            display("diagram '{}' already exists", name)
        }
        UnsupportedKind(tag: String) {
            display("unsupported arithmetic kind: {}", tag)
        }
        ShapeMismatch(msg: String) {
            display("shape mismatch: {}", msg)
        }
        InvalidSymbol(msg: String) {
            display("invalid symbol: {}", msg)
        }
        InvalidIrrep(irrep: usize, num_irreps: usize) {
            display("irrep {} out of range (group has {} irreps)",
                    irrep, num_irreps)
        }
        Format(msg: String) {
            display("malformed file: {}", msg)
        }
        Io(err: io::Error) {
            display("I/O error: {}", err)
            source(err)
            from()
        }
        Yaml(err: serde_yaml::Error) {
            display("configuration error: {}", err)
            source(err)
            from()
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Error::ShapeMismatch` with a formatted message.
pub fn shape_mismatch<S: Into<String>>(msg: S) -> Error {
    Error::ShapeMismatch(msg.into())
}

/// Shorthand for `Error::Format` with a formatted message.
pub fn format_error<S: Into<String>>(msg: S) -> Error {
    Error::Format(msg.into())
}

/// Print the message to stderr and terminate with a nonzero status.
/// Only the driver calls this; library code returns `Error`.
pub fn abort_with_message(msg: &str) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1)
}

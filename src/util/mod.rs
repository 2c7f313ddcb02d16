//! Basic utilities: error types and the crate-wide result alias.

mod error;

pub use error::{Error, Result};

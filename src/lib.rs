//! # tmx
//!
//! Rust implementation of the TMX (Tiled Map XML) 2D tile-map
//! interchange format.
//!
//! The TMX format and the reference editor are developed by the Tiled
//! project. This is an independent implementation of the document
//! format: a bidirectional codec between an in-memory map model and
//! the format's tree-structured text schema, with round-trip fidelity.
//!
//! ## Modules
//!
//! - [`model`] - the document model (maps, tile sets, layers, objects)
//! - [`format`] - the codec and its file entry points
//! - [`xml`] - minimal markup-tree engine the codec builds on
//! - [`util`] - error types
//!
//! ## Example
//!
//! ```ignore
//! use tmx::{read_map, write_map};
//!
//! let map = read_map("level1.tmx")?;
//! write_map(&map, "level1-copy.tmx")?;
//! ```

pub mod format;
pub mod model;
pub mod util;
pub mod xml;

// Re-export commonly used types
pub use format::{
    read_map, read_map_with, read_tileset, write_map, write_map_with, write_tileset,
    write_tileset_with, BoolStyle, ReadOptions, WriteOptions,
};
pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::format::{
        read_map, read_map_with, read_tileset, write_map, write_map_with, write_tileset,
        write_tileset_with, BoolStyle, ReadOptions, WriteOptions,
    };
    pub use crate::model::*;
    pub use crate::util::{Error, Result};
}

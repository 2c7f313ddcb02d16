//! In-memory tile-map document model.
//!
//! This module provides:
//! - [`Map`] - the top-level document: geometry, tile sets, layers
//! - [`Tileset`] / [`TileStorage`] - uniform grids and image collections
//! - [`Layer`] - tile, object, and image layers
//! - [`Object`] / [`Shape`] - freeform objects
//! - [`Property`] / [`Value`] - typed custom properties
//! - [`Gid`] - packed global tile identifiers with flip flags
//!
//! Variant dispatch is everywhere a tagged enum with exhaustive
//! matching, so a schema addition cannot compile until every codec
//! site handles it. Schema default values live as named constants next
//! to their types so encode and decode agree on omission.

mod color;
mod geometry;
mod gid;
mod image;
mod layer;
mod map;
mod object;
mod property;
mod tileset;

pub use color::{Color, ParseColorError};
pub use geometry::{Offset, Point, PxSize, Size, TileOffset};
pub use gid::{
    Flip, Gid, FLIP_DIAGONAL, FLIP_HORIZONTAL, FLIP_MASK, FLIP_VERTICAL, ID_MASK, MAX_TILE_ID,
};
pub use image::Image;
pub use layer::{
    Compression, Data, DrawOrder, Encoding, ImageLayer, Layer, ObjectLayer, TileLayer,
    DEFAULT_OPACITY, DEFAULT_VISIBLE,
};
pub use map::{Map, Orientation, RenderOrder, StaggerAxis, StaggerIndex, FORMAT_VERSION};
pub use object::{Object, Shape};
pub use property::{Properties, Property, Value};
pub use tileset::{
    Animation, CollectionStorage, CollectionTile, Frame, GridStorage, GridTile, TileStorage,
    Tileset, TilesetContent,
};

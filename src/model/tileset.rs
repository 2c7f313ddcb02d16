//! Tile sets: uniform grids sliced from one image, or per-tile image
//! collections, embedded in a map or referenced as external documents.

use std::path::PathBuf;

use super::{Image, ObjectLayer, Properties, Size, TileOffset};

/// One frame of a tile animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    /// Local id of the tile shown during this frame.
    pub tile_id: u32,
    /// Frame duration in milliseconds.
    pub duration_ms: u32,
}

/// An ordered frame list. Empty animations are omitted from documents.
pub type Animation = Vec<Frame>;

/// A per-tile record in a uniform-grid tile set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridTile {
    /// Local id, unique within the set and in `[0, tile_count)`.
    pub id: u32,
    pub properties: Properties,
    /// Collision shapes, stored as an embedded object layer.
    pub collision: Option<ObjectLayer>,
    pub animation: Animation,
}

/// A per-tile record in an image-collection tile set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionTile {
    /// Local id, unique within the set and in `[0, tile_count)`.
    pub id: u32,
    pub properties: Properties,
    /// The tile's own image; every collection tile has one.
    pub image: Image,
    pub animation: Animation,
}

/// Tiles sliced out of one shared image by fixed dimensions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridStorage {
    /// Pixel size of every tile in the set.
    pub tile_size: Size,
    /// Pixels between adjacent tiles in the source image.
    pub spacing: u32,
    /// Pixels around the outer edge of the source image.
    pub margin: u32,
    pub columns: u32,
    pub rows: u32,
    pub image: Image,
    /// Sparse per-tile records; tiles without one have no extra data.
    pub tiles: Vec<GridTile>,
}

impl GridStorage {
    /// Tile count, fixed at columns × rows for uniform grids.
    #[inline]
    pub const fn tile_count(&self) -> u32 {
        self.columns * self.rows
    }
}

/// Tiles each owning their own image and pixel size.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CollectionStorage {
    /// Largest tile size in the collection.
    pub max_tile_size: Size,
    /// Explicit count; not derivable for collections.
    pub tile_count: u32,
    /// Explicit editor column count; independent of the tile count.
    pub columns: u32,
    pub tiles: Vec<CollectionTile>,
}

/// How a tile set stores its tiles. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum TileStorage {
    Grid(GridStorage),
    Collection(CollectionStorage),
}

impl TileStorage {
    /// Number of tiles the storage declares.
    pub fn tile_count(&self) -> u32 {
        match self {
            TileStorage::Grid(g) => g.tile_count(),
            TileStorage::Collection(c) => c.tile_count,
        }
    }
}

/// The content of a tile set, identical for the embedded and the
/// standalone-document forms.
#[derive(Debug, Clone, PartialEq)]
pub struct TilesetContent {
    pub name: String,
    /// Pixel offset applied when drawing tiles from this set.
    pub tile_offset: TileOffset,
    pub properties: Properties,
    pub storage: TileStorage,
}

impl TilesetContent {
    pub fn new(name: impl Into<String>, storage: TileStorage) -> Self {
        Self {
            name: name.into(),
            tile_offset: TileOffset::default(),
            properties: Properties::new(),
            storage,
        }
    }
}

/// A tile set owned by a map.
///
/// `first_gid` is assigned by the owning map and shifts the set's local
/// ids into the map's global id space. A non-empty `source` marks the
/// set as externally stored: the map document then carries only the
/// `first_gid`/`source` stub while the content is written to (and read
/// from) its own document. `content` is `None` only for a stub decoded
/// without following the reference; such a stub re-serializes unchanged
/// and leaves the external file untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Tileset {
    pub first_gid: u32,
    pub source: Option<PathBuf>,
    pub content: Option<TilesetContent>,
}

impl Tileset {
    /// A tile set stored inside the map document.
    pub fn embedded(first_gid: u32, content: TilesetContent) -> Self {
        Self { first_gid, source: None, content: Some(content) }
    }

    /// A tile set stored as its own document at `source`, resolved
    /// relative to the map's containing directory.
    pub fn external(first_gid: u32, source: impl Into<PathBuf>, content: TilesetContent) -> Self {
        Self { first_gid, source: Some(source.into()), content: Some(content) }
    }
}

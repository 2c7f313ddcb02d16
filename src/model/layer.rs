//! Map layers: tile grids, object collections, and background images.

use super::{Color, Gid, Image, Object, Offset, Properties, Size};

/// Schema default for layer opacity: fully opaque.
pub const DEFAULT_OPACITY: f64 = 1.0;

/// Schema default for the visibility flag.
pub const DEFAULT_VISIBLE: bool = true;

/// Textual encoding of a tile layer's data block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Encoding {
    /// Comma/newline-delimited plain decimal list.
    #[default]
    Csv,
    /// Base64 of the 4-byte little-endian cell stream.
    Base64,
}

/// Compression applied to the cell stream before base64 encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Compression {
    #[default]
    None,
    Zlib,
    /// Recognized schema token with no codec support; requesting it in
    /// either direction is an error.
    Gzip,
}

/// A tile layer's cell grid plus its requested serialized form.
///
/// Cells are row-major and must number exactly width × height of the
/// owning layer. The encoding is an explicit request, never negotiated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Data {
    pub encoding: Encoding,
    pub compression: Compression,
    pub cells: Vec<Gid>,
}

impl Data {
    pub fn csv(cells: Vec<Gid>) -> Self {
        Self { encoding: Encoding::Csv, compression: Compression::None, cells }
    }

    pub fn base64(compression: Compression, cells: Vec<Gid>) -> Self {
        Self { encoding: Encoding::Base64, compression, cells }
    }
}

/// Draw order of an object layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DrawOrder {
    /// Objects sorted by y position; the schema default, omitted on write.
    #[default]
    TopDown,
    /// Objects drawn in list order.
    Index,
}

/// A layer holding a cell grid of tile references.
#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub name: String,
    pub visible: bool,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    pub offset: Offset,
    pub properties: Properties,
    /// Grid size in cells, matching the owning map.
    pub size: Size,
    pub data: Data,
}

impl TileLayer {
    /// An empty, fully transparent-free layer of the given size.
    pub fn new(name: impl Into<String>, size: Size) -> Self {
        Self {
            name: name.into(),
            visible: DEFAULT_VISIBLE,
            opacity: DEFAULT_OPACITY,
            offset: Offset::default(),
            properties: Properties::new(),
            size,
            data: Data::csv(vec![Gid::EMPTY; size.area()]),
        }
    }
}

/// A layer holding freeform objects.
///
/// Also serves as the collision-shape container on uniform-grid tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectLayer {
    pub name: String,
    pub visible: bool,
    pub opacity: f64,
    pub offset: Offset,
    pub properties: Properties,
    /// Display color for the editor; absent means editor default.
    pub color: Option<Color>,
    pub draw_order: DrawOrder,
    pub objects: Vec<Object>,
}

impl ObjectLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: DEFAULT_VISIBLE,
            opacity: DEFAULT_OPACITY,
            offset: Offset::default(),
            properties: Properties::new(),
            color: None,
            draw_order: DrawOrder::default(),
            objects: Vec::new(),
        }
    }
}

impl Default for ObjectLayer {
    fn default() -> Self {
        Self::new("")
    }
}

/// A layer holding a single background image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayer {
    pub name: String,
    pub visible: bool,
    pub opacity: f64,
    pub offset: Offset,
    pub properties: Properties,
    pub image: Option<Image>,
}

impl ImageLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visible: DEFAULT_VISIBLE,
            opacity: DEFAULT_OPACITY,
            offset: Offset::default(),
            properties: Properties::new(),
            image: None,
        }
    }
}

/// One sheet of map content. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq)]
pub enum Layer {
    Tile(TileLayer),
    Object(ObjectLayer),
    Image(ImageLayer),
}

impl Layer {
    pub fn name(&self) -> &str {
        match self {
            Layer::Tile(l) => &l.name,
            Layer::Object(l) => &l.name,
            Layer::Image(l) => &l.name,
        }
    }
}

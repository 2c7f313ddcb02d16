//! Fixed element, attribute, and token names of the TMX schema.
//!
//! Every name the codec reads or writes lives here; no codec component
//! spells a schema token inline. The values are an external contract
//! and must match the format bit-exactly.

// Elements --------------------------------------------------------------------

pub const MAP: &str = "map";
pub const TILE_SET: &str = "tileset";
pub const TILE_OFFSET: &str = "tileoffset";
pub const TILE: &str = "tile";
pub const IMAGE: &str = "image";
pub const ANIMATION: &str = "animation";
pub const FRAME: &str = "frame";
pub const PROPERTIES: &str = "properties";
pub const PROPERTY: &str = "property";
pub const TILE_LAYER: &str = "layer";
pub const OBJECT_LAYER: &str = "objectgroup";
pub const IMAGE_LAYER: &str = "imagelayer";
pub const DATA: &str = "data";
pub const OBJECT: &str = "object";
pub const ELLIPSE: &str = "ellipse";
pub const POLYGON: &str = "polygon";
pub const POLYLINE: &str = "polyline";

// Map attributes --------------------------------------------------------------

pub const MAP_VERSION: &str = "version";
pub const MAP_ORIENTATION: &str = "orientation";
pub const MAP_RENDER_ORDER: &str = "renderorder";
pub const MAP_STAGGER_AXIS: &str = "staggeraxis";
pub const MAP_STAGGER_INDEX: &str = "staggerindex";
pub const MAP_HEX_SIDE_LENGTH: &str = "hexsidelength";
pub const MAP_BACKGROUND: &str = "backgroundcolor";
pub const MAP_NEXT_OBJECT_ID: &str = "nextobjectid";

pub const ORIENTATION_ORTHOGONAL: &str = "orthogonal";
pub const ORIENTATION_ISOMETRIC: &str = "isometric";
pub const ORIENTATION_STAGGERED: &str = "staggered";
pub const ORIENTATION_HEXAGONAL: &str = "hexagonal";

pub const RENDER_ORDER_RIGHT_DOWN: &str = "right-down";
pub const RENDER_ORDER_RIGHT_UP: &str = "right-up";
pub const RENDER_ORDER_LEFT_DOWN: &str = "left-down";
pub const RENDER_ORDER_LEFT_UP: &str = "left-up";

pub const STAGGER_AXIS_X: &str = "x";
pub const STAGGER_AXIS_Y: &str = "y";
pub const STAGGER_INDEX_EVEN: &str = "even";
pub const STAGGER_INDEX_ODD: &str = "odd";

// Shared attributes -----------------------------------------------------------

pub const NAME: &str = "name";
pub const WIDTH: &str = "width";
pub const HEIGHT: &str = "height";
pub const TILE_WIDTH: &str = "tilewidth";
pub const TILE_HEIGHT: &str = "tileheight";
pub const X: &str = "x";
pub const Y: &str = "y";
pub const VISIBLE: &str = "visible";

// Tile set attributes ---------------------------------------------------------

pub const TILE_SET_FIRST_GID: &str = "firstgid";
pub const TILE_SET_SOURCE: &str = "source";
pub const TILE_SET_SPACING: &str = "spacing";
pub const TILE_SET_MARGIN: &str = "margin";
pub const TILE_SET_TILE_COUNT: &str = "tilecount";
pub const TILE_SET_COLUMNS: &str = "columns";
pub const TILE_ID: &str = "id";
pub const FRAME_TILE_ID: &str = "tileid";
pub const FRAME_DURATION: &str = "duration";

// Image attributes ------------------------------------------------------------

pub const IMAGE_SOURCE: &str = "source";
pub const IMAGE_TRANSPARENT: &str = "trans";

// Layer attributes ------------------------------------------------------------

pub const LAYER_OPACITY: &str = "opacity";
pub const LAYER_OFFSET_X: &str = "offsetx";
pub const LAYER_OFFSET_Y: &str = "offsety";
pub const OBJECT_LAYER_COLOR: &str = "color";
pub const OBJECT_LAYER_DRAW_ORDER: &str = "draworder";

pub const DRAW_ORDER_TOP_DOWN: &str = "topdown";
pub const DRAW_ORDER_INDEX: &str = "index";

// Data attributes -------------------------------------------------------------

pub const DATA_ENCODING: &str = "encoding";
pub const DATA_COMPRESSION: &str = "compression";

pub const ENCODING_CSV: &str = "csv";
pub const ENCODING_BASE64: &str = "base64";
pub const COMPRESSION_ZLIB: &str = "zlib";
pub const COMPRESSION_GZIP: &str = "gzip";

// Object attributes -----------------------------------------------------------

pub const OBJECT_ID: &str = "id";
pub const OBJECT_TYPE: &str = "type";
pub const OBJECT_GID: &str = "gid";
pub const OBJECT_ROTATION: &str = "rotation";
pub const POLY_POINTS: &str = "points";

// Property attributes ---------------------------------------------------------

pub const PROPERTY_NAME: &str = "name";
pub const PROPERTY_TYPE: &str = "type";
pub const PROPERTY_VALUE: &str = "value";

pub const PROPERTY_TYPE_INT: &str = "int";
pub const PROPERTY_TYPE_FLOAT: &str = "float";
pub const PROPERTY_TYPE_BOOL: &str = "bool";
pub const PROPERTY_TYPE_COLOR: &str = "color";
pub const PROPERTY_TYPE_FILE: &str = "file";
pub const PROPERTY_TYPE_STRING: &str = "string";

pub const BOOL_TRUE: &str = "true";
pub const BOOL_FALSE: &str = "false";

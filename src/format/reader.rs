//! Document-tree → model decoding.
//!
//! The mirror walk of the writer: dispatches on element names and enum
//! tokens, applies the schema's default values for absent attributes,
//! and validates structural invariants as each subtree is parsed. The
//! first violation aborts the whole decode.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::model::{
    Animation, CollectionStorage, CollectionTile, DrawOrder, Frame, Gid, GridStorage,
    GridTile, Image, ImageLayer, Layer, Map, Object, ObjectLayer, Offset, Orientation, Point,
    Properties, Property, PxSize, RenderOrder, Shape, Size, StaggerAxis, StaggerIndex, TileLayer,
    TileOffset, TileStorage, Tileset, TilesetContent, Value, DEFAULT_OPACITY, DEFAULT_VISIBLE,
};
use crate::util::{Error, Result};
use crate::xml::{self, Element};

use super::{data, names, points, ReadOptions};

// Attribute helpers -----------------------------------------------------------

fn req<'a>(elem: &'a Element, name: &'static str) -> Result<&'a str> {
    elem.attribute(name).ok_or(Error::MissingAttribute(name))
}

fn parse_attr<T: FromStr>(elem: &Element, name: &'static str) -> Result<T> {
    let raw = req(elem, name)?;
    raw.parse().map_err(|_| Error::invalid_attribute(name, raw))
}

fn parse_attr_opt<T: FromStr>(elem: &Element, name: &'static str) -> Result<Option<T>> {
    match elem.attribute(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| Error::invalid_attribute(name, raw)),
    }
}

fn parse_attr_or<T: FromStr>(elem: &Element, name: &'static str, default: T) -> Result<T> {
    Ok(parse_attr_opt(elem, name)?.unwrap_or(default))
}

fn parse_bool_token(name: &'static str, raw: &str) -> Result<bool> {
    match raw {
        names::BOOL_TRUE | "1" => Ok(true),
        names::BOOL_FALSE | "0" => Ok(false),
        _ => Err(Error::invalid_attribute(name, raw)),
    }
}

fn parse_flag(elem: &Element, name: &'static str, default: bool) -> Result<bool> {
    match elem.attribute(name) {
        None => Ok(default),
        Some(raw) => parse_bool_token(name, raw),
    }
}

// Properties ------------------------------------------------------------------

fn parse_property(elem: &Element) -> Result<Property> {
    let name = req(elem, names::PROPERTY_NAME)?.to_string();

    // A missing type tag combined with text content is the multiline
    // string form; a missing value attribute falls back to the text.
    let raw = elem
        .attribute(names::PROPERTY_VALUE)
        .or_else(|| elem.text())
        .unwrap_or("");

    let value = match elem
        .attribute(names::PROPERTY_TYPE)
        .unwrap_or(names::PROPERTY_TYPE_STRING)
    {
        names::PROPERTY_TYPE_INT => Value::Int(parse_value(raw)?),
        names::PROPERTY_TYPE_FLOAT => Value::Float(parse_value(raw)?),
        names::PROPERTY_TYPE_BOOL => Value::Bool(parse_bool_token(names::PROPERTY_VALUE, raw)?),
        names::PROPERTY_TYPE_COLOR => Value::Color(parse_value(raw)?),
        names::PROPERTY_TYPE_FILE => Value::File(PathBuf::from(raw)),
        names::PROPERTY_TYPE_STRING => Value::String(raw.to_string()),
        token => return Err(Error::invalid_attribute(names::PROPERTY_TYPE, token)),
    };

    Ok(Property { name, value })
}

fn parse_value<T: FromStr>(raw: &str) -> Result<T> {
    raw.parse()
        .map_err(|_| Error::invalid_attribute(names::PROPERTY_VALUE, raw))
}

fn parse_properties(parent: &Element) -> Result<Properties> {
    match parent.child(names::PROPERTIES) {
        None => Ok(Properties::new()),
        Some(elem) => elem
            .children_named(names::PROPERTY)
            .map(parse_property)
            .collect(),
    }
}

// Image and animation ---------------------------------------------------------

fn parse_image(elem: &Element) -> Result<Image> {
    Ok(Image {
        source: PathBuf::from(req(elem, names::IMAGE_SOURCE)?),
        transparent: parse_attr_opt(elem, names::IMAGE_TRANSPARENT)?,
        size: Size::new(
            parse_attr_or(elem, names::WIDTH, 0)?,
            parse_attr_or(elem, names::HEIGHT, 0)?,
        ),
    })
}

fn parse_frame(elem: &Element) -> Result<Frame> {
    Ok(Frame {
        tile_id: parse_attr(elem, names::FRAME_TILE_ID)?,
        duration_ms: parse_attr(elem, names::FRAME_DURATION)?,
    })
}

fn parse_animation(tile: &Element) -> Result<Animation> {
    match tile.child(names::ANIMATION) {
        None => Ok(Animation::new()),
        Some(elem) => elem.children_named(names::FRAME).map(parse_frame).collect(),
    }
}

// Tile sets -------------------------------------------------------------------

fn parse_tile_offset(tileset: &Element) -> Result<TileOffset> {
    match tileset.child(names::TILE_OFFSET) {
        None => Ok(TileOffset::default()),
        Some(elem) => Ok(TileOffset::new(
            parse_attr_or(elem, names::X, 0)?,
            parse_attr_or(elem, names::Y, 0)?,
        )),
    }
}

fn parse_grid_tile(elem: &Element) -> Result<GridTile> {
    Ok(GridTile {
        id: parse_attr(elem, names::TILE_ID)?,
        properties: parse_properties(elem)?,
        collision: elem
            .child(names::OBJECT_LAYER)
            .map(parse_object_layer)
            .transpose()?,
        animation: parse_animation(elem)?,
    })
}

fn parse_collection_tile(elem: &Element) -> Result<CollectionTile> {
    let image = elem
        .child(names::IMAGE)
        .ok_or(Error::MissingElement(names::IMAGE))?;
    Ok(CollectionTile {
        id: parse_attr(elem, names::TILE_ID)?,
        properties: parse_properties(elem)?,
        image: parse_image(image)?,
        animation: parse_animation(elem)?,
    })
}

/// Local tile ids must be unique within the set and inside
/// `[0, tile_count)`.
fn check_tile_ids<'a>(ids: impl Iterator<Item = &'a u32>, tile_count: u32) -> Result<()> {
    let mut seen = HashSet::new();
    for &id in ids {
        if id >= tile_count || !seen.insert(id) {
            return Err(Error::invalid_attribute(names::TILE_ID, id.to_string()));
        }
    }
    Ok(())
}

fn parse_grid_storage(elem: &Element, image: &Element) -> Result<GridStorage> {
    let tile_count: u32 = parse_attr(elem, names::TILE_SET_TILE_COUNT)?;
    let columns: u32 = parse_attr(elem, names::TILE_SET_COLUMNS)?;

    let rows = if columns > 0 { tile_count / columns } else { 0 };
    if columns * rows != tile_count {
        return Err(Error::invalid_attribute(
            names::TILE_SET_TILE_COUNT,
            tile_count.to_string(),
        ));
    }

    let tiles: Vec<GridTile> = elem
        .children_named(names::TILE)
        .map(parse_grid_tile)
        .collect::<Result<_>>()?;
    check_tile_ids(tiles.iter().map(|t| &t.id), tile_count)?;

    Ok(GridStorage {
        tile_size: Size::new(
            parse_attr(elem, names::TILE_WIDTH)?,
            parse_attr(elem, names::TILE_HEIGHT)?,
        ),
        spacing: parse_attr_or(elem, names::TILE_SET_SPACING, 0)?,
        margin: parse_attr_or(elem, names::TILE_SET_MARGIN, 0)?,
        columns,
        rows,
        image: parse_image(image)?,
        tiles,
    })
}

fn parse_collection_storage(elem: &Element) -> Result<CollectionStorage> {
    let tile_count: u32 = parse_attr(elem, names::TILE_SET_TILE_COUNT)?;

    let tiles: Vec<CollectionTile> = elem
        .children_named(names::TILE)
        .map(parse_collection_tile)
        .collect::<Result<_>>()?;
    check_tile_ids(tiles.iter().map(|t| &t.id), tile_count)?;

    Ok(CollectionStorage {
        max_tile_size: Size::new(
            parse_attr(elem, names::TILE_WIDTH)?,
            parse_attr(elem, names::TILE_HEIGHT)?,
        ),
        tile_count,
        columns: parse_attr(elem, names::TILE_SET_COLUMNS)?,
        tiles,
    })
}

fn parse_tileset_content(elem: &Element) -> Result<TilesetContent> {
    // A direct <image> child marks the uniform-grid variant; image
    // collections keep their images on the individual tiles.
    let storage = match elem.child(names::IMAGE) {
        Some(image) => TileStorage::Grid(parse_grid_storage(elem, image)?),
        None => TileStorage::Collection(parse_collection_storage(elem)?),
    };

    Ok(TilesetContent {
        name: elem.attribute(names::NAME).unwrap_or("").to_string(),
        tile_offset: parse_tile_offset(elem)?,
        properties: parse_properties(elem)?,
        storage,
    })
}

/// Decode the root of a standalone tile-set document.
pub(crate) fn parse_tileset_root(root: &Element) -> Result<TilesetContent> {
    if root.name() != names::TILE_SET {
        return Err(Error::MissingElement(names::TILE_SET));
    }
    parse_tileset_content(root)
}

/// Load and decode an external tile-set document, rejecting reference
/// cycles via the visited set threaded through the recursion.
fn load_external_tileset(
    path: &Path,
    visited: &HashSet<PathBuf>,
) -> Result<TilesetContent> {
    let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
    if visited.contains(&canonical) {
        return Err(Error::unsupported(format!(
            "cyclic external tile-set reference: {}",
            path.display()
        )));
    }

    tracing::debug!(path = %path.display(), "loading external tile set");
    let root = xml::load(path)?;
    parse_tileset_root(&root)
}

fn parse_map_tileset(
    elem: &Element,
    dir: &Path,
    opts: &ReadOptions,
    visited: &HashSet<PathBuf>,
) -> Result<Tileset> {
    let first_gid = parse_attr(elem, names::TILE_SET_FIRST_GID)?;

    match elem.attribute(names::TILE_SET_SOURCE) {
        Some(source) => {
            let source = PathBuf::from(source);
            // The external document has no first-global-id of its own;
            // the referencing map's value applies to the merged content.
            let content = if opts.follow_external {
                Some(load_external_tileset(&dir.join(&source), visited)?)
            } else {
                None
            };
            Ok(Tileset { first_gid, source: Some(source), content })
        }
        None => Ok(Tileset {
            first_gid,
            source: None,
            content: Some(parse_tileset_content(elem)?),
        }),
    }
}

// Objects ---------------------------------------------------------------------

fn parse_shape(elem: &Element) -> Result<Shape> {
    if let Some(raw) = elem.attribute(names::OBJECT_GID) {
        let packed: u32 = raw
            .parse()
            .map_err(|_| Error::invalid_attribute(names::OBJECT_GID, raw))?;
        let gid = Gid::unpack(packed)
            .ok_or_else(|| Error::invalid_attribute(names::OBJECT_GID, raw))?;
        return Ok(Shape::Tile(gid));
    }

    let size = PxSize::new(
        parse_attr_or(elem, names::WIDTH, 0.0)?,
        parse_attr_or(elem, names::HEIGHT, 0.0)?,
    );

    if elem.has_child(names::ELLIPSE) {
        return Ok(Shape::Ellipse { size });
    }
    if let Some(poly) = elem.child(names::POLYGON) {
        return Ok(Shape::Polygon {
            points: points::parse_points(req(poly, names::POLY_POINTS)?)?,
        });
    }
    if let Some(poly) = elem.child(names::POLYLINE) {
        return Ok(Shape::Polyline {
            points: points::parse_points(req(poly, names::POLY_POINTS)?)?,
        });
    }
    Ok(Shape::Rect { size })
}

fn parse_object(elem: &Element) -> Result<Object> {
    Ok(Object {
        id: parse_attr(elem, names::OBJECT_ID)?,
        name: elem.attribute(names::NAME).unwrap_or("").to_string(),
        kind: elem.attribute(names::OBJECT_TYPE).unwrap_or("").to_string(),
        position: Point::new(
            parse_attr_or(elem, names::X, 0.0)?,
            parse_attr_or(elem, names::Y, 0.0)?,
        ),
        shape: parse_shape(elem)?,
        rotation: parse_attr_or(elem, names::OBJECT_ROTATION, 0.0)?,
        visible: parse_flag(elem, names::VISIBLE, DEFAULT_VISIBLE)?,
        properties: parse_properties(elem)?,
    })
}

// Layers ----------------------------------------------------------------------

struct LayerCommon {
    name: String,
    visible: bool,
    opacity: f64,
    offset: Offset,
}

fn parse_layer_common(elem: &Element) -> Result<LayerCommon> {
    let opacity = parse_attr_or(elem, names::LAYER_OPACITY, DEFAULT_OPACITY)?;
    if !(0.0..=1.0).contains(&opacity) {
        return Err(Error::invalid_attribute(
            names::LAYER_OPACITY,
            opacity.to_string(),
        ));
    }

    Ok(LayerCommon {
        name: elem.attribute(names::NAME).unwrap_or("").to_string(),
        visible: parse_flag(elem, names::VISIBLE, DEFAULT_VISIBLE)?,
        opacity,
        offset: Offset::new(
            parse_attr_or(elem, names::LAYER_OFFSET_X, 0.0)?,
            parse_attr_or(elem, names::LAYER_OFFSET_Y, 0.0)?,
        ),
    })
}

fn parse_tile_layer(elem: &Element) -> Result<TileLayer> {
    let common = parse_layer_common(elem)?;
    let size = Size::new(
        parse_attr(elem, names::WIDTH)?,
        parse_attr(elem, names::HEIGHT)?,
    );
    let data_elem = elem
        .child(names::DATA)
        .ok_or(Error::MissingElement(names::DATA))?;

    Ok(TileLayer {
        name: common.name,
        visible: common.visible,
        opacity: common.opacity,
        offset: common.offset,
        properties: parse_properties(elem)?,
        size,
        data: data::decode(data_elem, size)?,
    })
}

fn parse_object_layer(elem: &Element) -> Result<ObjectLayer> {
    let common = parse_layer_common(elem)?;

    let draw_order = match elem.attribute(names::OBJECT_LAYER_DRAW_ORDER) {
        None => DrawOrder::default(),
        Some(names::DRAW_ORDER_TOP_DOWN) => DrawOrder::TopDown,
        Some(names::DRAW_ORDER_INDEX) => DrawOrder::Index,
        Some(token) => {
            return Err(Error::invalid_attribute(
                names::OBJECT_LAYER_DRAW_ORDER,
                token,
            ));
        }
    };

    Ok(ObjectLayer {
        name: common.name,
        visible: common.visible,
        opacity: common.opacity,
        offset: common.offset,
        properties: parse_properties(elem)?,
        color: parse_attr_opt(elem, names::OBJECT_LAYER_COLOR)?,
        draw_order,
        objects: elem
            .children_named(names::OBJECT)
            .map(parse_object)
            .collect::<Result<_>>()?,
    })
}

fn parse_image_layer(elem: &Element) -> Result<ImageLayer> {
    let common = parse_layer_common(elem)?;
    Ok(ImageLayer {
        name: common.name,
        visible: common.visible,
        opacity: common.opacity,
        offset: common.offset,
        properties: parse_properties(elem)?,
        image: elem.child(names::IMAGE).map(parse_image).transpose()?,
    })
}

// Map -------------------------------------------------------------------------

fn parse_stagger_axis(root: &Element) -> Result<StaggerAxis> {
    match req(root, names::MAP_STAGGER_AXIS)? {
        names::STAGGER_AXIS_X => Ok(StaggerAxis::X),
        names::STAGGER_AXIS_Y => Ok(StaggerAxis::Y),
        token => Err(Error::invalid_attribute(names::MAP_STAGGER_AXIS, token)),
    }
}

fn parse_stagger_index(root: &Element) -> Result<StaggerIndex> {
    match req(root, names::MAP_STAGGER_INDEX)? {
        names::STAGGER_INDEX_EVEN => Ok(StaggerIndex::Even),
        names::STAGGER_INDEX_ODD => Ok(StaggerIndex::Odd),
        token => Err(Error::invalid_attribute(names::MAP_STAGGER_INDEX, token)),
    }
}

fn parse_orientation(root: &Element) -> Result<Orientation> {
    match req(root, names::MAP_ORIENTATION)? {
        names::ORIENTATION_ORTHOGONAL => Ok(Orientation::Orthogonal),
        names::ORIENTATION_ISOMETRIC => Ok(Orientation::Isometric),
        names::ORIENTATION_STAGGERED => Ok(Orientation::Staggered {
            axis: parse_stagger_axis(root)?,
            index: parse_stagger_index(root)?,
        }),
        names::ORIENTATION_HEXAGONAL => Ok(Orientation::Hexagonal {
            side_length: parse_attr(root, names::MAP_HEX_SIDE_LENGTH)?,
            axis: parse_stagger_axis(root)?,
            index: parse_stagger_index(root)?,
        }),
        token => Err(Error::invalid_attribute(names::MAP_ORIENTATION, token)),
    }
}

fn parse_render_order(root: &Element) -> Result<RenderOrder> {
    match root.attribute(names::MAP_RENDER_ORDER) {
        None => Ok(RenderOrder::default()),
        Some(names::RENDER_ORDER_RIGHT_DOWN) => Ok(RenderOrder::RightDown),
        Some(names::RENDER_ORDER_RIGHT_UP) => Ok(RenderOrder::RightUp),
        Some(names::RENDER_ORDER_LEFT_DOWN) => Ok(RenderOrder::LeftDown),
        Some(names::RENDER_ORDER_LEFT_UP) => Ok(RenderOrder::LeftUp),
        Some(token) => Err(Error::invalid_attribute(names::MAP_RENDER_ORDER, token)),
    }
}

/// Decode a complete map from its root element. `dir` is the map's
/// containing directory, used to resolve external tile-set references.
pub(crate) fn parse_map_root(
    root: &Element,
    dir: &Path,
    opts: &ReadOptions,
    visited: &HashSet<PathBuf>,
) -> Result<Map> {
    if root.name() != names::MAP {
        return Err(Error::MissingElement(names::MAP));
    }

    let version = req(root, names::MAP_VERSION)?.to_string();
    let orientation = parse_orientation(root)?;
    let render_order = parse_render_order(root)?;
    let size = Size::new(
        parse_attr(root, names::WIDTH)?,
        parse_attr(root, names::HEIGHT)?,
    );
    let tile_size = Size::new(
        parse_attr(root, names::TILE_WIDTH)?,
        parse_attr(root, names::TILE_HEIGHT)?,
    );
    let background = parse_attr_opt(root, names::MAP_BACKGROUND)?;
    let properties = parse_properties(root)?;

    let tile_sets = root
        .children_named(names::TILE_SET)
        .map(|elem| parse_map_tileset(elem, dir, opts, visited))
        .collect::<Result<Vec<_>>>()?;

    let mut layers = Vec::new();
    for child in root.children() {
        match child.name() {
            names::TILE_LAYER => layers.push(Layer::Tile(parse_tile_layer(child)?)),
            names::OBJECT_LAYER => layers.push(Layer::Object(parse_object_layer(child)?)),
            names::IMAGE_LAYER => layers.push(Layer::Image(parse_image_layer(child)?)),
            _ => {}
        }
    }

    let mut map = Map {
        version,
        orientation,
        render_order,
        size,
        tile_size,
        background,
        next_object_id: 1,
        properties,
        tile_sets,
        layers,
    };

    let max_id = map.max_object_id();
    map.next_object_id = match parse_attr_opt::<u32>(root, names::MAP_NEXT_OBJECT_ID)? {
        Some(next) => {
            // The counter must exceed every object id ever assigned.
            if max_id.is_some_and(|max| next <= max) {
                return Err(Error::invalid_attribute(
                    names::MAP_NEXT_OBJECT_ID,
                    next.to_string(),
                ));
            }
            next
        }
        None => max_id.map_or(1, |max| max + 1),
    };

    Ok(map)
}

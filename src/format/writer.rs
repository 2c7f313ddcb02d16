//! Model → document-tree encoding.
//!
//! Walks the map model top-down, delegating each substructure to its
//! codec. Attributes equal to their schema default are omitted; the
//! reader reconstructs them from absence. Externally stored tile sets
//! are serialized as their own documents as a side effect of writing
//! the referencing map.

use std::path::Path;

use crate::model::{
    CollectionStorage, CollectionTile, DrawOrder, Frame, GridStorage, GridTile, Image, ImageLayer,
    Layer, Map, Object, ObjectLayer, Offset, Orientation, Properties, Property, PxSize,
    RenderOrder, Shape, StaggerAxis, StaggerIndex, TileLayer, TileOffset, TileStorage, Tileset,
    TilesetContent, Value, DEFAULT_OPACITY,
};
use crate::util::{Error, Result};
use crate::xml::Element;

use super::{data, names, points, BoolStyle, WriteOptions};

// Scalars ---------------------------------------------------------------------

fn render_order_token(order: RenderOrder) -> &'static str {
    match order {
        RenderOrder::RightDown => names::RENDER_ORDER_RIGHT_DOWN,
        RenderOrder::RightUp => names::RENDER_ORDER_RIGHT_UP,
        RenderOrder::LeftDown => names::RENDER_ORDER_LEFT_DOWN,
        RenderOrder::LeftUp => names::RENDER_ORDER_LEFT_UP,
    }
}

fn stagger_axis_token(axis: StaggerAxis) -> &'static str {
    match axis {
        StaggerAxis::X => names::STAGGER_AXIS_X,
        StaggerAxis::Y => names::STAGGER_AXIS_Y,
    }
}

fn stagger_index_token(index: StaggerIndex) -> &'static str {
    match index {
        StaggerIndex::Even => names::STAGGER_INDEX_EVEN,
        StaggerIndex::Odd => names::STAGGER_INDEX_ODD,
    }
}

fn bool_token(value: bool, opts: &WriteOptions) -> &'static str {
    match (opts.bool_style, value) {
        (BoolStyle::Literal, true) => names::BOOL_TRUE,
        (BoolStyle::Literal, false) => names::BOOL_FALSE,
        (BoolStyle::Numeric, true) => "1",
        (BoolStyle::Numeric, false) => "0",
    }
}

// Properties ------------------------------------------------------------------

fn write_property(prop: &Property, elem: &mut Element, opts: &WriteOptions) {
    elem.set_attribute(names::PROPERTY_NAME, &prop.name);

    let typed = |elem: &mut Element, tag: &'static str, value: String| {
        elem.set_attribute(names::PROPERTY_TYPE, tag);
        elem.set_attribute(names::PROPERTY_VALUE, value);
    };

    match &prop.value {
        Value::Int(i) => typed(elem, names::PROPERTY_TYPE_INT, i.to_string()),
        Value::Float(f) => typed(elem, names::PROPERTY_TYPE_FLOAT, f.to_string()),
        Value::Bool(b) => typed(elem, names::PROPERTY_TYPE_BOOL, bool_token(*b, opts).to_string()),
        Value::Color(c) => typed(elem, names::PROPERTY_TYPE_COLOR, c.to_string()),
        Value::File(path) => typed(elem, names::PROPERTY_TYPE_FILE, path.display().to_string()),
        Value::String(s) => {
            // The type tag defaults to string and is never written; a
            // value with a line break moves into element text.
            if s.contains('\n') {
                elem.set_text(s.clone());
            } else {
                elem.set_attribute(names::PROPERTY_VALUE, s);
            }
        }
    }
}

fn write_properties(props: &Properties, parent: &mut Element, opts: &WriteOptions) {
    if props.is_empty() {
        return;
    }

    let elem = parent.add_child(names::PROPERTIES);
    for prop in props {
        write_property(prop, elem.add_child(names::PROPERTY), opts);
    }
}

// Image -----------------------------------------------------------------------

fn write_image(img: &Image, elem: &mut Element) {
    elem.set_attribute(names::IMAGE_SOURCE, img.source.display());
    if let Some(trans) = img.transparent {
        elem.set_attribute(names::IMAGE_TRANSPARENT, trans);
    }
    if img.size.w != 0 {
        elem.set_attribute(names::WIDTH, img.size.w);
    }
    if img.size.h != 0 {
        elem.set_attribute(names::HEIGHT, img.size.h);
    }
}

// Animation -------------------------------------------------------------------

fn write_frame(frame: Frame, elem: &mut Element) {
    elem.set_attribute(names::FRAME_TILE_ID, frame.tile_id);
    elem.set_attribute(names::FRAME_DURATION, frame.duration_ms);
}

fn write_animation(animation: &[Frame], parent: &mut Element) {
    if animation.is_empty() {
        return;
    }

    let elem = parent.add_child(names::ANIMATION);
    for &frame in animation {
        write_frame(frame, elem.add_child(names::FRAME));
    }
}

// Tile sets -------------------------------------------------------------------

fn write_tile_offset(offset: TileOffset, parent: &mut Element) {
    if offset.is_zero() {
        return;
    }

    let elem = parent.add_child(names::TILE_OFFSET);
    elem.set_attribute(names::X, offset.x);
    elem.set_attribute(names::Y, offset.y);
}

fn write_grid_tile(tile: &GridTile, elem: &mut Element, opts: &WriteOptions) -> Result<()> {
    elem.set_attribute(names::TILE_ID, tile.id);
    write_properties(&tile.properties, elem, opts);
    if let Some(collision) = &tile.collision {
        write_object_layer(collision, elem.add_child(names::OBJECT_LAYER), opts)?;
    }
    write_animation(&tile.animation, elem);
    Ok(())
}

fn write_collection_tile(tile: &CollectionTile, elem: &mut Element, opts: &WriteOptions) {
    elem.set_attribute(names::TILE_ID, tile.id);
    write_properties(&tile.properties, elem, opts);
    write_image(&tile.image, elem.add_child(names::IMAGE));
    write_animation(&tile.animation, elem);
}

fn write_grid_storage(grid: &GridStorage, elem: &mut Element) {
    elem.set_attribute(names::TILE_WIDTH, grid.tile_size.w);
    elem.set_attribute(names::TILE_HEIGHT, grid.tile_size.h);
    if grid.spacing != 0 {
        elem.set_attribute(names::TILE_SET_SPACING, grid.spacing);
    }
    if grid.margin != 0 {
        elem.set_attribute(names::TILE_SET_MARGIN, grid.margin);
    }
    elem.set_attribute(names::TILE_SET_TILE_COUNT, grid.tile_count());
    elem.set_attribute(names::TILE_SET_COLUMNS, grid.columns);
}

fn write_collection_storage(collection: &CollectionStorage, elem: &mut Element) {
    elem.set_attribute(names::TILE_WIDTH, collection.max_tile_size.w);
    elem.set_attribute(names::TILE_HEIGHT, collection.max_tile_size.h);
    elem.set_attribute(names::TILE_SET_TILE_COUNT, collection.tile_count);
    elem.set_attribute(names::TILE_SET_COLUMNS, collection.columns);
}

fn write_tileset_content(
    content: &TilesetContent,
    elem: &mut Element,
    opts: &WriteOptions,
) -> Result<()> {
    elem.set_attribute(names::NAME, &content.name);
    match &content.storage {
        TileStorage::Grid(grid) => write_grid_storage(grid, elem),
        TileStorage::Collection(collection) => write_collection_storage(collection, elem),
    }
    write_tile_offset(content.tile_offset, elem);
    write_properties(&content.properties, elem, opts);

    match &content.storage {
        TileStorage::Grid(grid) => {
            write_image(&grid.image, elem.add_child(names::IMAGE));
            for tile in &grid.tiles {
                write_grid_tile(tile, elem.add_child(names::TILE), opts)?;
            }
        }
        TileStorage::Collection(collection) => {
            for tile in &collection.tiles {
                write_collection_tile(tile, elem.add_child(names::TILE), opts);
            }
        }
    }
    Ok(())
}

/// Write a tile set as the root of its own document at `base/source`.
///
/// The standalone form never carries a first-global-id; that value only
/// has meaning inside a referencing map.
pub(crate) fn write_standalone_tileset(
    tileset: &Tileset,
    base: &Path,
    opts: &WriteOptions,
) -> Result<()> {
    let source = match &tileset.source {
        Some(source) if !source.as_os_str().is_empty() => source,
        _ => {
            return Err(Error::unsupported(
                "writing an external tile set requires a non-empty source path",
            ));
        }
    };
    let content = tileset
        .content
        .as_ref()
        .ok_or_else(|| Error::unsupported("external tile set has no content to write"))?;

    let mut root = Element::new(names::TILE_SET);
    write_tileset_content(content, &mut root, opts)?;

    let path = base.join(source);
    tracing::debug!(path = %path.display(), "writing standalone tile set");
    crate::xml::save(&root, &path)
}

fn write_map_tileset(
    tileset: &Tileset,
    elem: &mut Element,
    base: &Path,
    opts: &WriteOptions,
) -> Result<()> {
    elem.set_attribute(names::TILE_SET_FIRST_GID, tileset.first_gid);

    match &tileset.source {
        Some(source) => {
            if source.as_os_str().is_empty() {
                return Err(Error::unsupported(
                    "writing an external tile set requires a non-empty source path",
                ));
            }
            elem.set_attribute(names::TILE_SET_SOURCE, source.display());
            // A stub without content references a document that already
            // exists on disk; only resolved content is re-written.
            if tileset.content.is_some() {
                write_standalone_tileset(tileset, base, opts)?;
            }
            Ok(())
        }
        None => {
            let content = tileset
                .content
                .as_ref()
                .ok_or_else(|| Error::unsupported("embedded tile set has no content"))?;
            write_tileset_content(content, elem, opts)
        }
    }
}

// Objects ---------------------------------------------------------------------

fn write_object_size(size: PxSize, elem: &mut Element) {
    if size.w != 0.0 {
        elem.set_attribute(names::WIDTH, size.w);
    }
    if size.h != 0.0 {
        elem.set_attribute(names::HEIGHT, size.h);
    }
}

fn write_object(obj: &Object, elem: &mut Element, opts: &WriteOptions) -> Result<()> {
    elem.set_attribute(names::OBJECT_ID, obj.id);
    if !obj.name.is_empty() {
        elem.set_attribute(names::NAME, &obj.name);
    }
    if !obj.kind.is_empty() {
        elem.set_attribute(names::OBJECT_TYPE, &obj.kind);
    }
    if let Shape::Tile(gid) = &obj.shape {
        let raw = gid
            .pack()
            .ok_or_else(|| Error::invalid_attribute(names::OBJECT_GID, gid.id.to_string()))?;
        elem.set_attribute(names::OBJECT_GID, raw);
    }
    elem.set_attribute(names::X, obj.position.x);
    elem.set_attribute(names::Y, obj.position.y);

    match &obj.shape {
        Shape::Rect { size } => write_object_size(*size, elem),
        Shape::Ellipse { size } => {
            write_object_size(*size, elem);
            elem.add_child(names::ELLIPSE);
        }
        Shape::Polygon { points } => {
            elem.add_child(names::POLYGON)
                .set_attribute(names::POLY_POINTS, points::format_points(points));
        }
        Shape::Polyline { points } => {
            elem.add_child(names::POLYLINE)
                .set_attribute(names::POLY_POINTS, points::format_points(points));
        }
        // The gid attribute above carries the whole reference.
        Shape::Tile(_) => {}
    }

    if obj.rotation != 0.0 {
        elem.set_attribute(names::OBJECT_ROTATION, obj.rotation);
    }
    if !obj.visible {
        elem.set_attribute(names::VISIBLE, "0");
    }
    write_properties(&obj.properties, elem, opts);
    Ok(())
}

// Layers ----------------------------------------------------------------------

fn write_layer_common(visible: bool, opacity: f64, offset: Offset, elem: &mut Element) {
    if !visible {
        elem.set_attribute(names::VISIBLE, "0");
    }
    if opacity != DEFAULT_OPACITY {
        elem.set_attribute(names::LAYER_OPACITY, opacity);
    }
    if !offset.is_zero() {
        elem.set_attribute(names::LAYER_OFFSET_X, offset.x);
        elem.set_attribute(names::LAYER_OFFSET_Y, offset.y);
    }
}

fn write_tile_layer(layer: &TileLayer, elem: &mut Element, opts: &WriteOptions) -> Result<()> {
    if !layer.name.is_empty() {
        elem.set_attribute(names::NAME, &layer.name);
    }
    elem.set_attribute(names::WIDTH, layer.size.w);
    elem.set_attribute(names::HEIGHT, layer.size.h);
    write_layer_common(layer.visible, layer.opacity, layer.offset, elem);
    write_properties(&layer.properties, elem, opts);
    data::encode(&layer.data, layer.size, elem.add_child(names::DATA))
}

fn write_object_layer(layer: &ObjectLayer, elem: &mut Element, opts: &WriteOptions) -> Result<()> {
    if let Some(color) = layer.color {
        elem.set_attribute(names::OBJECT_LAYER_COLOR, color);
    }
    if layer.draw_order != DrawOrder::TopDown {
        elem.set_attribute(names::OBJECT_LAYER_DRAW_ORDER, names::DRAW_ORDER_INDEX);
    }
    if !layer.name.is_empty() {
        elem.set_attribute(names::NAME, &layer.name);
    }
    write_layer_common(layer.visible, layer.opacity, layer.offset, elem);
    write_properties(&layer.properties, elem, opts);
    for obj in &layer.objects {
        write_object(obj, elem.add_child(names::OBJECT), opts)?;
    }
    Ok(())
}

fn write_image_layer(layer: &ImageLayer, elem: &mut Element, opts: &WriteOptions) {
    if !layer.name.is_empty() {
        elem.set_attribute(names::NAME, &layer.name);
    }
    write_layer_common(layer.visible, layer.opacity, layer.offset, elem);
    if let Some(image) = &layer.image {
        write_image(image, elem.add_child(names::IMAGE));
    }
    write_properties(&layer.properties, elem, opts);
}

fn write_layer(layer: &Layer, map_elem: &mut Element, opts: &WriteOptions) -> Result<()> {
    match layer {
        Layer::Tile(l) => write_tile_layer(l, map_elem.add_child(names::TILE_LAYER), opts),
        Layer::Object(l) => write_object_layer(l, map_elem.add_child(names::OBJECT_LAYER), opts),
        Layer::Image(l) => {
            write_image_layer(l, map_elem.add_child(names::IMAGE_LAYER), opts);
            Ok(())
        }
    }
}

// Map -------------------------------------------------------------------------

fn write_orientation(orientation: Orientation, render_order: RenderOrder, elem: &mut Element) {
    let token = match orientation {
        Orientation::Orthogonal => names::ORIENTATION_ORTHOGONAL,
        Orientation::Isometric => names::ORIENTATION_ISOMETRIC,
        Orientation::Staggered { .. } => names::ORIENTATION_STAGGERED,
        Orientation::Hexagonal { .. } => names::ORIENTATION_HEXAGONAL,
    };
    elem.set_attribute(names::MAP_ORIENTATION, token);
    elem.set_attribute(names::MAP_RENDER_ORDER, render_order_token(render_order));

    match orientation {
        Orientation::Orthogonal | Orientation::Isometric => {}
        Orientation::Staggered { axis, index } => {
            elem.set_attribute(names::MAP_STAGGER_AXIS, stagger_axis_token(axis));
            elem.set_attribute(names::MAP_STAGGER_INDEX, stagger_index_token(index));
        }
        Orientation::Hexagonal { side_length, axis, index } => {
            elem.set_attribute(names::MAP_HEX_SIDE_LENGTH, side_length);
            elem.set_attribute(names::MAP_STAGGER_AXIS, stagger_axis_token(axis));
            elem.set_attribute(names::MAP_STAGGER_INDEX, stagger_index_token(index));
        }
    }
}

/// Encode a complete map into its root element, serializing external
/// tile sets relative to `base` as a side effect.
pub(crate) fn write_map_root(map: &Map, base: &Path, opts: &WriteOptions) -> Result<Element> {
    let mut elem = Element::new(names::MAP);

    elem.set_attribute(names::MAP_VERSION, &map.version);
    write_orientation(map.orientation, map.render_order, &mut elem);
    elem.set_attribute(names::WIDTH, map.size.w);
    elem.set_attribute(names::HEIGHT, map.size.h);
    elem.set_attribute(names::TILE_WIDTH, map.tile_size.w);
    elem.set_attribute(names::TILE_HEIGHT, map.tile_size.h);
    if let Some(background) = map.background {
        elem.set_attribute(names::MAP_BACKGROUND, background);
    }
    elem.set_attribute(names::MAP_NEXT_OBJECT_ID, map.next_object_id);

    write_properties(&map.properties, &mut elem, opts);
    for tileset in &map.tile_sets {
        write_map_tileset(tileset, elem.add_child(names::TILE_SET), base, opts)?;
    }
    for layer in &map.layers {
        write_layer(layer, &mut elem, opts)?;
    }
    Ok(elem)
}
